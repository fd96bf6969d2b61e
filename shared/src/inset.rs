/// Insets are shown at or below this zoom level.
pub const ZOOM_THRESHOLD: f64 = 5.0;

/// Whether the Alaska / Hawaii / Puerto Rico inset panels should be visible.
/// Re-evaluate on every zoom change.
pub fn show_insets(zoom: f64) -> bool {
    zoom <= ZOOM_THRESHOLD
}

/// A fixed panel showing one non-contiguous state or territory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsetPanel {
    pub state: &'static str,
    /// `(lon, lat)` the panel centres on when the boundary is unavailable.
    pub center: (f64, f64),
    /// Panel height in CSS pixels.
    pub height: u32,
}

pub const INSETS: [InsetPanel; 3] = [
    InsetPanel {
        state: "Alaska",
        center: (-152.0, 63.5),
        height: 150,
    },
    InsetPanel {
        state: "Hawaii",
        center: (-157.3, 20.6),
        height: 80,
    },
    InsetPanel {
        state: "Puerto Rico",
        center: (-66.5, 18.2),
        height: 60,
    },
];

/// Caption for an inset: the abbreviation, followed by the electoral votes
/// when the state has any.
pub fn inset_caption(abbreviation: &str, electoral_votes: Option<u32>) -> String {
    match electoral_votes {
        Some(votes) if votes > 0 => format!("{abbreviation} \u{2022} {votes}"),
        _ => abbreviation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_at_threshold() {
        assert!(show_insets(5.0));
        assert!(!show_insets(6.0));
        assert!(!show_insets(5.0001));
    }

    #[test]
    fn monotonic_over_zoom_range() {
        let mut previous = true;
        for step in 0..=80 {
            let zoom = step as f64 * 0.125;
            let visible = show_insets(zoom);
            assert_eq!(visible, zoom <= 5.0);
            assert!(previous || !visible, "insets reappeared at zoom {zoom}");
            previous = visible;
        }
    }

    #[test]
    fn nan_zoom_hides_insets() {
        assert!(!show_insets(f64::NAN));
    }

    #[test]
    fn captions() {
        assert_eq!(inset_caption("AK", Some(3)), "AK \u{2022} 3");
        assert_eq!(inset_caption("PR", None), "PR");
    }

    #[test]
    fn insets_cover_non_contiguous_areas() {
        let names: Vec<_> = INSETS.iter().map(|i| i.state).collect();
        assert_eq!(names, ["Alaska", "Hawaii", "Puerto Rico"]);
    }
}
