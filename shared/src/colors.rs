use crate::category::PoliticalCategory;

/// Fill for features whose category could not be resolved.
pub const DEFAULT_GRAY: &str = "#CCCCCC";

/// Fixed category to color table. Total over the closed enumeration; `None`
/// (unmapped or missing) maps to [`DEFAULT_GRAY`].
pub fn color_of(category: Option<PoliticalCategory>) -> &'static str {
    match category {
        Some(PoliticalCategory::SolidDem) => "#0000FF",
        Some(PoliticalCategory::LeanDem) => "#99CCFF",
        Some(PoliticalCategory::Swing) => "#FFD700",
        Some(PoliticalCategory::LeanRep) => "#FFB6C1",
        Some(PoliticalCategory::SolidRep) => "#FF0000",
        Some(PoliticalCategory::IndependentTerritory) => "#4A5568",
        None => DEFAULT_GRAY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendItem {
    pub category: PoliticalCategory,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn legend_items() -> Vec<LegendItem> {
    PoliticalCategory::ALL
        .into_iter()
        .map(|category| LegendItem {
            category,
            label: category.label(),
            color: color_of(Some(category)),
        })
        .collect()
}

/// Parse `#RRGGBB` (or `#RGB`). Returns `None` for anything else.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let mut channels = digits
                .chars()
                .map(|c| c.to_digit(16).map(|v| (v * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        _ => None,
    }
}

/// CSS `rgba()` string for a hex color at the given alpha. Falls back to the
/// default gray when the input does not parse.
pub fn rgba_css(hex: &str, alpha: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex)
        .or_else(|| hex_to_rgb(DEFAULT_GRAY))
        .unwrap_or((204, 204, 204));
    format!("rgba({r},{g},{b},{:.2})", alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_distinct_non_default_color() {
        let mut seen = Vec::new();
        for category in PoliticalCategory::ALL {
            let color = color_of(Some(category));
            assert_ne!(color, DEFAULT_GRAY, "{category} uses the fallback color");
            assert!(!seen.contains(&color), "{category} shares color {color}");
            seen.push(color);
        }
    }

    #[test]
    fn missing_category_is_default_gray() {
        assert_eq!(color_of(None), DEFAULT_GRAY);
    }

    #[test]
    fn color_of_is_stable_across_calls() {
        for category in PoliticalCategory::ALL {
            assert_eq!(color_of(Some(category)), color_of(Some(category)));
        }
    }

    #[test]
    fn legend_lists_all_categories_in_order() {
        let items = legend_items();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].label, "Solid Democratic");
        assert_eq!(items[5].color, "#4A5568");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_rgb("#FFD700"), Some((255, 215, 0)));
        assert_eq!(hex_to_rgb("#666"), Some((102, 102, 102)));
        assert_eq!(hex_to_rgb("FFD700"), None);
        assert_eq!(hex_to_rgb("#GG0000"), None);
    }

    #[test]
    fn rgba_formats_alpha() {
        assert_eq!(rgba_css("#0000FF", 0.25), "rgba(0,0,255,0.25)");
        assert_eq!(rgba_css("bogus", 2.0), "rgba(204,204,204,1.00)");
    }
}
