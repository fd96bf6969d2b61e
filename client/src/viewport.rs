use bellwether_shared::geo::{Bounds, Equirectangular, Projection, USA_BOUNDS, USA_CENTER};

pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 8;
pub const INITIAL_ZOOM: u8 = 3;

/// Pixels per projected degree at zoom 0.
const BASE_SCALE: f64 = 256.0 / 360.0;
const FIT_PADDING: f64 = 0.05;

/// Viewport manages the pan/zoom transformation from the projected map plane
/// to the SVG surface. Zoom moves in whole steps, each doubling the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_lon: USA_CENTER.0,
            center_lat: USA_CENTER.1,
            zoom: INITIAL_ZOOM,
        }
    }
}

impl Viewport {
    fn projection() -> Equirectangular {
        Equirectangular::usa()
    }

    /// Screen pixels per projected unit.
    pub fn scale(&self) -> f64 {
        scale_at(self.zoom)
    }

    /// Project geographic coordinates onto the map plane shared by every path.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        Self::projection().project(lon, lat)
    }

    fn center_world(&self) -> (f64, f64) {
        self.project(self.center_lon, self.center_lat)
    }

    fn set_center_world(&mut self, x: f64, y: f64) {
        let (lon, lat) = Self::projection().unproject(x, y);
        self.center_lon = lon;
        self.center_lat = lat;
    }

    /// Convert world coordinates to screen coordinates for a surface of the given size.
    pub fn world_to_screen(&self, wx: f64, wy: f64, width: f64, height: f64) -> (f64, f64) {
        let (cx, cy) = self.center_world();
        let scale = self.scale();
        (
            (wx - cx) * scale + width / 2.0,
            (wy - cy) * scale + height / 2.0,
        )
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64, width: f64, height: f64) -> (f64, f64) {
        let (cx, cy) = self.center_world();
        let scale = self.scale();
        (
            (sx - width / 2.0) / scale + cx,
            (sy - height / 2.0) / scale + cy,
        )
    }

    /// SVG `viewBox` showing this viewport on a surface of the given size.
    pub fn view_box(&self, width: f64, height: f64) -> String {
        let (cx, cy) = self.center_world();
        let scale = self.scale();
        let (w, h) = (width.max(1.0) / scale, height.max(1.0) / scale);
        format!("{:.4} {:.4} {:.4} {:.4}", cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Zoom one step toward a focus point (screen coordinates). Negative wheel
    /// deltas zoom in.
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64, width: f64, height: f64) {
        if delta == 0.0 {
            return;
        }
        let focus = self.screen_to_world(screen_x, screen_y, width, height);
        let before = self.zoom;
        if delta < 0.0 {
            self.zoom_in();
        } else {
            self.zoom_out();
        }
        if self.zoom == before {
            return;
        }

        // Keep the point under the cursor fixed
        let scale = self.scale();
        let cx = focus.0 - (screen_x - width / 2.0) / scale;
        let cy = focus.1 - (screen_y - height / 2.0) / scale;
        self.set_center_world(cx, cy);
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.center_world();
        let scale = self.scale();
        self.set_center_world(cx - dx / scale, cy - dy / scale);
    }

    /// Center on geographic bounds at the largest zoom step that still shows
    /// them whole, with padding.
    pub fn fit_bounds(&mut self, bounds: &Bounds, width: f64, height: f64) {
        let projected = bounds.projected(&Self::projection());
        let (world_w, world_h) = (projected.width(), projected.height());
        if world_w <= 0.0 || world_h <= 0.0 || width <= 0.0 || height <= 0.0 {
            return;
        }

        let padded = 1.0 + FIT_PADDING * 2.0;
        self.zoom = (MIN_ZOOM..=MAX_ZOOM)
            .rev()
            .find(|&zoom| {
                let scale = scale_at(zoom);
                world_w * padded * scale <= width && world_h * padded * scale <= height
            })
            .unwrap_or(MIN_ZOOM);

        let (cx, cy) = projected.center();
        self.set_center_world(cx, cy);
    }

    /// The "fit USA" control: frame the contiguous states.
    pub fn reset(&mut self, width: f64, height: f64) {
        *self = Self::default();
        self.fit_bounds(&USA_BOUNDS, width, height);
    }

    pub fn zoom_level(&self) -> f64 {
        f64::from(self.zoom)
    }
}

fn scale_at(zoom: u8) -> f64 {
    BASE_SCALE * 2f64.powi(i32::from(zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 1200.0;
    const H: f64 = 800.0;

    #[test]
    fn default_is_centered_on_usa() {
        let vp = Viewport::default();
        assert_eq!(vp.zoom, INITIAL_ZOOM);
        let (sx, sy) = {
            let (wx, wy) = vp.project(USA_CENTER.0, USA_CENTER.1);
            vp.world_to_screen(wx, wy, W, H)
        };
        assert!((sx - W / 2.0).abs() < 1e-9);
        assert!((sy - H / 2.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..20 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_at_keeps_focus_point_fixed() {
        let mut vp = Viewport::default();
        let (fx, fy) = (300.0, 200.0);
        let before = vp.screen_to_world(fx, fy, W, H);
        vp.zoom_at(-120.0, fx, fy, W, H);
        assert_eq!(vp.zoom, INITIAL_ZOOM + 1);
        let after = vp.screen_to_world(fx, fy, W, H);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn zoom_at_limit_does_not_move_center() {
        let mut vp = Viewport {
            zoom: MAX_ZOOM,
            ..Viewport::default()
        };
        let before = vp;
        vp.zoom_at(-120.0, 10.0, 10.0, W, H);
        assert_eq!(vp, before);
    }

    #[test]
    fn pan_moves_content_with_pointer() {
        let mut vp = Viewport::default();
        let (wx, wy) = vp.project(-100.0, 40.0);
        let before = vp.world_to_screen(wx, wy, W, H);
        vp.pan(40.0, -25.0);
        let after = vp.world_to_screen(wx, wy, W, H);
        assert!((after.0 - before.0 - 40.0).abs() < 1e-9);
        assert!((after.1 - before.1 + 25.0).abs() < 1e-9);
    }

    #[test]
    fn fit_usa_picks_largest_zoom_that_fits() {
        let mut vp = Viewport::default();
        vp.reset(W, H);
        assert_eq!(vp.zoom, 5);

        vp.reset(100.0, 100.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn fit_ignores_degenerate_surface() {
        let mut vp = Viewport::default();
        vp.fit_bounds(&USA_BOUNDS, 0.0, H);
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn view_box_spans_surface_in_world_units() {
        let vp = Viewport::default();
        let parts: Vec<f64> = vp
            .view_box(W, H)
            .split(' ')
            .map(|p| p.parse().expect("number"))
            .collect();
        assert_eq!(parts.len(), 4);
        assert!((parts[2] - W / vp.scale()).abs() < 1e-3);
        assert!((parts[3] - H / vp.scale()).abs() < 1e-3);
    }
}
