//! Pan/zoom state mapping graph coordinates onto the screen.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 2.0;
pub const FIT_PADDING: f64 = 0.1;

/// Axis-aligned box in graph coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// `screen = graph * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Scales by `factor` keeping the graph point under `(sx, sy)` fixed.
    pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
        let (gx, gy) = self.to_graph(sx, sy);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan_x = sx - gx * self.zoom;
        self.pan_y = sy - gy * self.zoom;
    }

    /// Centres `bounds` and scales it to fill the screen minus `padding`.
    pub fn fit_view(&mut self, bounds: Bounds, padding: f64) {
        let scale = 1.0 + padding.max(0.0);
        let zx = self.width / (bounds.width().max(1.0) * scale);
        let zy = self.height / (bounds.height().max(1.0) * scale);
        self.zoom = clamp_zoom(zx.min(zy));

        let (cx, cy) = bounds.center();
        self.pan_x = self.width / 2.0 - cx * self.zoom;
        self.pan_y = self.height / 2.0 - cy * self.zoom;
    }

    pub fn to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    pub fn to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
        (gx * self.zoom + self.pan_x, gy * self.zoom + self.pan_y)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mapping_roundtrip() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan_by(30.0, -10.0);
        vp.set_zoom(1.5);

        let (sx, sy) = vp.to_screen(100.0, 200.0);
        assert!(close(sx, 180.0) && close(sy, 290.0));
        let (gx, gy) = vp.to_graph(sx, sy);
        assert!(close(gx, 100.0) && close(gy, 200.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(100.0, 0.0, 0.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_at(0.0001, 0.0, 0.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
        vp.set_zoom(f64::NAN);
        assert_eq!(vp.zoom, 1.0);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut vp = Viewport::default();
        vp.pan_by(40.0, 40.0);
        let before = vp.to_graph(300.0, 200.0);
        vp.zoom_at(1.25, 300.0, 200.0);
        let after = vp.to_graph(300.0, 200.0);
        assert!(close(before.0, after.0) && close(before.1, after.1));
    }

    #[test]
    fn test_fit_view_centres_bounds() {
        let mut vp = Viewport::new(1000.0, 500.0);
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1000.0,
            max_y: 100.0,
        };
        vp.fit_view(bounds, FIT_PADDING);

        assert!(close(vp.zoom, 1000.0 / 1100.0));
        let (cx, cy) = vp.to_screen(500.0, 50.0);
        assert!(close(cx, 500.0) && close(cy, 250.0));
    }
}
