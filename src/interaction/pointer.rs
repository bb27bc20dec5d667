//! Pixel to NDC conversion and click detection

use cgmath::Vector2;

/// Output surface size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Maps a pixel position (origin top-left, y down) to NDC (y up), clamped to [-1, 1]
    pub fn to_ndc(&self, x: f64, y: f64) -> Option<Vector2<f32>> {
        if self.is_empty() {
            return None;
        }
        let ndc_x = x / self.width as f64 * 2.0 - 1.0;
        let ndc_y = -(y / self.height as f64) * 2.0 + 1.0;
        Some(Vector2::new(
            ndc_x.clamp(-1.0, 1.0) as f32,
            ndc_y.clamp(-1.0, 1.0) as f32,
        ))
    }
}

/// Latest pointer position in NDC plus press tracking for clicks
///
/// Only the most recent position is kept.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    viewport: Viewport,
    pixel: Option<(f64, f64)>,
    ndc: Vector2<f32>,
    press_origin: Option<(f64, f64)>,
    click_slop: f64,
}

impl PointerTracker {
    pub fn new(viewport: Viewport, click_slop: f64) -> Self {
        Self {
            viewport,
            pixel: None,
            ndc: Vector2::new(0.0, 0.0),
            press_origin: None,
            click_slop,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last known NDC position; the screen center before any movement
    pub fn ndc(&self) -> Vector2<f32> {
        self.ndc
    }

    pub fn moved(&mut self, x: f64, y: f64) -> Vector2<f32> {
        self.pixel = Some((x, y));
        if let Some(ndc) = self.viewport.to_ndc(x, y) {
            self.ndc = ndc;
        }
        self.ndc
    }

    pub fn pressed(&mut self) {
        self.press_origin = self.pixel;
    }

    /// Ends a press; returns the click position in NDC when the pointer
    /// stayed within the click slop
    pub fn released(&mut self) -> Option<Vector2<f32>> {
        let origin = self.press_origin.take()?;
        let current = self.pixel.unwrap_or(origin);
        let travel = ((current.0 - origin.0).powi(2) + (current.1 - origin.1).powi(2)).sqrt();

        (travel <= self.click_slop).then_some(self.ndc)
    }

    /// Applies a new surface size; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        if let Some((x, y)) = self.pixel {
            self.moved(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners_and_center() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.to_ndc(0.0, 0.0), Some(Vector2::new(-1.0, 1.0)));
        assert_eq!(viewport.to_ndc(800.0, 600.0), Some(Vector2::new(1.0, -1.0)));
        assert_eq!(viewport.to_ndc(400.0, 300.0), Some(Vector2::new(0.0, 0.0)));
        // Outside the window
        assert_eq!(viewport.to_ndc(-50.0, 900.0), Some(Vector2::new(-1.0, -1.0)));
        assert_eq!(Viewport::new(0, 600).to_ndc(1.0, 1.0), None);
    }

    #[test]
    fn test_click_within_slop() {
        let mut pointer = PointerTracker::new(Viewport::new(800, 600), 4.0);
        pointer.moved(100.0, 100.0);
        pointer.pressed();
        pointer.moved(102.0, 101.0);
        assert!(pointer.released().is_some());
        // A second release without a press is not a click
        assert!(pointer.released().is_none());
    }

    #[test]
    fn test_long_drag_is_not_a_click() {
        let mut pointer = PointerTracker::new(Viewport::new(800, 600), 4.0);
        pointer.moved(100.0, 100.0);
        pointer.pressed();
        pointer.moved(160.0, 100.0);
        assert!(pointer.released().is_none());
    }

    #[test]
    fn test_resize_recomputes_ndc() {
        let mut pointer = PointerTracker::new(Viewport::new(800, 600), 4.0);
        pointer.moved(400.0, 300.0);
        pointer.resize(1600, 600);
        assert_eq!(pointer.ndc(), Vector2::new(-0.5, 0.0));
        pointer.resize(0, 0);
        assert_eq!(pointer.viewport(), Viewport::new(1600, 600));
    }
}
