#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in floor-plan (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the hosting element and its device pixel ratio.
///
/// `width` / `height` are in CSS pixels, which are also floor-plan units.
/// The drawing surface backing store is `width * dpr` by `height * dpr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0, dpr: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        let mut vp = Self::default();
        vp.set(width, height, dpr);
        vp
    }

    /// Update from the element's rendered size. Degenerate sizes are clamped
    /// to 1. A ratio below 1 (zoomed out) is kept; only a missing one
    /// (non-finite, zero or negative) falls back to 1.
    pub fn set(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = at_least_one(width);
        self.height = at_least_one(height);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    /// Backing-store resolution in device pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.width * self.dpr).floor().max(1.0);
        let h = (self.height * self.dpr).floor().max(1.0);
        (w as u32, h as u32)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a pointer position in client coordinates to floor-plan
    /// coordinates, given the element's bounding-rect origin.
    #[must_use]
    pub fn client_to_plan(&self, client: Point, origin: Point) -> Point {
        Point::new(client.x - origin.x, client.y - origin.y)
    }

    /// Whether `pt` lies inside the viewport grown by `margin` on every side.
    #[must_use]
    pub fn contains_with_margin(&self, pt: Point, margin: f64) -> bool {
        pt.x >= -margin && pt.y >= -margin && pt.x <= self.width + margin && pt.y <= self.height + margin
    }
}

fn at_least_one(v: f64) -> f64 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}
