// viewport.rs - CSS viewport and canvas backing-store size
//
// Simulation runs in CSS pixels. The canvas backing store is scaled by
// the device pixel ratio and the 2d transform maps one back to the other.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    /// Sanitize raw window metrics. DPR is floored at 1, sizes at 0.
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
        Self { width: clean(width), height: clean(height), dpr }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Canvas `width`/`height` attributes in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        ((self.width * self.dpr).round() as u32, (self.height * self.dpr).round() as u32)
    }
}
