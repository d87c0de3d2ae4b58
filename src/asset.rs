// asset.rs - Petal sprite source
//
// The sprite is a teardrop SVG in a 60x120 viewBox, 80% opaque pink.
// The same outline is kept as bezier data so the shape can be drawn
// directly when the image never loads.

use serde::{Deserialize, Serialize};

pub const PETAL_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 60 120"><path d="M30 0 C50 40, 50 80, 30 120 C10 80, 10 40, 30 0 Z" fill="rgba(255,182,193,0.8)"/></svg>"#;

pub const PETAL_FILL: &str = "rgba(255,182,193,0.8)";
pub const PETAL_RGBA: [u8; 4] = [255, 182, 193, 204];

const VIEW_W: f64 = 60.0;
const VIEW_H: f64 = 120.0;

// Outline in viewBox units: start point, then two cubic segments.
const OUTLINE_START: (f64, f64) = (30.0, 0.0);
const OUTLINE: [[(f64, f64); 3]; 2] = [
    [(50.0, 40.0), (50.0, 80.0), (30.0, 120.0)],
    [(10.0, 80.0), (10.0, 40.0), (30.0, 0.0)],
];

/// What to draw when the sprite image fails to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFallback {
    /// Draw the teardrop outline as a filled path.
    #[default]
    Shape,
    /// Leave the canvas empty and never start the loop.
    Skip,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssetState {
    Pending,
    Ready,
    Failed(String),
}

/// How petals end up on screen once loading settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteSource {
    Image,
    Shape,
}

impl AssetState {
    /// `None` while pending, or when a failure should leave the canvas empty.
    pub fn resolve(&self, fallback: AssetFallback) -> Option<SpriteSource> {
        match (self, fallback) {
            (AssetState::Pending, _) => None,
            (AssetState::Ready, _) => Some(SpriteSource::Image),
            (AssetState::Failed(_), AssetFallback::Shape) => Some(SpriteSource::Shape),
            (AssetState::Failed(_), AssetFallback::Skip) => None,
        }
    }
}

/// Axis-aligned destination rectangle in the petal's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// One cubic bezier segment: two control points and an end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cubic {
    pub c1: (f64, f64),
    pub c2: (f64, f64),
    pub to: (f64, f64),
}

/// Teardrop outline mapped from the viewBox onto `rect`.
pub fn teardrop(rect: Rect) -> ((f64, f64), [Cubic; 2]) {
    let map = |(px, py): (f64, f64)| (rect.x + px / VIEW_W * rect.w, rect.y + py / VIEW_H * rect.h);
    let seg = |s: &[(f64, f64); 3]| Cubic { c1: map(s[0]), c2: map(s[1]), to: map(s[2]) };
    (map(OUTLINE_START), [seg(&OUTLINE[0]), seg(&OUTLINE[1])])
}

/// Flatten the outline of `rect` into a closed polygon, `steps` points per segment.
pub fn teardrop_polygon(rect: Rect, steps: usize) -> Vec<(f64, f64)> {
    let (start, segs) = teardrop(rect);
    let steps = steps.max(1);
    let mut pts = Vec::with_capacity(steps * 2 + 1);
    pts.push(start);

    let mut from = start;
    for s in &segs {
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            let a = u * u * u;
            let b = 3.0 * u * u * t;
            let c = 3.0 * u * t * t;
            let d = t * t * t;
            pts.push((
                a * from.0 + b * s.c1.0 + c * s.c2.0 + d * s.to.0,
                a * from.1 + b * s.c1.1 + c * s.c2.1 + d * s.to.1,
            ));
        }
        from = s.to;
    }
    pts
}
