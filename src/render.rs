// render.rs - Drawing contract between the field and a surface
//
// The field never touches pixels. Each frame it calls `clear` once, then
// `draw` once per petal. A petal is two passes of the same sprite in its
// rotated local frame: a faint enlarged halo, then the petal itself.
//
// InstanceBuffer layout (for host-side renderers):
//   [x, y, angle, size] as f32, one quad per petal, in field order

use crate::asset::Rect;
use crate::config::FieldConfig;
use crate::sim::Petal;

pub trait PetalRenderer {
    fn clear(&mut self, w: f64, h: f64);
    fn draw(&mut self, petal: &Petal);
}

/// Discards everything. For headless stepping.
pub struct NullRenderer;

impl PetalRenderer for NullRenderer {
    fn clear(&mut self, _w: f64, _h: f64) {}
    fn draw(&mut self, _petal: &Petal) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePass {
    pub alpha: f64,
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteStyle {
    pub halo_alpha: f64,
    pub halo_scale: f64,
}

impl SpriteStyle {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self { halo_alpha: config.halo_alpha, halo_scale: config.halo_scale }
    }

    /// Halo then main pass for a petal of `size`, relative to its anchor.
    pub fn passes(&self, size: f64) -> [SpritePass; 2] {
        [
            SpritePass { alpha: self.halo_alpha, rect: sprite_rect(size * self.halo_scale) },
            SpritePass { alpha: 1.0, rect: sprite_rect(size) },
        ]
    }
}

// Width `size`, height `2 * size`, centred horizontally, bottom half below the anchor.
#[inline]
fn sprite_rect(size: f64) -> Rect {
    Rect { x: -size / 2.0, y: -size, w: size, h: size * 2.0 }
}

pub const INSTANCE_STRIDE: usize = 4;

pub struct InstanceBuffer {
    out: Vec<f32>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self { out: Vec::new() }
    }

    pub fn ptr(&self) -> *const f32 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn count(&self) -> usize {
        self.out.len() / INSTANCE_STRIDE
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.out
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PetalRenderer for InstanceBuffer {
    fn clear(&mut self, _w: f64, _h: f64) {
        self.out.clear();
    }

    fn draw(&mut self, p: &Petal) {
        self.out.extend_from_slice(&[p.x as f32, p.y as f32, p.angle as f32, p.size as f32]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petal(x: f64, y: f64) -> Petal {
        Petal {
            x,
            y,
            size: 8.0,
            rotation_speed: 0.0,
            speed: 0.5,
            sway_amp: 6.0,
            sway_freq: 0.01,
            phase: 0.0,
            angle: 0.25,
        }
    }

    #[test]
    fn passes_match_stock_geometry() {
        let [halo, main] = SpriteStyle::from_config(&FieldConfig::default()).passes(10.0);

        assert_eq!(halo.alpha, 0.18);
        assert!((halo.rect.w - 22.0).abs() < 1e-12);
        assert!((halo.rect.h - 44.0).abs() < 1e-12);
        assert!((halo.rect.x + 11.0).abs() < 1e-12);
        assert!((halo.rect.y + 22.0).abs() < 1e-12);

        assert_eq!(main.alpha, 1.0);
        assert_eq!(main.rect, Rect { x: -5.0, y: -10.0, w: 10.0, h: 20.0 });
    }

    #[test]
    fn instance_buffer_packs_quads_per_frame() {
        let mut buf = InstanceBuffer::new();
        buf.clear(100.0, 100.0);
        buf.draw(&petal(1.0, 2.0));
        buf.draw(&petal(3.0, 4.0));
        assert_eq!(buf.count(), 2);
        assert_eq!(&buf.as_slice()[4..], &[3.0, 4.0, 0.25, 8.0]);

        buf.clear(100.0, 100.0);
        assert!(buf.is_empty());
    }
}
