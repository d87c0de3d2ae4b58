// raster.rs - Software PetalRenderer over an RgbaImage
//
// Fills the teardrop outline as a polygon, once per sprite pass, with
// straight-alpha source-over blending. Coordinates arrive in CSS px and
// are scaled by `scale` into image pixels.

use image::{Rgba, RgbaImage};
use petal_engine::Petal;
use petal_engine::asset::{self, PETAL_RGBA};
use petal_engine::render::{PetalRenderer, SpriteStyle};

const OUTLINE_STEPS: usize = 12;

pub struct RasterRenderer {
    img: RgbaImage,
    background: Rgba<u8>,
    style: SpriteStyle,
    scale: f64,
}

impl RasterRenderer {
    pub fn new(w: u32, h: u32, scale: f64, background: [u8; 4], style: SpriteStyle) -> Self {
        let background = Rgba(background);
        Self {
            img: RgbaImage::from_pixel(w, h, background),
            background,
            style,
            scale,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    fn fill_polygon(&mut self, poly: &[(f64, f64)], alpha: f64) {
        if poly.len() < 3 { return; }
        let (w, h) = (self.img.width() as f64, self.img.height() as f64);

        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(x, y) in poly {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }

        let x0 = x0.floor().max(0.0) as u32;
        let y0 = y0.floor().max(0.0) as u32;
        let x1 = x1.ceil().min(w) as u32;
        let y1 = y1.ceil().min(h) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                if contains(poly, px as f64 + 0.5, py as f64 + 0.5) {
                    blend(self.img.get_pixel_mut(px, py), PETAL_RGBA, alpha);
                }
            }
        }
    }
}

impl PetalRenderer for RasterRenderer {
    fn clear(&mut self, _w: f64, _h: f64) {
        let bg = self.background;
        self.img.pixels_mut().for_each(|px| *px = bg);
    }

    fn draw(&mut self, p: &Petal) {
        let (sin, cos) = p.angle.sin_cos();
        let s = self.scale;

        for pass in self.style.passes(p.size) {
            let poly: Vec<(f64, f64)> = asset::teardrop_polygon(pass.rect, OUTLINE_STEPS)
                .into_iter()
                .map(|(lx, ly)| ((lx * cos - ly * sin + p.x) * s, (lx * sin + ly * cos + p.y) * s))
                .collect();
            self.fill_polygon(&poly, pass.alpha);
        }
    }
}

/// Even-odd point-in-polygon.
fn contains(poly: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// Source-over with straight alpha.
fn blend(dst: &mut Rgba<u8>, src: [u8; 4], alpha: f64) {
    let sa = src[3] as f64 / 255.0 * alpha;
    let da = dst[3] as f64 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 { return; }

    for c in 0..3 {
        let v = (src[c] as f64 * sa + dst[c] as f64 * da * (1.0 - sa)) / oa;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (oa * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_engine::FieldConfig;

    fn petal_at(x: f64, y: f64) -> Petal {
        Petal {
            x,
            y,
            size: 20.0,
            rotation_speed: 0.0,
            speed: 0.5,
            sway_amp: 6.0,
            sway_freq: 0.01,
            phase: 0.0,
            angle: 0.0,
        }
    }

    fn renderer(w: u32, h: u32) -> RasterRenderer {
        RasterRenderer::new(w, h, 1.0, [0, 0, 0, 255], SpriteStyle::from_config(&FieldConfig::default()))
    }

    #[test]
    fn square_containment() {
        let sq = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        assert!(contains(&sq, 2.0, 2.0));
        assert!(!contains(&sq, 5.0, 2.0));
        assert!(!contains(&sq, 2.0, -1.0));
    }

    #[test]
    fn petal_tints_its_anchor() {
        let mut r = renderer(64, 64);
        r.draw(&petal_at(32.0, 32.0));
        let img = r.into_image();

        let centre = img.get_pixel(32, 32);
        assert!(centre[0] > centre[2], "expected pink over black, got {:?}", centre);
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn offscreen_petal_is_clipped() {
        let mut r = renderer(16, 16);
        r.draw(&petal_at(-200.0, -200.0));
        assert!(r.into_image().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn clear_restores_background() {
        let mut r = renderer(32, 32);
        r.draw(&petal_at(16.0, 16.0));
        r.clear(32.0, 32.0);
        assert!(r.into_image().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn halo_is_fainter_than_petal() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend(&mut dst, PETAL_RGBA, 0.18);
        let mut full = Rgba([0, 0, 0, 255]);
        blend(&mut full, PETAL_RGBA, 1.0);
        assert!(dst[0] < full[0]);
        assert_eq!(full[3], 255);
    }
}
