// sim/ - Petal field simulation
//
// One owned struct holds the petals, the viewport they live in and the RNG.
// The driver calls `step` once per frame and `reinitialize` after a resize.

mod density;
mod petal;

pub use density::compute_count;
pub use petal::Petal;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::render::PetalRenderer;

pub struct PetalField {
    // Viewport (CSS px)
    w: f64,
    h: f64,

    petals: Vec<Petal>,
    config: FieldConfig,
    rng: SmallRng,
}

impl PetalField {
    /// Empty field; call `reinitialize` once the viewport is known.
    ///
    /// Rejects a config that fails `FieldConfig::validate`.
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            w: 0.0,
            h: 0.0,
            petals: Vec::new(),
            config,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Repopulate for a new viewport.
    ///
    /// Petals are spread over the full height so the first frame already
    /// looks populated. A degenerate viewport yields no petals.
    pub fn reinitialize(&mut self, w: f64, h: f64) {
        self.w = w;
        self.h = h;

        if !is_drawable(w, h) {
            self.petals = Vec::new();
            log::debug!("petal field emptied for degenerate viewport {}x{}", w, h);
            return;
        }

        let count = compute_count(w * h, &self.config);
        let mut next = Vec::with_capacity(count);
        for _ in 0..count {
            next.push(Petal::spawn(&mut self.rng, w, h, &self.config));
        }
        self.petals = next;

        log::debug!("petal field reinitialized: {} petals for {}x{}", count, w, h);
    }

    /// Move the bounds without repopulating. Petals outside simply fall
    /// through and recycle into the new width.
    pub fn resize(&mut self, w: f64, h: f64) {
        self.w = w;
        self.h = h;
    }

    /// Advance every petal by `elapsed_ms`, draw it, recycle it if it left the view.
    ///
    /// Negative or non-finite elapsed times are treated as zero so petals never climb.
    pub fn step<R: PetalRenderer + ?Sized>(&mut self, elapsed_ms: f64, renderer: &mut R) {
        let elapsed = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        let ticks = elapsed / self.config.nominal_frame_ms;
        let (w, h) = (self.w, self.h);

        renderer.clear(w, h);

        for p in self.petals.iter_mut() {
            p.advance(ticks, self.config.sway_magnitude);
            renderer.draw(p);

            if p.y > p.exit_line(h) {
                p.respawn(&mut self.rng, w, h, &self.config);
            }
        }
    }

    pub fn petals(&self) -> &[Petal] { &self.petals }
    pub fn petals_mut(&mut self) -> &mut [Petal] { &mut self.petals }
    pub fn len(&self) -> usize { self.petals.len() }
    pub fn is_empty(&self) -> bool { self.petals.is_empty() }
    pub fn width(&self) -> f64 { self.w }
    pub fn height(&self) -> f64 { self.h }
    pub fn config(&self) -> &FieldConfig { &self.config }
}

#[inline]
fn is_drawable(w: f64, h: f64) -> bool {
    w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
}
