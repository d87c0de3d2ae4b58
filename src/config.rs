// config.rs - Tunables for the petal field
//
// Defaults reproduce the stock background. Hosts may override any subset
// with a JSON object; missing keys keep their defaults.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::asset::AssetFallback;
use crate::error::{PetalError, Result};

/// Half-open uniform range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + rng.r#gen::<f64>() * (self.max - self.min)
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(PetalError::InvalidConfig(format!(
                "{name}: expected finite min <= max, got [{}, {})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewport area (CSS px²) per petal. Higher means fewer petals.
    pub density_factor: f64,
    pub min_count: usize,
    pub max_count: usize,

    pub size: Span,
    /// Vertical travel per nominal frame.
    pub speed: Span,
    pub initial_angle: Span,
    pub rotation_speed: Span,
    pub sway_amp: Span,
    pub sway_freq: Span,
    /// Horizontal displacement per frame at the peak of the sway wave.
    pub sway_magnitude: f64,

    /// Reference frame duration that `speed` and `rotation_speed` are expressed in.
    pub nominal_frame_ms: f64,
    /// Recycled petals re-enter from up to this fraction of the height above the top edge.
    pub recycle_stagger: f64,

    pub halo_alpha: f64,
    pub halo_scale: f64,

    pub resize_debounce_ms: f64,
    pub canvas_id: String,
    pub on_asset_error: AssetFallback,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_factor: 50_000.0,
            min_count: 18,
            max_count: 75,
            size: Span::new(6.0, 22.0),
            speed: Span::new(0.35, 0.95),
            initial_angle: Span::new(-0.25, 0.25),
            rotation_speed: Span::new(-0.01, 0.01),
            sway_amp: Span::new(6.0, 24.0),
            sway_freq: Span::new(0.006, 0.026),
            sway_magnitude: 0.5,
            nominal_frame_ms: 16.67,
            recycle_stagger: 0.25,
            halo_alpha: 0.18,
            halo_scale: 2.2,
            resize_debounce_ms: 120.0,
            canvas_id: "bgCanvas".to_string(),
            on_asset_error: AssetFallback::default(),
        }
    }
}

impl FieldConfig {
    /// Parse a JSON override object and validate the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.density_factor.is_finite() && self.density_factor > 0.0) {
            return Err(PetalError::InvalidConfig("density_factor must be positive".into()));
        }
        if !(self.nominal_frame_ms.is_finite() && self.nominal_frame_ms > 0.0) {
            return Err(PetalError::InvalidConfig("nominal_frame_ms must be positive".into()));
        }
        if self.min_count > self.max_count {
            return Err(PetalError::InvalidConfig(format!(
                "min_count {} exceeds max_count {}",
                self.min_count, self.max_count
            )));
        }

        self.size.check("size")?;
        self.speed.check("speed")?;
        self.initial_angle.check("initial_angle")?;
        self.rotation_speed.check("rotation_speed")?;
        self.sway_amp.check("sway_amp")?;
        self.sway_freq.check("sway_freq")?;

        // Petals must fall, or recycling never happens.
        if self.size.min <= 0.0 || self.speed.min < 0.0 {
            return Err(PetalError::InvalidConfig("size must be positive and speed non-negative".into()));
        }
        if !(self.recycle_stagger.is_finite() && self.recycle_stagger >= 0.0) {
            return Err(PetalError::InvalidConfig("recycle_stagger must be finite and >= 0".into()));
        }
        if !self.sway_magnitude.is_finite() {
            return Err(PetalError::InvalidConfig("sway_magnitude must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.halo_alpha) {
            return Err(PetalError::InvalidConfig("halo_alpha must be in [0, 1]".into()));
        }
        if !(self.halo_scale.is_finite() && self.halo_scale > 0.0) {
            return Err(PetalError::InvalidConfig("halo_scale must be finite and positive".into()));
        }
        if !(self.resize_debounce_ms.is_finite() && self.resize_debounce_ms >= 0.0) {
            return Err(PetalError::InvalidConfig("resize_debounce_ms must be finite and >= 0".into()));
        }
        Ok(())
    }
}
