use wasm_bindgen::prelude::*;

pub mod asset;
pub mod config;
pub mod driver;
pub mod error;
pub mod render;
pub mod sim;

pub use config::FieldConfig;
pub use error::PetalError;
pub use render::{InstanceBuffer, NullRenderer, PetalRenderer};
pub use sim::{Petal, PetalField};

#[cfg(target_arch = "wasm32")]
pub use driver::PetalBackground;

// ============================================================================
// PETAL SIM - Headless field for hosts that draw petals themselves
// ============================================================================
//
// Each tick rewrites the instance buffer: [x, y, angle, size] f32 per petal.
// JS reads it straight out of wasm memory via output_ptr/output_len.

#[wasm_bindgen]
pub struct PetalSim {
    field: PetalField,
    out: InstanceBuffer,
}

impl PetalSim {
    pub fn from_config(w: f64, h: f64, seed: u32, config: FieldConfig) -> error::Result<Self> {
        let mut field = PetalField::new(config, seed as u64)?;
        field.reinitialize(w, h);
        Ok(Self { field, out: InstanceBuffer::new() })
    }

    pub fn field(&self) -> &PetalField { &self.field }
    pub fn instances(&self) -> &[f32] { self.out.as_slice() }
}

#[wasm_bindgen]
impl PetalSim {
    #[wasm_bindgen(constructor)]
    pub fn new(w: f64, h: f64, seed: u32) -> Result<PetalSim, JsValue> {
        Ok(Self::from_config(w, h, seed, FieldConfig::default())?)
    }

    /// Same as `new`, with a JSON object overriding any `FieldConfig` keys.
    pub fn with_config(w: f64, h: f64, seed: u32, config_json: &str) -> Result<PetalSim, JsValue> {
        let config = FieldConfig::from_json(config_json)?;
        Ok(Self::from_config(w, h, seed, config)?)
    }

    pub fn tick(&mut self, elapsed_ms: f64) {
        self.field.step(elapsed_ms, &mut self.out);
    }

    pub fn resize(&mut self, w: f64, h: f64) {
        self.field.reinitialize(w, h);
        self.out.clear(w, h);
    }

    pub fn output_ptr(&self) -> *const f32 { self.out.ptr() }
    pub fn output_len(&self) -> usize { self.out.len() }
    pub fn count(&self) -> usize { self.field.len() }
    pub fn width(&self) -> f64 { self.field.width() }
    pub fn height(&self) -> f64 { self.field.height() }
}

// ============================================================================
// Browser entry point
// ============================================================================

/// Mount the full-page petal background. `config_json` overrides defaults.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<PetalBackground, JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let config = match config_json {
        Some(json) => FieldConfig::from_json(&json)?,
        None => FieldConfig::default(),
    };
    let background = PetalBackground::mount(config)?;
    log::info!("petal background mounted");
    Ok(background)
}
