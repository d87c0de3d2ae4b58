// error.rs - Error types for setup and configuration
//
// The simulation itself never fails. Everything here comes from
// DOM setup, config parsing or asset loading.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PetalError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    #[error("2d context unavailable: {0}")]
    Context(String),

    #[error("DOM call failed: {0}")]
    Dom(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("petal asset failed to load: {0}")]
    AssetLoad(String),
}

pub type Result<T> = std::result::Result<T, PetalError>;

#[cfg(target_arch = "wasm32")]
impl PetalError {
    /// Wrap a rejected JS call.
    pub fn dom(err: JsValue) -> Self {
        PetalError::Dom(format!("{:?}", err))
    }
}

impl From<PetalError> for JsValue {
    fn from(err: PetalError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert() {
        let err: PetalError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PetalError::Config(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(PetalError::NoBody.to_string(), "document has no body");
        assert_eq!(
            PetalError::InvalidConfig("min_count > max_count".into()).to_string(),
            "invalid config: min_count > max_count"
        );
    }
}
