//! Layer merging
//!
//! File and override layers are partial documents: only the keys a layer
//! actually contains replace values from earlier layers, even when the new
//! value equals the built-in default.

use crate::{error::ConfigError, Config, Result};
use serde_json::Value;

/// Recursively copy the keys present in `overlay` onto `base`
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (slot, value) => *slot = value,
    }
}

/// Apply a partial document on top of `base`
pub fn apply_layer(base: &Config, layer: Value) -> Result<Config> {
    let mut merged = serde_json::to_value(base).map_err(layer_error)?;
    merge_values(&mut merged, layer);
    serde_json::from_value(merged).map_err(layer_error)
}

fn layer_error(err: serde_json::Error) -> ConfigError {
    ConfigError::ValidationError {
        field: "config".to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Granularity, LlmBackend};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn present_keys_win() {
        let merged = apply_layer(
            &Config::default(),
            json!({ "retrieval": { "top_k": 8 }, "llm": { "backend": "echo" } }),
        )
        .unwrap();
        assert_eq!(merged.retrieval.top_k, Some(8));
        assert_eq!(merged.llm.backend, LlmBackend::Echo);
        assert_eq!(merged.server, Config::default().server);
    }

    #[test]
    fn absent_keys_keep_earlier_layers() {
        let mut base = Config::default();
        base.chunking.week_end = "saturday".to_string();
        base.embedding.model_name = Some("custom".to_string());

        let merged = apply_layer(&base, json!({ "server": { "bind": "0.0.0.0:80" } })).unwrap();
        assert_eq!(merged.chunking.week_end, "saturday");
        assert_eq!(merged.embedding.model_name.as_deref(), Some("custom"));
        assert_eq!(merged.server.bind, "0.0.0.0:80");
    }

    #[test]
    fn later_layer_can_set_a_default_value() {
        let mut base = Config::default();
        base.retrieval.granularity = Granularity::Weekly;
        let layer = json!({ "retrieval": { "granularity": "daily" } });
        let merged = apply_layer(&base, layer).unwrap();
        assert_eq!(merged.retrieval.granularity, Granularity::Daily);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = apply_layer(&Config::default(), json!({ "retrieval": { "top_k": "many" } }))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
