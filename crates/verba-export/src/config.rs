//! Declarative model configuration.
//!
//! A model config is a small mapping of section name to component
//! config, each naming a component class and its constructor params.
//! Loadable from YAML or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One component section: a class identifier plus constructor params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Component class. Dotted paths are accepted; only the last
    /// segment is resolved against the registry.
    pub cls: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Full model configuration: optional preprocessor, encoder, decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub preprocessor: Option<ComponentConfig>,
    pub encoder: ComponentConfig,
    pub decoder: ComponentConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read model config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse model config: {0}")]
    Parse(String),
}

impl ModelConfig {
    /// Load a YAML model config from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl ComponentConfig {
    /// Registry name: last segment of a possibly dotted class path.
    pub fn class_name(&self) -> &str {
        self.cls.rsplit('.').next().unwrap_or(&self.cls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_minimal() {
        let config = ModelConfig::from_yaml(
            r#"
encoder:
  cls: ConvEncoder
  params:
    feat_in: 64
    filters: 1024
decoder:
  cls: CtcDecoder
  params:
    feat_in: 1024
    num_classes: 28
"#,
        )
        .unwrap();
        assert!(config.preprocessor.is_none());
        assert_eq!(config.encoder.cls, "ConvEncoder");
        assert_eq!(config.decoder.params["num_classes"], 28);
    }

    #[test]
    fn test_dotted_class_path_resolves_to_last_segment() {
        let component = ComponentConfig {
            cls: "verba.collections.asr.modules.ConvEncoder".to_string(),
            params: serde_json::Value::Null,
        };
        assert_eq!(component.class_name(), "ConvEncoder");
    }

    #[test]
    fn test_missing_encoder_is_parse_error() {
        let err = ModelConfig::from_yaml("decoder:\n  cls: CtcDecoder\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
