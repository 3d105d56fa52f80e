//! Component registry and model construction.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::artifact::GraphManifest;
use crate::config::{ComponentConfig, ModelConfig};
use crate::modules::{
    AudioPreprocessor, ClassificationDecoder, ConvEncoder, CtcDecoder, ExportableModule,
    RnntDecoderJoint,
};

/// Component classes the registry can construct.
pub const COMPONENT_CLASSES: &[&str] = &[
    "AudioPreprocessor",
    "ConvEncoder",
    "CtcDecoder",
    "ClassificationDecoder",
    "RnntDecoderJoint",
];

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown component class: {0}")]
    UnknownClass(String),
    #[error("invalid params for {cls}: {message}")]
    InvalidParams { cls: String, message: String },
    #[error("{cls} cannot be used as the {section} section")]
    WrongSection { cls: String, section: &'static str },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write graph artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize graph manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A constructed model instance, ready to export its inference graph.
#[derive(Debug)]
pub struct Model {
    preprocessor: Option<AudioPreprocessor>,
    encoder: ConvEncoder,
    decoder: Box<dyn ExportableModule>,
}

/// Build a model instance from a declarative config.
pub fn build_model(config: &ModelConfig) -> Result<Model, BuildError> {
    let preprocessor = match &config.preprocessor {
        Some(section) => {
            expect_class(section, "AudioPreprocessor", "preprocessor")?;
            Some(from_params::<AudioPreprocessor>(section)?)
        }
        None => None,
    };

    expect_class(&config.encoder, "ConvEncoder", "encoder")?;
    let encoder = from_params::<ConvEncoder>(&config.encoder)?;

    let decoder: Box<dyn ExportableModule> = match config.decoder.class_name() {
        "CtcDecoder" => Box::new(from_params::<CtcDecoder>(&config.decoder)?),
        "ClassificationDecoder" => {
            Box::new(from_params::<ClassificationDecoder>(&config.decoder)?)
        }
        "RnntDecoderJoint" => Box::new(from_params::<RnntDecoderJoint>(&config.decoder)?),
        other if COMPONENT_CLASSES.contains(&other) => {
            return Err(BuildError::WrongSection { cls: other.to_string(), section: "decoder" })
        }
        other => return Err(BuildError::UnknownClass(other.to_string())),
    };

    tracing::debug!(
        encoder = config.encoder.class_name(),
        decoder = config.decoder.class_name(),
        "built model from config"
    );
    Ok(Model { preprocessor, encoder, decoder })
}

fn expect_class(
    section_config: &ComponentConfig,
    expected: &str,
    section: &'static str,
) -> Result<(), BuildError> {
    let name = section_config.class_name();
    if name == expected {
        return Ok(());
    }
    if COMPONENT_CLASSES.contains(&name) {
        Err(BuildError::WrongSection { cls: name.to_string(), section })
    } else {
        Err(BuildError::UnknownClass(name.to_string()))
    }
}

fn from_params<T: DeserializeOwned>(config: &ComponentConfig) -> Result<T, BuildError> {
    let params = match &config.params {
        serde_json::Value::Null => serde_json::json!({}),
        other => other.clone(),
    };
    serde_json::from_value(params).map_err(|e| BuildError::InvalidParams {
        cls: config.class_name().to_string(),
        message: e.to_string(),
    })
}

impl Model {
    pub fn preprocessor(&self) -> Option<&AudioPreprocessor> {
        self.preprocessor.as_ref()
    }

    /// Export the model's inference graph to `path`, returning the
    /// written artifact paths.
    ///
    /// Single-graph models write one manifest whose inputs come from the
    /// encoder and whose outputs come from the decoder head. Models with
    /// a standalone decoder graph write two artifacts, `Encoder-<file>`
    /// and `Decoder-Joint-<file>`, next to the requested path.
    pub fn export(&self, path: &Path) -> Result<Vec<PathBuf>, ExportError> {
        if self.decoder.exports_standalone() {
            let encoder_manifest =
                GraphManifest::new(self.encoder.inputs(), self.encoder.outputs());
            let decoder_manifest =
                GraphManifest::new(self.decoder.inputs(), self.decoder.outputs());
            let encoder_path = prefixed(path, "Encoder-");
            let decoder_path = prefixed(path, "Decoder-Joint-");
            write_manifest(&encoder_manifest, &encoder_path)?;
            write_manifest(&decoder_manifest, &decoder_path)?;
            Ok(vec![encoder_path, decoder_path])
        } else {
            let manifest = GraphManifest::new(self.encoder.inputs(), self.decoder.outputs());
            write_manifest(&manifest, path)?;
            Ok(vec![path.to_path_buf()])
        }
    }
}

fn prefixed(path: &Path, prefix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}", prefix, file_name))
}

fn write_manifest(manifest: &GraphManifest, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "exported graph manifest");
    Ok(())
}
