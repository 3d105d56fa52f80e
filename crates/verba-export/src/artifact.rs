//! Graph manifest artifact: the on-disk inference-graph contract.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Producer string stamped into every manifest.
pub const PRODUCER: &str = concat!("verba-export/", env!("CARGO_PKG_VERSION"));

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    F32,
    I32,
    I64,
}

/// One dimension: either a symbolic batch/time axis or a fixed size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TensorDim {
    Fixed(u64),
    Sym(String),
}

impl TensorDim {
    pub fn sym(name: &str) -> TensorDim {
        TensorDim::Sym(name.to_string())
    }
}

/// A named, ordered tensor in the graph contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorDescriptor {
    pub name: String,
    pub dtype: Dtype,
    pub shape: Vec<TensorDim>,
}

impl TensorDescriptor {
    pub fn new(name: &str, dtype: Dtype, shape: Vec<TensorDim>) -> Self {
        Self { name: name.to_string(), dtype, shape }
    }
}

/// The exported inference-graph manifest.
///
/// Descriptor order is the contract: input 0 is always the primary
/// signal, later inputs are auxiliary or state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphManifest {
    pub id: Uuid,
    pub producer: String,
    pub created_at: DateTime<Utc>,
    pub inputs: Vec<TensorDescriptor>,
    pub outputs: Vec<TensorDescriptor>,
    /// blake3 over the serialized descriptor lists.
    pub artifact_hash: String,
}

impl GraphManifest {
    pub fn new(inputs: Vec<TensorDescriptor>, outputs: Vec<TensorDescriptor>) -> Self {
        let artifact_hash = descriptor_hash(&inputs, &outputs);
        Self {
            id: Uuid::new_v4(),
            producer: PRODUCER.to_string(),
            created_at: Utc::now(),
            inputs,
            outputs,
            artifact_hash,
        }
    }
}

fn descriptor_hash(inputs: &[TensorDescriptor], outputs: &[TensorDescriptor]) -> String {
    let payload = serde_json::to_string(&(inputs, outputs)).unwrap_or_default();
    format!("blake3:{}", blake3::hash(payload.as_bytes()))
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read graph artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse graph artifact {path}: {message}")]
    Parse { path: String, message: String },
}

/// Load a graph manifest artifact from disk.
pub fn load_graph(path: &Path) -> Result<GraphManifest, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("graph has no inputs")]
    NoInputs,
    #[error("graph has no outputs")]
    NoOutputs,
    #[error("unnamed {io} tensor at index {index}")]
    UnnamedTensor { io: &'static str, index: usize },
    #[error("duplicate {io} tensor name: {name}")]
    DuplicateName { io: &'static str, name: String },
    #[error("tensor {name} has an empty shape")]
    EmptyShape { name: String },
    #[error("tensor {name} has a zero-sized dimension")]
    ZeroDim { name: String },
    #[error("tensor {name} has an unnamed symbolic dimension")]
    UnnamedDim { name: String },
    #[error("artifact hash mismatch: manifest says {stored}, payload is {actual}")]
    HashMismatch { stored: String, actual: String },
}

/// Full structural check of a loaded manifest. Throws on the first
/// violation, mirroring a graph checker's full_check behavior.
pub fn check_graph(manifest: &GraphManifest) -> Result<(), CheckError> {
    if manifest.inputs.is_empty() {
        return Err(CheckError::NoInputs);
    }
    if manifest.outputs.is_empty() {
        return Err(CheckError::NoOutputs);
    }
    check_descriptors("input", &manifest.inputs)?;
    check_descriptors("output", &manifest.outputs)?;

    let actual = descriptor_hash(&manifest.inputs, &manifest.outputs);
    if actual != manifest.artifact_hash {
        return Err(CheckError::HashMismatch {
            stored: manifest.artifact_hash.clone(),
            actual,
        });
    }
    Ok(())
}

fn check_descriptors(io: &'static str, descriptors: &[TensorDescriptor]) -> Result<(), CheckError> {
    let mut seen = std::collections::BTreeSet::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        if descriptor.name.is_empty() {
            return Err(CheckError::UnnamedTensor { io, index });
        }
        if !seen.insert(descriptor.name.as_str()) {
            return Err(CheckError::DuplicateName { io, name: descriptor.name.clone() });
        }
        if descriptor.shape.is_empty() {
            return Err(CheckError::EmptyShape { name: descriptor.name.clone() });
        }
        for dim in &descriptor.shape {
            match dim {
                TensorDim::Fixed(0) => {
                    return Err(CheckError::ZeroDim { name: descriptor.name.clone() })
                }
                TensorDim::Sym(s) if s.is_empty() => {
                    return Err(CheckError::UnnamedDim { name: descriptor.name.clone() })
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> TensorDescriptor {
        TensorDescriptor::new(
            "audio_signal",
            Dtype::F32,
            vec![TensorDim::sym("B"), TensorDim::Fixed(64), TensorDim::sym("T")],
        )
    }

    fn logprobs() -> TensorDescriptor {
        TensorDescriptor::new(
            "logprobs",
            Dtype::F32,
            vec![TensorDim::sym("B"), TensorDim::sym("T"), TensorDim::Fixed(29)],
        )
    }

    #[test]
    fn test_check_accepts_well_formed_manifest() {
        let manifest = GraphManifest::new(vec![signal()], vec![logprobs()]);
        assert_eq!(check_graph(&manifest), Ok(()));
    }

    #[test]
    fn test_check_rejects_empty_io() {
        let manifest = GraphManifest::new(Vec::new(), vec![logprobs()]);
        assert_eq!(check_graph(&manifest), Err(CheckError::NoInputs));
        let manifest = GraphManifest::new(vec![signal()], Vec::new());
        assert_eq!(check_graph(&manifest), Err(CheckError::NoOutputs));
    }

    #[test]
    fn test_check_rejects_duplicate_names() {
        let manifest = GraphManifest::new(vec![signal(), signal()], vec![logprobs()]);
        assert_eq!(
            check_graph(&manifest),
            Err(CheckError::DuplicateName { io: "input", name: "audio_signal".to_string() })
        );
    }

    #[test]
    fn test_check_rejects_zero_dim() {
        let bad = TensorDescriptor::new("length", Dtype::I64, vec![TensorDim::Fixed(0)]);
        let manifest = GraphManifest::new(vec![signal(), bad], vec![logprobs()]);
        assert_eq!(
            check_graph(&manifest),
            Err(CheckError::ZeroDim { name: "length".to_string() })
        );
    }

    #[test]
    fn test_check_detects_tampered_descriptors() {
        let mut manifest = GraphManifest::new(vec![signal()], vec![logprobs()]);
        manifest.outputs[0].name = "logits".to_string();
        assert!(matches!(check_graph(&manifest), Err(CheckError::HashMismatch { .. })));
    }

    #[test]
    fn test_manifest_json_round_trip() {
        let manifest = GraphManifest::new(vec![signal()], vec![logprobs()]);
        let json = serde_json::to_string(&manifest).unwrap();
        let loaded: GraphManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.artifact_hash, manifest.artifact_hash);
        assert_eq!(loaded.inputs, manifest.inputs);
        assert_eq!(check_graph(&loaded), Ok(()));
    }
}
