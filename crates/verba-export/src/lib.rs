//! verba-export: export-validation harness for inference graphs.
//!
//! Builds model instances from declarative configuration mappings,
//! serializes their inference-graph contract to a portable manifest
//! artifact on disk, and loads it back for structural assertions:
//! ordered, named input/output descriptors with a stable contract
//! (input 0 is always the primary signal).

pub mod artifact;
pub mod capability;
pub mod config;
pub mod modules;
pub mod registry;

pub use artifact::{
    check_graph, load_graph, ArtifactError, CheckError, Dtype, GraphManifest, TensorDescriptor,
    TensorDim,
};
pub use capability::accelerator_available;
pub use config::{ComponentConfig, ConfigError, ModelConfig};
pub use modules::ExportableModule;
pub use registry::{build_model, BuildError, ExportError, Model};
