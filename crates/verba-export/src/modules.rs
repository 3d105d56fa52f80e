//! Exportable model components and their IO contracts.

use serde::Deserialize;

use crate::artifact::{Dtype, TensorDescriptor, TensorDim};

/// A component whose inference-graph IO can be exported.
///
/// Descriptor order is part of the contract: the first input is the
/// primary signal, the rest are auxiliary or state tensors.
pub trait ExportableModule: Send + Sync + std::fmt::Debug {
    fn cls(&self) -> &'static str;

    fn inputs(&self) -> Vec<TensorDescriptor>;

    fn outputs(&self) -> Vec<TensorDescriptor>;

    /// Whether this module exports as its own graph artifact next to the
    /// encoder graph (transducer-style decoders do).
    fn exports_standalone(&self) -> bool {
        false
    }
}

/// Feature-extraction front end. Folded into the graph, so it exports
/// no IO of its own.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioPreprocessor {
    #[serde(default = "default_features")]
    pub features: u32,
    #[serde(default = "default_window")]
    pub window: String,
}

fn default_features() -> u32 {
    64
}

fn default_window() -> String {
    "hann".to_string()
}

/// One block of the convolutional encoder stack.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvBlock {
    pub filters: u32,
    #[serde(default = "one")]
    pub repeat: u32,
    pub kernel: Vec<u32>,
    #[serde(default)]
    pub stride: Vec<u32>,
    #[serde(default)]
    pub dilation: Vec<u32>,
    #[serde(default)]
    pub dropout: f32,
    #[serde(default)]
    pub residual: bool,
    #[serde(default)]
    pub separable: bool,
    #[serde(default)]
    pub se: bool,
    #[serde(default = "default_se_context")]
    pub se_context_size: i64,
}

fn one() -> u32 {
    1
}

fn default_se_context() -> i64 {
    -1
}

/// Convolutional audio encoder.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvEncoder {
    pub feat_in: u32,
    #[serde(default = "default_activation")]
    pub activation: String,
    #[serde(default)]
    pub conv_mask: bool,
    pub blocks: Vec<ConvBlock>,
}

fn default_activation() -> String {
    "relu".to_string()
}

impl ConvEncoder {
    fn feat_out(&self) -> u64 {
        self.blocks.last().map(|b| u64::from(b.filters)).unwrap_or(u64::from(self.feat_in))
    }
}

impl ExportableModule for ConvEncoder {
    fn cls(&self) -> &'static str {
        "ConvEncoder"
    }

    fn inputs(&self) -> Vec<TensorDescriptor> {
        vec![
            TensorDescriptor::new(
                "audio_signal",
                Dtype::F32,
                vec![
                    TensorDim::sym("B"),
                    TensorDim::Fixed(u64::from(self.feat_in)),
                    TensorDim::sym("T"),
                ],
            ),
            TensorDescriptor::new("length", Dtype::I64, vec![TensorDim::sym("B")]),
        ]
    }

    fn outputs(&self) -> Vec<TensorDescriptor> {
        vec![
            TensorDescriptor::new(
                "outputs",
                Dtype::F32,
                vec![TensorDim::sym("B"), TensorDim::Fixed(self.feat_out()), TensorDim::sym("T")],
            ),
            TensorDescriptor::new("encoded_lengths", Dtype::I64, vec![TensorDim::sym("B")]),
        ]
    }
}

/// CTC decoder head: log-probabilities over the vocabulary plus blank.
#[derive(Debug, Clone, Deserialize)]
pub struct CtcDecoder {
    pub feat_in: u32,
    pub num_classes: u32,
    #[serde(default)]
    pub vocabulary: Vec<String>,
}

impl ExportableModule for CtcDecoder {
    fn cls(&self) -> &'static str {
        "CtcDecoder"
    }

    fn inputs(&self) -> Vec<TensorDescriptor> {
        vec![TensorDescriptor::new(
            "encoder_output",
            Dtype::F32,
            vec![TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.feat_in)), TensorDim::sym("T")],
        )]
    }

    fn outputs(&self) -> Vec<TensorDescriptor> {
        vec![TensorDescriptor::new(
            "logprobs",
            Dtype::F32,
            vec![
                TensorDim::sym("B"),
                TensorDim::sym("T"),
                TensorDim::Fixed(u64::from(self.num_classes) + 1),
            ],
        )]
    }
}

/// Classification head: one logit per class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationDecoder {
    pub feat_in: u32,
    pub num_classes: u32,
}

impl ExportableModule for ClassificationDecoder {
    fn cls(&self) -> &'static str {
        "ClassificationDecoder"
    }

    fn inputs(&self) -> Vec<TensorDescriptor> {
        vec![TensorDescriptor::new(
            "encoder_output",
            Dtype::F32,
            vec![TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.feat_in)), TensorDim::sym("T")],
        )]
    }

    fn outputs(&self) -> Vec<TensorDescriptor> {
        vec![TensorDescriptor::new(
            "logits",
            Dtype::F32,
            vec![TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.num_classes))],
        )]
    }
}

/// Transducer prediction/joint network. Exports as a standalone graph
/// with flattened recurrent state tensors.
#[derive(Debug, Clone, Deserialize)]
pub struct RnntDecoderJoint {
    pub feat_in: u32,
    pub pred_hidden: u32,
    pub num_classes: u32,
    /// Flattened recurrent state tensors on each side of the graph.
    #[serde(default = "default_num_states")]
    pub num_states: u32,
    /// Name stem for the indexed state tensors.
    #[serde(default = "default_state_name")]
    pub state_name: String,
}

fn default_num_states() -> u32 {
    2
}

fn default_state_name() -> String {
    "states".to_string()
}

impl ExportableModule for RnntDecoderJoint {
    fn cls(&self) -> &'static str {
        "RnntDecoderJoint"
    }

    fn inputs(&self) -> Vec<TensorDescriptor> {
        let mut inputs = vec![
            TensorDescriptor::new(
                "encoder_outputs",
                Dtype::F32,
                vec![TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.feat_in)), TensorDim::sym("T")],
            ),
            TensorDescriptor::new("targets", Dtype::I64, vec![TensorDim::sym("B"), TensorDim::sym("U")]),
            TensorDescriptor::new("target_length", Dtype::I64, vec![TensorDim::sym("B")]),
        ];
        for idx in 1..=self.num_states {
            inputs.push(TensorDescriptor::new(
                &format!("input-{}-{}", self.state_name, idx),
                Dtype::F32,
                vec![TensorDim::Fixed(1), TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.pred_hidden))],
            ));
        }
        inputs
    }

    fn outputs(&self) -> Vec<TensorDescriptor> {
        let mut outputs = vec![
            TensorDescriptor::new(
                "outputs",
                Dtype::F32,
                vec![
                    TensorDim::sym("B"),
                    TensorDim::sym("T"),
                    TensorDim::sym("U"),
                    TensorDim::Fixed(u64::from(self.num_classes) + 1),
                ],
            ),
            TensorDescriptor::new("prednet_lengths", Dtype::I64, vec![TensorDim::sym("B")]),
        ];
        for idx in 1..=self.num_states {
            outputs.push(TensorDescriptor::new(
                &format!("output-{}-{}", self.state_name, idx),
                Dtype::F32,
                vec![TensorDim::Fixed(1), TensorDim::sym("B"), TensorDim::Fixed(u64::from(self.pred_hidden))],
            ));
        }
        outputs
    }

    fn exports_standalone(&self) -> bool {
        true
    }
}
