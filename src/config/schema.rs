//! Typed schema for few-shot training configuration

use super::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Complete training specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSpec {
    /// Encoder and classifier head
    pub model: ModelSpec,

    /// Episode sampling and loading
    pub data: DataSpec,

    /// Optimizer and LR schedule
    pub optimizer: OptimSpec,

    /// Training loop parameters
    #[serde(default)]
    pub training: TrainingParams,
}

/// Model description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Encoder name (e.g. resnet12, conv4)
    pub encoder: String,

    /// Free-form encoder arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub encoder_args: BTreeMap<String, ConfigValue>,

    /// Classifier head
    #[serde(default = "default_classifier")]
    pub classifier: String,

    /// Similarity between query features and prototypes: "dot" | "cos" | "sqr"
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Logit temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Episodic data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSpec {
    /// Dataset name
    pub dataset: String,

    /// Dataset root directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Classes per episode
    #[serde(default = "default_n_way")]
    pub n_way: usize,

    /// Support examples per class
    #[serde(default = "default_n_shot")]
    pub n_shot: usize,

    /// Query examples per class
    #[serde(default = "default_n_query")]
    pub n_query: usize,

    /// Episodes per batch
    pub batch_size: usize,

    /// Loader worker threads
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

/// Optimizer specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimSpec {
    /// Optimizer name: "sgd" | "adam" | "adamw"
    pub name: String,

    /// Learning rate
    pub lr: f32,

    /// Weight decay (absent means 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_decay: Option<f32>,

    /// Epochs at which the step scheduler decays the LR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<usize>>,

    /// Scheduler: "step" | "onecycle" | "warmup_cosine"
    #[serde(default = "default_scheduler")]
    pub scheduler: String,

    /// Adam epsilon
    #[serde(default = "default_eps")]
    pub eps: f32,

    /// SGD momentum
    #[serde(default = "default_momentum")]
    pub momentum: f32,

    /// Wrap the optimizer in sharpness-aware minimization
    #[serde(default)]
    pub use_sam: bool,

    /// SAM neighborhood radius
    #[serde(default = "default_sam_rho")]
    pub sam_rho: f32,

    /// Warmup length for warmup_cosine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_epochs: Option<usize>,

    /// Total length for warmup_cosine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_epochs: Option<usize>,

    /// Starting LR for warmup_cosine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_start_lr: Option<f32>,
}

impl OptimSpec {
    /// Minimal spec with every optional field at its default
    pub fn new(name: impl Into<String>, lr: f32) -> Self {
        Self {
            name: name.into(),
            lr,
            weight_decay: None,
            milestones: None,
            scheduler: default_scheduler(),
            eps: default_eps(),
            momentum: default_momentum(),
            use_sam: false,
            sam_rho: default_sam_rho(),
            warmup_epochs: None,
            max_epochs: None,
            warmup_start_lr: None,
        }
    }
}

/// Training loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Number of epochs
    #[serde(default = "default_max_epoch")]
    pub max_epoch: usize,

    /// Save a checkpoint every N epochs
    #[serde(default = "default_save_epoch")]
    pub save_epoch: usize,

    /// Run directory for checkpoints, logs and the resolved config
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Random seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Total optimizer steps (required by the onecycle scheduler)
    #[serde(default)]
    pub max_steps: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            max_epoch: default_max_epoch(),
            save_epoch: default_save_epoch(),
            save_dir: default_save_dir(),
            seed: None,
            max_steps: 0,
        }
    }
}

fn default_classifier() -> String {
    "protonet".to_string()
}

fn default_metric() -> String {
    "sqr".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_n_way() -> usize {
    5
}

fn default_n_shot() -> usize {
    1
}

fn default_n_query() -> usize {
    15
}

fn default_num_workers() -> usize {
    8
}

fn default_scheduler() -> String {
    "step".to_string()
}

fn default_eps() -> f32 {
    1e-8
}

fn default_momentum() -> f32 {
    0.9
}

fn default_sam_rho() -> f32 {
    0.005
}

fn default_max_epoch() -> usize {
    100
}

fn default_save_epoch() -> usize {
    10
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("./save")
}
