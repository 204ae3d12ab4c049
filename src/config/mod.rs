//! Declarative YAML configuration with command-line overrides
//!
//! A config file is loaded into an untyped [`ConfigValue`] tree, patched with
//! `path value` pairs from the command line, and then deserialized into a
//! typed [`TrainSpec`].
//!
//! # Example
//!
//! ```yaml
//! model:
//!   encoder: resnet12
//!   metric: cos
//!
//! data:
//!   dataset: mini-imagenet
//!   n_way: 5
//!   n_shot: 1
//!   batch_size: 4
//!
//! optimizer:
//!   name: sgd
//!   lr: 0.1
//!   weight_decay: 0.0005
//!   milestones: [90]
//! ```
//!
//! ```bash
//! metatrain show config.yaml optimizer.lr 0.01 data.n_shot 5
//! ```

mod builder;
mod cli;
mod overrides;
mod schema;
mod train;
mod validate;
mod value;

#[cfg(test)]
mod tests;


pub use builder::{make_optimizer, OptimizerSetup};
pub use cli::{
    parse_args, Cli, Command, OutputFormat, PrepareArgs, ScheduleArgs, ShowArgs, ValidateArgs,
};
pub use overrides::{apply_overrides, coerce_scalar, coerce_value, expand_path, merge};
pub use schema::{DataSpec, ModelSpec, OptimSpec, TrainSpec, TrainingParams};
pub use train::{load_config, load_spec, resolve_config, spec_from_value};
pub use validate::{validate_config, ValidationError};
pub use value::{ConfigMap, ConfigValue};
