//! # Metatrain: Training Support for Few-Shot Learning
//!
//! Metatrain provides the glue a meta-learning training script needs around
//! its model: layered configuration with dotted-path overrides, optimizer and
//! scheduler construction, running meters, console/file logging, distributed
//! rank helpers, and prototype-based logit utilities.
//!
//! ## Architecture
//!
//! - **config**: YAML configuration trees, command-line overrides, typed specs
//! - **optim**: Optimizers (SGD, Adam, AdamW, SAM) and LR schedulers
//! - **train**: Meters, timers and the mirroring logger
//! - **ops**: Numeric helpers (safe division, truncated normal, logits, accuracy)
//! - **dist**: Rank and world-size queries, barriers
//! - **io**: Run directory preparation

pub mod config;
pub mod dist;
pub mod io;
pub mod ops;
pub mod optim;
pub mod train;

pub mod error;

// Re-export commonly used types
pub use config::{apply_overrides, ConfigValue};
pub use error::{Error, Result};
