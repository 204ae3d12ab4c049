//! Optimizers and learning rate schedulers

mod adam;
mod adamw;
mod moments;
mod optimizer;
mod parameter;
mod sam;
mod scheduler;
mod sgd;

pub use adam::Adam;
pub use adamw::AdamW;
pub use optimizer::Optimizer;
pub use parameter::Parameter;
pub use sam::Sam;
pub use scheduler::{LRScheduler, LinearWarmupCosineAnnealingLR, MultiStepLR, OneCycleLR};
pub use sgd::SGD;
