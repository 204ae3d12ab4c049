//! Configuration validation

use super::schema::TrainSpec;
use crate::ops::LogitMetric;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid learning rate: {0} (must be > 0.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid episode shape: {n_way}-way {n_shot}-shot (both must be > 0)")]
    InvalidEpisode { n_way: usize, n_shot: usize },

    #[error("Invalid optimizer: {0} (must be one of: sgd, adam, adamw)")]
    InvalidOptimizer(String),

    #[error("Invalid scheduler: {0} (must be one of: step, onecycle, warmup_cosine)")]
    InvalidScheduler(String),

    #[error("Invalid metric: {0} (must be one of: dot, cos, sqr)")]
    InvalidMetric(String),

    #[error("Invalid weight decay: {0} (must be >= 0.0)")]
    InvalidWeightDecay(f32),

    #[error("Milestones must be strictly increasing: {0:?}")]
    UnsortedMilestones(Vec<usize>),

    #[error("Scheduler warmup_cosine requires optimizer.{0}")]
    MissingWarmupField(&'static str),

    #[error("Invalid SAM rho: {0} (must be > 0.0)")]
    InvalidSamRho(f32),
}

/// Validate a training specification
///
/// Checks:
/// - Numeric values are in valid ranges
/// - Names match known optimizers, schedulers and metrics
/// - Scheduler-specific fields are present
pub fn validate_config(spec: &TrainSpec) -> Result<(), ValidationError> {
    if spec.data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(spec.data.batch_size));
    }

    if spec.data.n_way == 0 || spec.data.n_shot == 0 {
        return Err(ValidationError::InvalidEpisode {
            n_way: spec.data.n_way,
            n_shot: spec.data.n_shot,
        });
    }

    if spec.training.max_epoch == 0 {
        return Err(ValidationError::InvalidEpochs(spec.training.max_epoch));
    }

    if spec.model.metric.parse::<LogitMetric>().is_err() {
        return Err(ValidationError::InvalidMetric(spec.model.metric.clone()));
    }

    let optim = &spec.optimizer;

    if optim.lr <= 0.0 || !optim.lr.is_finite() {
        return Err(ValidationError::InvalidLearningRate(optim.lr));
    }

    if !matches!(optim.name.to_lowercase().as_str(), "sgd" | "adam" | "adamw") {
        return Err(ValidationError::InvalidOptimizer(optim.name.clone()));
    }

    if let Some(wd) = optim.weight_decay {
        if wd < 0.0 {
            return Err(ValidationError::InvalidWeightDecay(wd));
        }
    }

    if optim.use_sam && optim.sam_rho <= 0.0 {
        return Err(ValidationError::InvalidSamRho(optim.sam_rho));
    }

    if let Some(milestones) = &optim.milestones {
        if milestones.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ValidationError::UnsortedMilestones(milestones.clone()));
        }
    }

    match optim.scheduler.as_str() {
        "step" | "onecycle" => {}
        "warmup_cosine" => {
            if optim.warmup_epochs.is_none() {
                return Err(ValidationError::MissingWarmupField("warmup_epochs"));
            }
            if optim.max_epochs.is_none() {
                return Err(ValidationError::MissingWarmupField("max_epochs"));
            }
            if optim.warmup_start_lr.is_none() {
                return Err(ValidationError::MissingWarmupField("warmup_start_lr"));
            }
        }
        other => return Err(ValidationError::InvalidScheduler(other.to_string())),
    }

    Ok(())
}
