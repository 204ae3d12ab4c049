//! Build training components from configuration

use super::schema::OptimSpec;
use crate::error::{Error, Result};
use crate::optim::{
    Adam, AdamW, LRScheduler, LinearWarmupCosineAnnealingLR, MultiStepLR, OneCycleLR, Optimizer,
    Sam, SGD,
};

/// Optimizer, scheduler and stepping policy built from an [`OptimSpec`]
pub struct OptimizerSetup {
    pub optimizer: Box<dyn Optimizer>,

    /// `None` when the step scheduler has no milestones
    pub scheduler: Option<Box<dyn LRScheduler>>,

    /// `true`: step the scheduler once per epoch; `false`: once per batch
    pub update_lr_every_epoch: bool,
}

impl std::fmt::Debug for OptimizerSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerSetup")
            .field("lr", &self.optimizer.lr())
            .field("has_scheduler", &self.scheduler.is_some())
            .field("update_lr_every_epoch", &self.update_lr_every_epoch)
            .finish()
    }
}

/// Build the optimizer and LR scheduler described by `spec`
///
/// `max_steps` is the total number of optimizer steps; only the onecycle
/// scheduler uses it.
pub fn make_optimizer(spec: &OptimSpec, max_steps: usize) -> Result<OptimizerSetup> {
    let weight_decay = spec.weight_decay.unwrap_or(0.0);

    let optimizer: Box<dyn Optimizer> = if spec.use_sam {
        let base = AdamW::new(spec.lr, 0.9, 0.999, 1e-8, weight_decay);
        Box::new(Sam::new(Box::new(base), spec.sam_rho))
    } else {
        match spec.name.to_lowercase().as_str() {
            "sgd" => Box::new(SGD::with_weight_decay(spec.lr, spec.momentum, weight_decay)),
            "adam" => Box::new(Adam::default_params(spec.lr).with_weight_decay(weight_decay)),
            "adamw" => Box::new(AdamW::new(spec.lr, 0.9, 0.999, spec.eps, weight_decay)),
            name => {
                return Err(Error::ConfigError(format!(
                    "Unknown optimizer: {}. Supported: sgd, adam, adamw",
                    name
                )))
            }
        }
    };

    let (scheduler, update_lr_every_epoch): (Option<Box<dyn LRScheduler>>, bool) =
        match spec.scheduler.as_str() {
            "step" => match &spec.milestones {
                Some(milestones) if !milestones.is_empty() => (
                    boxed(MultiStepLR::default_gamma(spec.lr, milestones.clone())),
                    true,
                ),
                _ => (None, true),
            },
            "onecycle" => (
                boxed(OneCycleLR::new(spec.lr, max_steps + 100, 0.05, 25.0, 1e4)),
                false,
            ),
            "warmup_cosine" => {
                let warmup_epochs = spec.warmup_epochs.ok_or_else(|| {
                    Error::ConfigError("warmup_cosine requires warmup_epochs".to_string())
                })?;
                let max_epochs = spec.max_epochs.ok_or_else(|| {
                    Error::ConfigError("warmup_cosine requires max_epochs".to_string())
                })?;
                let warmup_start_lr = spec.warmup_start_lr.ok_or_else(|| {
                    Error::ConfigError("warmup_cosine requires warmup_start_lr".to_string())
                })?;
                (
                    boxed(LinearWarmupCosineAnnealingLR::new(
                        spec.lr,
                        warmup_epochs,
                        max_epochs,
                        warmup_start_lr,
                        0.0,
                    )),
                    true,
                )
            }
            name => {
                return Err(Error::ConfigError(format!(
                    "Unknown scheduler: {}. Supported: step, onecycle, warmup_cosine",
                    name
                )))
            }
        };

    Ok(OptimizerSetup {
        optimizer,
        scheduler,
        update_lr_every_epoch,
    })
}

fn boxed<S: LRScheduler + 'static>(scheduler: S) -> Option<Box<dyn LRScheduler>> {
    Some(Box::new(scheduler))
}
