//! Learning rate schedulers

use super::Optimizer;
use std::f32::consts::PI;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Step the scheduler (typically called after each epoch or batch)
    fn step(&mut self);

    /// Apply the current learning rate to an optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        optimizer.set_lr(self.get_lr());
    }
}

/// Multiply the learning rate by `gamma` at each milestone
///
/// lr_t = base_lr * gamma^(number of milestones <= t)
#[derive(Debug, Clone)]
pub struct MultiStepLR {
    base_lr: f32,
    milestones: Vec<usize>,
    gamma: f32,
    current_step: usize,
}

impl MultiStepLR {
    /// Create a scheduler; milestones are sorted on construction
    pub fn new(base_lr: f32, mut milestones: Vec<usize>, gamma: f32) -> Self {
        milestones.sort_unstable();
        Self {
            base_lr,
            milestones,
            gamma,
            current_step: 0,
        }
    }

    /// Decay by 10x at each milestone
    pub fn default_gamma(base_lr: f32, milestones: Vec<usize>) -> Self {
        Self::new(base_lr, milestones, 0.1)
    }

    pub fn milestones(&self) -> &[usize] {
        &self.milestones
    }
}

impl LRScheduler for MultiStepLR {
    fn get_lr(&self) -> f32 {
        let passed = self
            .milestones
            .partition_point(|&m| m <= self.current_step);
        self.base_lr * self.gamma.powi(passed as i32)
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}

/// One-cycle policy with linear annealing
///
/// Warms up linearly from `max_lr / div_factor` to `max_lr` over the first
/// `pct_start` of `total_steps`, then anneals linearly down to
/// `initial_lr / final_div_factor`. Past the end the final LR is held.
#[derive(Debug, Clone)]
pub struct OneCycleLR {
    initial_lr: f32,
    max_lr: f32,
    min_lr: f32,
    warmup_end: f32,
    total_end: f32,
    current_step: usize,
}

impl OneCycleLR {
    pub fn new(
        max_lr: f32,
        total_steps: usize,
        pct_start: f32,
        div_factor: f32,
        final_div_factor: f32,
    ) -> Self {
        let initial_lr = max_lr / div_factor;
        Self {
            initial_lr,
            max_lr,
            min_lr: initial_lr / final_div_factor,
            warmup_end: pct_start * total_steps as f32 - 1.0,
            total_end: total_steps as f32 - 1.0,
            current_step: 0,
        }
    }

    fn interpolate(start: f32, end: f32, from: f32, to: f32, step: f32) -> f32 {
        let span = to - from;
        let pct = if span <= 0.0 {
            1.0
        } else {
            ((step - from) / span).clamp(0.0, 1.0)
        };
        start + (end - start) * pct
    }
}

impl LRScheduler for OneCycleLR {
    fn get_lr(&self) -> f32 {
        let step = self.current_step as f32;
        if step <= self.warmup_end {
            Self::interpolate(self.initial_lr, self.max_lr, 0.0, self.warmup_end, step)
        } else {
            Self::interpolate(self.max_lr, self.min_lr, self.warmup_end, self.total_end, step)
        }
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}

/// Linear warmup followed by cosine annealing
///
/// During warmup the LR climbs linearly from `warmup_start_lr` to `base_lr`
/// (reached at epoch `warmup_epochs - 1`). Afterwards:
///
/// lr_t = eta_min + 0.5 * (base_lr - eta_min) * (1 + cos(π * (t - W) / (T - W)))
#[derive(Debug, Clone)]
pub struct LinearWarmupCosineAnnealingLR {
    base_lr: f32,
    warmup_epochs: usize,
    max_epochs: usize,
    warmup_start_lr: f32,
    eta_min: f32,
    current_step: usize,
}

impl LinearWarmupCosineAnnealingLR {
    pub fn new(
        base_lr: f32,
        warmup_epochs: usize,
        max_epochs: usize,
        warmup_start_lr: f32,
        eta_min: f32,
    ) -> Self {
        Self {
            base_lr,
            warmup_epochs,
            max_epochs,
            warmup_start_lr,
            eta_min,
            current_step: 0,
        }
    }
}

impl LRScheduler for LinearWarmupCosineAnnealingLR {
    fn get_lr(&self) -> f32 {
        let t = self.current_step;

        if t < self.warmup_epochs {
            let denom = self.warmup_epochs.saturating_sub(1).max(1) as f32;
            return self.warmup_start_lr
                + t as f32 * (self.base_lr - self.warmup_start_lr) / denom;
        }

        let span = self.max_epochs.saturating_sub(self.warmup_epochs);
        if span == 0 || t >= self.max_epochs {
            return self.eta_min;
        }

        let progress = (t - self.warmup_epochs) as f32 / span as f32;
        self.eta_min + 0.5 * (self.base_lr - self.eta_min) * (1.0 + (PI * progress).cos())
    }

    fn step(&mut self) {
        self.current_step += 1;
    }
}
