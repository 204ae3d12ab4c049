//! Adam optimizer

use super::moments::Moments;
use super::{Optimizer, Parameter};

/// Adam optimizer (Adaptive Moment Estimation) with L2 weight decay
///
/// g' = g + λθ;  θ = θ - lr_t * m / (√v + ε)
pub struct Adam {
    lr: f32,
    weight_decay: f32,
    moments: Moments,
}

impl Adam {
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            weight_decay: 0.0,
            moments: Moments::new(beta1, beta2, epsilon),
        }
    }

    /// β1 = 0.9, β2 = 0.999, ε = 1e-8
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Add L2 weight decay (folded into the gradient)
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Parameter]) {
        self.moments.begin_step(params.len());
        let lr_t = self.moments.step_size(self.lr);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let grad = if self.weight_decay > 0.0 {
                grad + &(param.data() * self.weight_decay)
            } else {
                grad.clone()
            };

            let dir = self.moments.direction(i, &grad);
            param.data_mut().scaled_add(-lr_t, &dir);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
