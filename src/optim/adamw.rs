//! AdamW optimizer (Adam with decoupled weight decay)

use super::moments::Moments;
use super::{Optimizer, Parameter};

/// AdamW optimizer
///
/// Decay shrinks the parameters directly instead of entering the gradient:
///
/// θ = (1 - lr * λ) * θ - lr_t * m / (√v + ε)
pub struct AdamW {
    lr: f32,
    weight_decay: f32,
    moments: Moments,
}

impl AdamW {
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self {
            lr,
            weight_decay,
            moments: Moments::new(beta1, beta2, epsilon),
        }
    }

    /// β1 = 0.9, β2 = 0.999, ε = 1e-8, λ = 0.01
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, 0.01)
    }

    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    pub fn epsilon(&self) -> f32 {
        self.moments.epsilon()
    }
}

impl Optimizer for AdamW {
    fn step(&mut self, params: &mut [Parameter]) {
        self.moments.begin_step(params.len());
        let lr_t = self.moments.step_size(self.lr);
        let decay = 1.0 - self.lr * self.weight_decay;

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad().cloned() else { continue };

            let dir = self.moments.direction(i, &grad);
            let data = param.data_mut();
            data.mapv_inplace(|x| x * decay);
            data.scaled_add(-lr_t, &dir);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
