//! Stochastic Gradient Descent optimizer

use super::{Optimizer, Parameter};
use ndarray::Array1;

/// SGD with momentum and L2 weight decay
///
/// buf = momentum * buf + (g + λ * θ);  θ = θ - lr * buf
pub struct SGD {
    lr: f32,
    momentum: f32,
    weight_decay: f32,
    velocities: Vec<Option<Array1<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self::with_weight_decay(lr, momentum, 0.0)
    }

    /// Create SGD with L2 weight decay
    pub fn with_weight_decay(lr: f32, momentum: f32, weight_decay: f32) -> Self {
        Self {
            lr,
            momentum,
            weight_decay,
            velocities: Vec::new(),
        }
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    /// Initialize velocities if needed
    fn ensure_velocities(&mut self, params: &[Parameter]) {
        if self.velocities.len() != params.len() {
            self.velocities = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [Parameter]) {
        self.ensure_velocities(params);

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else { continue };

            let mut grad = grad.clone();
            if self.weight_decay > 0.0 {
                grad = grad + param.data() * self.weight_decay;
            }

            let update = if self.momentum > 0.0 {
                let velocity = match &self.velocities[i] {
                    Some(v) => v * self.momentum + &grad,
                    None => grad,
                };
                self.velocities[i] = Some(velocity.clone());
                velocity
            } else {
                grad
            };

            *param.data_mut() = param.data() - &(update * self.lr);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
