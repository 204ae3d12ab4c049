//! Optimizer trait

use super::Parameter;

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Perform a single optimization step
    fn step(&mut self, params: &mut [Parameter]);

    /// Move to the adversarial neighbor before the second gradient pass.
    /// Only sharpness-aware optimizers act on this.
    fn first_step(&mut self, _params: &mut [Parameter]) {}

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [Parameter]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
