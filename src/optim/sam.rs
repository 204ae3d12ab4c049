//! Sharpness-Aware Minimization

use super::{Optimizer, Parameter};
use ndarray::Array1;

/// SAM wrapper around a base optimizer
///
/// A training step is two gradient evaluations:
///
/// 1. compute gradients, call [`Optimizer::first_step`] to move to
///    θ + ρ·g/‖g‖
/// 2. recompute gradients at the perturbed point, call [`Optimizer::step`],
///    which restores θ and applies the base optimizer update
///
/// Calling `step` without `first_step` degrades to the base optimizer.
pub struct Sam {
    base: Box<dyn Optimizer>,
    rho: f32,
    perturbations: Vec<Option<Array1<f32>>>,
}

impl Sam {
    pub fn new(base: Box<dyn Optimizer>, rho: f32) -> Self {
        Self {
            base,
            rho,
            perturbations: Vec::new(),
        }
    }

    pub fn rho(&self) -> f32 {
        self.rho
    }

    /// Whether the parameters currently sit at the perturbed point
    pub fn is_perturbed(&self) -> bool {
        self.perturbations.iter().any(Option::is_some)
    }

    fn grad_norm(params: &[Parameter]) -> f32 {
        params
            .iter()
            .filter_map(Parameter::grad)
            .map(|g| g.dot(g))
            .sum::<f32>()
            .sqrt()
    }

    fn restore(&mut self, params: &mut [Parameter]) {
        for (param, e_w) in params.iter_mut().zip(self.perturbations.iter_mut()) {
            if let Some(e_w) = e_w.take() {
                *param.data_mut() = param.data() - &e_w;
            }
        }
    }
}

impl Optimizer for Sam {
    fn first_step(&mut self, params: &mut [Parameter]) {
        // A second first_step without an intervening step must not stack perturbations
        self.restore(params);

        let scale = self.rho / (Self::grad_norm(params) + 1e-12);
        self.perturbations = params
            .iter_mut()
            .map(|param| {
                let e_w = param.grad()? * scale;
                *param.data_mut() = param.data() + &e_w;
                Some(e_w)
            })
            .collect();
    }

    fn step(&mut self, params: &mut [Parameter]) {
        self.restore(params);
        self.base.step(params);
    }

    fn lr(&self) -> f32 {
        self.base.lr()
    }

    fn set_lr(&mut self, lr: f32) {
        self.base.set_lr(lr);
    }
}
