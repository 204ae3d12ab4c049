//! Moment estimates shared by the Adam family

use ndarray::Array1;

/// Per-parameter exponential moving averages of g and g²
#[derive(Debug, Clone)]
pub(crate) struct Moments {
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>,
    v: Vec<Option<Array1<f32>>>,
}

impl Moments {
    pub(crate) fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            beta1,
            beta2,
            epsilon,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    pub(crate) fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Advance the step counter; state resets if the parameter count changes
    pub(crate) fn begin_step(&mut self, n_params: usize) {
        if self.m.len() != n_params {
            self.m = vec![None; n_params];
            self.v = vec![None; n_params];
        }
        self.t += 1;
    }

    /// Bias-corrected step size: lr * √(1 - β2^t) / (1 - β1^t)
    pub(crate) fn step_size(&self, lr: f32) -> f32 {
        let t = self.t as i32;
        lr * (1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t))
    }

    /// Fold `grad` into slot `i` and return m / (√v + ε)
    pub(crate) fn direction(&mut self, i: usize, grad: &Array1<f32>) -> Array1<f32> {
        let (b1, b2) = (self.beta1, self.beta2);

        let m = match self.m[i].take() {
            Some(m) => m * b1 + grad * (1.0 - b1),
            None => grad * (1.0 - b1),
        };
        let v = match self.v[i].take() {
            Some(v) => v * b2 + &grad.mapv(|g| g * g) * (1.0 - b2),
            None => grad.mapv(|g| g * g * (1.0 - b2)),
        };

        let eps = self.epsilon;
        let dir = ndarray::Zip::from(&m)
            .and(&v)
            .map_collect(|&m, &v| m / (v.sqrt() + eps));

        self.m[i] = Some(m);
        self.v[i] = Some(v);
        dir
    }
}
