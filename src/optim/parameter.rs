//! Trainable parameters

use crate::error::{Error, Result};
use ndarray::Array1;

/// A named, flat parameter buffer with an optional gradient
///
/// Data is stored flat; `shape` records the logical layout so parameter
/// counts and shape checks stay meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    shape: Vec<usize>,
    data: Array1<f32>,
    grad: Option<Array1<f32>>,
}

impl Parameter {
    /// Create a parameter, checking that `data` matches `shape`
    pub fn new(name: impl Into<String>, shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                got: vec![data.len()],
            });
        }
        Ok(Self {
            name: name.into(),
            shape,
            data: Array1::from(data),
            grad: None,
        })
    }

    /// Create a 1-D parameter
    pub fn from_vec(name: impl Into<String>, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            shape: vec![data.len()],
            data: Array1::from(data),
            grad: None,
        }
    }

    /// Create a zero-initialized parameter
    pub fn zeros(name: impl Into<String>, shape: Vec<usize>) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            name: name.into(),
            shape,
            data: Array1::zeros(numel),
            grad: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of scalar elements
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    pub fn grad(&self) -> Option<&Array1<f32>> {
        self.grad.as_ref()
    }

    /// Attach a gradient; its length must match the parameter
    pub fn set_grad(&mut self, grad: Array1<f32>) -> Result<()> {
        if grad.len() != self.data.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.data.len()],
                got: vec![grad.len()],
            });
        }
        self.grad = Some(grad);
        Ok(())
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }
}
