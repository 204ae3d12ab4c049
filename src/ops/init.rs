//! Truncated normal initialization
//!
//! Samples are drawn with the inverse-CDF method: draw uniformly between the
//! normal CDF values of the bounds, map back through `erf⁻¹`, then rescale to
//! the requested mean and standard deviation.

use crate::error::{Error, Result};
use ndarray::{Array, ArrayBase, DataMut, Dimension, ShapeBuilder};
use rand::Rng;
use statrs::function::erf::{erf, erf_inv};
use std::f64::consts::SQRT_2;

/// Condition under which the sampled distribution may be inaccurate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncNormalWarning {
    /// `mean` lies more than two standard deviations outside `[a, b]`
    MeanFarFromRange,
}

impl std::fmt::Display for TruncNormalWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TruncNormalWarning::MeanFarFromRange => write!(
                f,
                "mean is more than 2 std from [a, b] in trunc_normal_. \
                 The distribution of values may be incorrect."
            ),
        }
    }
}

fn norm_cdf(x: f64) -> f64 {
    (1.0 + erf(x / SQRT_2)) / 2.0
}

/// Fill `array` in place with samples from N(mean, std²) truncated to `[a, b]`
///
/// Returns a warning when the mean is far outside the range; the array is
/// filled either way.
pub fn trunc_normal_<S, D, R>(
    array: &mut ArrayBase<S, D>,
    mean: f32,
    std: f32,
    a: f32,
    b: f32,
    rng: &mut R,
) -> Result<Option<TruncNormalWarning>>
where
    S: DataMut<Elem = f32>,
    D: Dimension,
    R: Rng,
{
    if std <= 0.0 || std.is_nan() {
        return Err(Error::InvalidParameter(format!(
            "trunc_normal std must be positive, got {std}"
        )));
    }
    if a > b {
        return Err(Error::InvalidParameter(format!(
            "trunc_normal bounds must satisfy a <= b, got [{a}, {b}]"
        )));
    }

    let (mean64, std64) = (f64::from(mean), f64::from(std));
    let warning = if mean64 < f64::from(a) - 2.0 * std64 || mean64 > f64::from(b) + 2.0 * std64 {
        Some(TruncNormalWarning::MeanFarFromRange)
    } else {
        None
    };

    let lo = 2.0 * norm_cdf((f64::from(a) - mean64) / std64) - 1.0;
    let hi = 2.0 * norm_cdf((f64::from(b) - mean64) / std64) - 1.0;
    let scale = std64 * SQRT_2;

    array.map_inplace(|x| {
        let u = rng.random_range(lo..=hi);
        let sample = erf_inv(u) * scale + mean64;
        *x = (sample as f32).clamp(a, b);
    });

    Ok(warning)
}

/// Allocate an array of `shape` filled by [`trunc_normal_`]
pub fn trunc_normal<Sh, D, R>(
    shape: Sh,
    mean: f32,
    std: f32,
    a: f32,
    b: f32,
    rng: &mut R,
) -> Result<(Array<f32, D>, Option<TruncNormalWarning>)>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
    R: Rng,
{
    let mut array = Array::zeros(shape);
    let warning = trunc_normal_(&mut array, mean, std, a, b, rng)?;
    Ok((array, warning))
}
