//! Division that tolerates zero denominators

use crate::error::{Error, Result};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};

/// Value substituted for zero entries of a denominator array
pub const DIV_EPS: f32 = 1e-8;

/// Divide by a scalar; a zero denominator yields all zeros
pub fn safe_div_scalar<S, D>(numerator: &ArrayBase<S, D>, denom: f32) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    if denom == 0.0 {
        Array::zeros(numerator.raw_dim())
    } else {
        numerator.mapv(|x| x / denom)
    }
}

/// Element-wise division; zero denominator entries are replaced by [`DIV_EPS`]
///
/// Neither input is modified.
pub fn safe_div<S1, S2, D>(
    numerator: &ArrayBase<S1, D>,
    denom: &ArrayBase<S2, D>,
) -> Result<Array<f32, D>>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
    D: Dimension,
{
    if numerator.shape() != denom.shape() {
        return Err(Error::ShapeMismatch {
            expected: numerator.shape().to_vec(),
            got: denom.shape().to_vec(),
        });
    }

    Ok(Zip::from(numerator)
        .and(denom)
        .map_collect(|&n, &d| if d == 0.0 { n / DIV_EPS } else { n / d }))
}
