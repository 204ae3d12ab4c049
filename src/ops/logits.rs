//! Prototype logits and classification accuracy

use crate::error::{Error, Result};
use ndarray::{
    Array1, Array2, Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix2, Ix3,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const NORM_EPS: f32 = 1e-12;

/// Similarity between query features and class prototypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogitMetric {
    /// Inner product
    #[default]
    Dot,
    /// Cosine similarity
    Cos,
    /// Negative squared euclidean distance
    Sqr,
}

impl FromStr for LogitMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(LogitMetric::Dot),
            "cos" => Ok(LogitMetric::Cos),
            "sqr" => Ok(LogitMetric::Sqr),
            _ => Err(Error::InvalidParameter(format!(
                "Unknown metric: {s}. Supported: dot, cos, sqr"
            ))),
        }
    }
}

fn l2_normalize(x: &ArrayView2<f32>) -> Array2<f32> {
    let mut out = x.to_owned();
    for mut row in out.rows_mut() {
        let norm = row.dot(&row).sqrt().max(NORM_EPS);
        row.mapv_inplace(|v| v / norm);
    }
    out
}

/// Logits of `n` queries against `k` prototypes: `[n, d] x [k, d] -> [n, k]`
pub fn logits_2d(
    feat: ArrayView2<f32>,
    proto: ArrayView2<f32>,
    metric: LogitMetric,
    temp: f32,
) -> Result<Array2<f32>> {
    if feat.ncols() != proto.ncols() {
        return Err(Error::ShapeMismatch {
            expected: vec![proto.nrows(), feat.ncols()],
            got: proto.shape().to_vec(),
        });
    }

    let logits = match metric {
        LogitMetric::Dot => feat.dot(&proto.t()),
        LogitMetric::Cos => l2_normalize(&feat).dot(&l2_normalize(&proto).t()),
        LogitMetric::Sqr => Array2::from_shape_fn((feat.nrows(), proto.nrows()), |(i, j)| {
            let diff = &feat.row(i) - &proto.row(j);
            -diff.dot(&diff)
        }),
    };

    Ok(logits * temp)
}

/// Batched logits: `[b, n, d] x [b, k, d] -> [b, n, k]`
pub fn logits_3d(
    feat: ArrayView3<f32>,
    proto: ArrayView3<f32>,
    metric: LogitMetric,
    temp: f32,
) -> Result<Array3<f32>> {
    let (batch, n, _) = feat.dim();
    let (proto_batch, k, _) = proto.dim();
    if batch != proto_batch {
        return Err(Error::ShapeMismatch {
            expected: vec![batch, k, feat.len_of(Axis(2))],
            got: proto.shape().to_vec(),
        });
    }

    let mut out = Array3::zeros((batch, n, k));
    for (b, mut slot) in out.outer_iter_mut().enumerate() {
        let logits = logits_2d(
            feat.index_axis(Axis(0), b),
            proto.index_axis(Axis(0), b),
            metric,
            temp,
        )?;
        slot.assign(&logits);
    }
    Ok(out)
}

/// Logits for 2-D or batched 3-D inputs of matching rank
pub fn compute_logits(
    feat: ArrayViewD<f32>,
    proto: ArrayViewD<f32>,
    metric: LogitMetric,
    temp: f32,
) -> Result<ArrayD<f32>> {
    if feat.ndim() != proto.ndim() {
        return Err(Error::ShapeMismatch {
            expected: feat.shape().to_vec(),
            got: proto.shape().to_vec(),
        });
    }

    match feat.ndim() {
        2 => {
            let feat = into_rank::<Ix2>(feat)?;
            let proto = into_rank::<Ix2>(proto)?;
            Ok(logits_2d(feat, proto, metric, temp)?.into_dyn())
        }
        3 => {
            let feat = into_rank::<Ix3>(feat)?;
            let proto = into_rank::<Ix3>(proto)?;
            Ok(logits_3d(feat, proto, metric, temp)?.into_dyn())
        }
        rank => Err(Error::InvalidParameter(format!(
            "compute_logits expects 2-D or 3-D inputs, got rank {rank}"
        ))),
    }
}

fn into_rank<D: ndarray::Dimension>(
    view: ArrayViewD<'_, f32>,
) -> Result<ndarray::ArrayView<'_, f32, D>> {
    let shape = view.shape().to_vec();
    view.into_dimensionality::<D>()
        .map_err(|_| Error::InvalidParameter(format!("unexpected shape {shape:?}")))
}

/// How per-sample accuracy is reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    Mean,
    None,
}

/// Result of [`compute_acc`]
#[derive(Debug, Clone, PartialEq)]
pub enum Accuracy {
    /// Fraction of correct predictions
    Mean(f32),
    /// 1.0 for each correct prediction, 0.0 otherwise
    PerSample(Array1<f32>),
}

impl Accuracy {
    /// Mean accuracy regardless of reduction
    pub fn mean(&self) -> f32 {
        match self {
            Accuracy::Mean(acc) => *acc,
            Accuracy::PerSample(hits) => hits.mean().unwrap_or(0.0),
        }
    }
}

fn argmax(row: ndarray::ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

/// Compare the argmax of each row of `logits` (`[n, k]`) with `labels`
pub fn compute_acc(
    logits: ArrayView2<f32>,
    labels: &[usize],
    reduction: Reduction,
) -> Result<Accuracy> {
    if logits.nrows() != labels.len() {
        return Err(Error::ShapeMismatch {
            expected: vec![logits.nrows()],
            got: vec![labels.len()],
        });
    }

    let hits: Array1<f32> = logits
        .outer_iter()
        .zip(labels)
        .map(|(row, &label)| if argmax(row) == label { 1.0 } else { 0.0 })
        .collect();

    Ok(match reduction {
        Reduction::Mean => Accuracy::Mean(hits.mean().unwrap_or(0.0)),
        Reduction::None => Accuracy::PerSample(hits),
    })
}
