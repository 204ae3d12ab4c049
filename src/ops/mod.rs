//! Numeric helpers for few-shot training
//!
//! - Division that tolerates zero denominators
//! - Truncated normal initialization
//! - Prototype logits (dot, cosine, negative squared distance) and accuracy
//! - Parameter counting

mod div;
mod init;
mod logits;
mod params;

pub use div::{safe_div, safe_div_scalar, DIV_EPS};
pub use init::{trunc_normal, trunc_normal_, TruncNormalWarning};
pub use logits::{
    compute_acc, compute_logits, logits_2d, logits_3d, Accuracy, LogitMetric, Reduction,
};
pub use params::{compute_n_params, format_param_count};
