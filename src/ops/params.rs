//! Parameter counting

use crate::optim::Parameter;

/// Total number of scalar elements across `params`
pub fn compute_n_params(params: &[Parameter]) -> usize {
    params.iter().map(Parameter::numel).sum()
}

/// Human-readable count: `"1.2M"` from one million up, `"3.4K"` below
pub fn format_param_count(n: usize) -> String {
    let n = n as f64;
    if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else {
        format!("{:.1}K", n / 1e3)
    }
}
