use ndarray::Array1;

pub trait SafeLogExp {
    fn safe_ln(self) -> Self;

    fn safe_exp(self) -> Self;
}

const F32_SAFE_LN_MIN: f32 = 1e-25;
const F64_SAFE_LN_MIN: f64 = 1e-25;

impl SafeLogExp for f32 {
    fn safe_ln(self) -> Self {
        f32::max(self, F32_SAFE_LN_MIN).ln()
    }

    fn safe_exp(self) -> Self {
        f32::min(self, f32::MAX.ln() - 75.).exp()
    }
}

impl SafeLogExp for f64 {
    fn safe_ln(self) -> Self {
        f64::max(self, F64_SAFE_LN_MIN).ln()
    }

    fn safe_exp(self) -> Self {
        f64::min(self, f64::MAX.ln() - 75.).exp()
    }
}

/// Indices that sort `values` ascending. Ties keep input order.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Mean and population standard deviation. The deviation falls back to one
/// for degenerate samples so optimizer scale parameters start strictly
/// positive.
pub fn mean_and_std(values: &Array1<f64>) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    let variance = values.fold(0.0, |acc, &t| acc + (t - mean) * (t - mean)) / n;
    let std = variance.sqrt();
    (mean, if std > 0.0 { std } else { 1.0 })
}

/// Error function, Abramowitz and Stegun approximation 7.1.26.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal quantile (probit function), Abramowitz and Stegun
/// approximation 26.2.23.
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if (p - 0.5).abs() < 1e-10 {
        return 0.0;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let approx = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p < 0.5 {
        -approx
    } else {
        approx
    }
}
