use crate::error::Error;

pub mod estimate;
pub mod risk_set;
pub mod turnbull;

pub use estimate::{
    fleming_harrington, kaplan_meier, nelson_aalen, EstimatorKind, NonParametric,
};
pub use risk_set::RiskSet;
pub use turnbull::{turnbull, TurnbullEstimate, TurnbullOptions};

/// Reliability demonstrated by a zero-failure test of `n` units:
/// `(1 - confidence)^(1/n)`.
pub fn success_run(n: u64, confidence: f64) -> Result<f64, Error> {
    if n == 0 {
        return Err(Error::InvalidInput("population size is zero".to_string()));
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::InvalidInput(format!(
            "confidence {} is outside (0, 1)",
            confidence
        )));
    }
    let alpha = 1.0 - confidence;
    Ok(alpha.powf(1.0 / n as f64))
}
