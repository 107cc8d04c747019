use crate::error::Error;
use crate::regression::RegressionDirection;
use crate::utils::SafeLogExp;
use ndarray::Array1;

pub mod gumbel;
pub mod lfp;
pub mod normal;
pub mod weibull;

/// Probability density at the input times.
pub trait Density<Input, Output> {
    fn density(&self, input: &Input) -> Output;
}

/// Cumulative probability of failure by the input times.
pub trait CumulativeDensity<Input, Output> {
    fn cumulative_density(&self, input: &Input) -> Output;
}

/// Probability of surviving beyond the input times.
pub trait Reliability<Input, Output> {
    fn reliability(&self, input: &Input) -> Output;
}

/// Feasible set of a single distribution parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Free,
    Positive,
    Unit,
}

impl Bound {
    /// Map an unconstrained optimizer coordinate into the feasible set.
    pub fn constrain(self, raw: f64) -> f64 {
        match self {
            Bound::Free => raw,
            Bound::Positive => raw.safe_exp(),
            Bound::Unit => 1.0 / (1.0 + (-raw).safe_exp()),
        }
    }

    /// Inverse of `constrain`. Values at the boundary are nudged inside it.
    pub fn unconstrain(self, native: f64) -> f64 {
        match self {
            Bound::Free => native,
            Bound::Positive => native.safe_ln(),
            Bound::Unit => {
                let p = native.max(1e-12).min(1.0 - 1e-12);
                (p / (1.0 - p)).ln()
            }
        }
    }
}

pub fn constrain(bounds: &[Bound], raw: &[f64]) -> Vec<f64> {
    bounds.iter().zip(raw).map(|(b, &v)| b.constrain(v)).collect()
}

pub fn unconstrain(bounds: &[Bound], native: &[f64]) -> Vec<f64> {
    bounds
        .iter()
        .zip(native)
        .map(|(b, &v)| b.unconstrain(v))
        .collect()
}

/// Feasible sets of a distribution's parameters, in vector order.
pub trait ParameterBounds {
    fn bounds() -> Vec<Bound>;
}

/// The linearizing transform pair a family admits for probability plotting.
///
/// `linearize` maps times and failure probabilities onto the plane where the
/// family's cumulative distribution is a straight line; `from_line` inverts a
/// fitted line back into native parameters.
pub trait ProbabilityPlot: Sized {
    fn linearize(time: &Array1<f64>, probability: &Array1<f64>) -> (Array1<f64>, Array1<f64>);

    fn from_line(
        direction: RegressionDirection,
        slope: f64,
        intercept: f64,
    ) -> Result<Self, Error>;

    /// Ordinate of the fitted line at a time.
    fn linearized(&self, time: f64) -> f64;

    /// Time at which the fitted line reaches an ordinate.
    fn inverse_linearized(&self, value: f64) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_constrain_respects_feasible_sets() {
        for raw in [-30.0f64, -1.0, 0.0, 1.0, 30.0].iter() {
            assert!(Bound::Positive.constrain(*raw) > 0.0);
            let unit = Bound::Unit.constrain(*raw);
            assert!(unit >= 0.0 && unit <= 1.0);
        }
    }

    #[test]
    fn bound_round_trips() {
        let tolerance = 1e-9;
        assert!((Bound::Free.constrain(Bound::Free.unconstrain(-2.5)) + 2.5).abs() < tolerance);
        assert!(
            (Bound::Positive.constrain(Bound::Positive.unconstrain(3.25)) - 3.25).abs() < tolerance
        );
        assert!((Bound::Unit.constrain(Bound::Unit.unconstrain(0.95)) - 0.95).abs() < tolerance);
    }
}
