use super::lfp::{LimitedFailure, MixtureInitialGuess};
use super::{Bound, CumulativeDensity, Density, ParameterBounds, ProbabilityPlot, Reliability};
use crate::error::Error;
use crate::regression::RegressionDirection;
use crate::sample::fitter::InitialSolvePoint;
use crate::sample::CensoredSample;
use crate::utils::mean_and_std;
use ndarray::{Array, Array1, ArrayBase, Data, Dimension};
use num_traits::{Float, FromPrimitive};
use std::convert::TryFrom;

/// Gumbel (largest extreme value) distribution with location `mu` and
/// scale `beta`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct GumbelDistribution<F> {
    pub location: F,
    pub scale: F,
}

impl<F> From<GumbelDistribution<F>> for Vec<F> {
    fn from(distribution: GumbelDistribution<F>) -> Self {
        vec![distribution.location, distribution.scale]
    }
}

impl<'a, F> TryFrom<&'a [F]> for GumbelDistribution<F>
where
    F: Copy,
{
    type Error = Error;

    fn try_from(array: &'a [F]) -> Result<Self, Self::Error> {
        if array.len() != 2 {
            return Err(Error::IncompatibleDistributionParameterCount(
                array.len(),
                2,
            ));
        }

        Ok(GumbelDistribution {
            location: array[0],
            scale: array[1],
        })
    }
}

impl ParameterBounds for GumbelDistribution<f64> {
    fn bounds() -> Vec<Bound> {
        vec![Bound::Free, Bound::Positive]
    }
}

impl<S, D, F> Density<ArrayBase<S, D>, Array<F, D>> for GumbelDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn density(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let location = self.location;
        let scale = self.scale;

        input.mapv(|t| {
            let z = (t - location) / scale;
            (-z - (-z).exp()).exp() / scale
        })
    }
}

impl<S, D, F> CumulativeDensity<ArrayBase<S, D>, Array<F, D>> for GumbelDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn cumulative_density(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let location = self.location;
        let scale = self.scale;

        input.mapv(|t| (-(-(t - location) / scale).exp()).exp())
    }
}

impl<S, D, F> Reliability<ArrayBase<S, D>, Array<F, D>> for GumbelDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn reliability(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let location = self.location;
        let scale = self.scale;

        input.mapv(|t| F::one() - (-(-(t - location) / scale).exp()).exp())
    }
}

impl ProbabilityPlot for GumbelDistribution<f64> {
    /// `-ln(-ln F) = (t - mu)/beta`: plot `t` against `-ln(-ln F)`.
    fn linearize(time: &Array1<f64>, probability: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let y = probability.mapv(|p| -(-p.ln()).ln());
        (time.clone(), y)
    }

    fn from_line(
        direction: RegressionDirection,
        slope: f64,
        intercept: f64,
    ) -> Result<Self, Error> {
        if slope == 0.0 {
            return Err(Error::InvalidInput(
                "probability plot fitted a zero slope".to_string(),
            ));
        }
        let (location, scale) = match direction {
            RegressionDirection::OnY => {
                let scale = 1.0 / slope;
                (-intercept * scale, scale)
            }
            RegressionDirection::OnX => (intercept, slope),
        };
        Ok(GumbelDistribution { location, scale })
    }

    fn linearized(&self, time: f64) -> f64 {
        (time - self.location) / self.scale
    }

    fn inverse_linearized(&self, value: f64) -> f64 {
        self.location + self.scale * value
    }
}

impl<F> InitialSolvePoint<GumbelDistribution<F>> for CensoredSample<F>
where
    F: Float + FromPrimitive,
{
    fn initial_solve_point(&self) -> GumbelDistribution<F> {
        GumbelDistribution {
            location: self.pooled_mean(),
            scale: self.pooled_std(),
        }
    }
}

impl MixtureInitialGuess for GumbelDistribution<f64> {
    fn mixture_initial_guess(time: &Array1<f64>) -> LimitedFailure<Self, f64> {
        let (mean, std) = mean_and_std(time);
        LimitedFailure {
            base: GumbelDistribution {
                location: mean,
                scale: std,
            },
            susceptible: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn standard_gumbel_reference_values() {
        let distribution = GumbelDistribution {
            location: 0.0,
            scale: 1.0,
        };

        // F(0) = f(0) = exp(-1) for the standard Gumbel.
        let cumulative = distribution.cumulative_density(&array![0.0]);
        let density = distribution.density(&array![0.0]);
        let expected = (-1.0f64).exp();

        assert!((cumulative[0] - expected).abs() < TOLERANCE);
        assert!((density[0] - expected).abs() < TOLERANCE);
    }

    #[test]
    fn cumulative_and_reliability_are_complements() {
        let distribution = GumbelDistribution {
            location: 3.0,
            scale: 2.0,
        };
        let time = array![-5.0, 0.0, 3.0, 8.0];

        let cumulative = distribution.cumulative_density(&time);
        let reliability = distribution.reliability(&time);

        for (f, r) in cumulative.iter().zip(reliability.iter()) {
            assert!((f + r - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn cumulative_is_monotone() {
        let distribution = GumbelDistribution {
            location: 1.0,
            scale: 0.5,
        };
        let cumulative = distribution.cumulative_density(&array![-2.0, 0.0, 1.0, 2.0, 4.0]);

        for pair in cumulative.as_slice().unwrap().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn line_round_trips() {
        let distribution = GumbelDistribution {
            location: 12.0,
            scale: 3.0,
        };

        // y = (t - mu)/beta
        let slope = 1.0 / distribution.scale;
        let intercept = -distribution.location / distribution.scale;
        let on_y =
            GumbelDistribution::from_line(RegressionDirection::OnY, slope, intercept).unwrap();
        assert!((on_y.location - distribution.location).abs() < TOLERANCE);
        assert!((on_y.scale - distribution.scale).abs() < TOLERANCE);

        // t = mu + beta * y
        let on_x = GumbelDistribution::from_line(
            RegressionDirection::OnX,
            distribution.scale,
            distribution.location,
        )
        .unwrap();
        assert!((on_x.location - distribution.location).abs() < TOLERANCE);
        assert!((on_x.scale - distribution.scale).abs() < TOLERANCE);
    }

    #[test]
    fn linearized_round_trip() {
        let distribution = GumbelDistribution {
            location: -4.0,
            scale: 1.5,
        };
        let time = 2.25;

        let value = distribution.linearized(time);
        assert!((distribution.inverse_linearized(value) - time).abs() < TOLERANCE);
    }
}
