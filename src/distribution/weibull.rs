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

/// Two-parameter Weibull distribution with scale `alpha` and shape `beta`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct WeibullDistribution<F> {
    pub scale: F,
    pub shape: F,
}

impl<F> From<WeibullDistribution<F>> for Vec<F> {
    fn from(distribution: WeibullDistribution<F>) -> Self {
        vec![distribution.scale, distribution.shape]
    }
}

impl<'a, F> TryFrom<&'a [F]> for WeibullDistribution<F>
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

        Ok(WeibullDistribution {
            scale: array[0],
            shape: array[1],
        })
    }
}

impl ParameterBounds for WeibullDistribution<f64> {
    fn bounds() -> Vec<Bound> {
        vec![Bound::Positive, Bound::Positive]
    }
}

impl<S, D, F> Density<ArrayBase<S, D>, Array<F, D>> for WeibullDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn density(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let scale = self.scale;
        let shape = self.shape;

        input.mapv(|t| {
            let z = t / scale;
            (shape / scale) * z.powf(shape - F::one()) * (-z.powf(shape)).exp()
        })
    }
}

impl<S, D, F> CumulativeDensity<ArrayBase<S, D>, Array<F, D>> for WeibullDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn cumulative_density(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let scale = self.scale;
        let shape = self.shape;

        input.mapv(|t| F::one() - (-(t / scale).powf(shape)).exp())
    }
}

impl<S, D, F> Reliability<ArrayBase<S, D>, Array<F, D>> for WeibullDistribution<F>
where
    S: Data<Elem = F>,
    D: Dimension,
    F: Float,
{
    fn reliability(&self, input: &ArrayBase<S, D>) -> Array<F, D> {
        let scale = self.scale;
        let shape = self.shape;

        input.mapv(|t| (-(t / scale).powf(shape)).exp())
    }
}

impl ProbabilityPlot for WeibullDistribution<f64> {
    /// `ln(-ln(1 - F)) = beta * (ln t - ln alpha)`: plot `ln t` against
    /// `ln(ln(1/(1 - F)))`.
    fn linearize(time: &Array1<f64>, probability: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let x = time.mapv(f64::ln);
        let y = probability.mapv(|p| (1.0 / (1.0 - p)).ln().ln());
        (x, y)
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
        let (scale, shape) = match direction {
            RegressionDirection::OnY => {
                let shape = slope;
                ((intercept / -shape).exp(), shape)
            }
            RegressionDirection::OnX => {
                let shape = 1.0 / slope;
                ((intercept / (shape * slope)).exp(), shape)
            }
        };
        Ok(WeibullDistribution { scale, shape })
    }

    fn linearized(&self, time: f64) -> f64 {
        self.shape * (time.ln() - self.scale.ln())
    }

    fn inverse_linearized(&self, value: f64) -> f64 {
        (value / self.shape + self.scale.ln()).exp()
    }
}

impl<F> InitialSolvePoint<WeibullDistribution<F>> for CensoredSample<F>
where
    F: Float + FromPrimitive,
{
    fn initial_solve_point(&self) -> WeibullDistribution<F> {
        WeibullDistribution {
            scale: self.pooled_mean(),
            shape: F::one(),
        }
    }
}

impl MixtureInitialGuess for WeibullDistribution<f64> {
    fn mixture_initial_guess(time: &Array1<f64>) -> LimitedFailure<Self, f64> {
        let (mean, _) = mean_and_std(time);
        LimitedFailure {
            base: WeibullDistribution {
                scale: mean,
                shape: 1.0,
            },
            susceptible: 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn density_exponential_special_case() {
        // With shape 1 the Weibull reduces to an exponential.
        let distribution = WeibullDistribution {
            scale: 1.0,
            shape: 1.0,
        };

        let actual = distribution.density(&array![0.5, 1.0, 2.0]);
        let expected = array![(-0.5f64).exp(), (-1.0f64).exp(), (-2.0f64).exp()];
        assert_diff_within_tolerance!(&actual, &expected, TOLERANCE);
    }

    #[test]
    fn cumulative_and_reliability_are_complements() {
        let distribution = WeibullDistribution {
            scale: 2.3,
            shape: 1.7,
        };
        let time = array![0.1, 1.0, 2.0, 5.0, 10.0];

        let cumulative = distribution.cumulative_density(&time);
        let reliability = distribution.reliability(&time);

        for (f, r) in cumulative.iter().zip(reliability.iter()) {
            assert!((f + r - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn density_reference_values() {
        let distribution = WeibullDistribution {
            scale: 50.0,
            shape: 2.0,
        };

        // f(t) = (2/50)(t/50) exp(-(t/50)^2)
        let actual = distribution.density(&array![25.0, 50.0]);
        let expected = array![
            0.02 * 0.5 * (-0.25f64).exp(),
            0.02 * 1.0 * (-1.0f64).exp(),
        ];
        assert_diff_within_tolerance!(&actual, &expected, TOLERANCE);
    }

    #[test]
    fn line_round_trip_regress_on_y() {
        let distribution = WeibullDistribution {
            scale: 42.0,
            shape: 1.8,
        };

        // linearized form is beta * ln t - beta * ln alpha
        let slope = distribution.shape;
        let intercept = -distribution.shape * distribution.scale.ln();
        let recovered =
            WeibullDistribution::from_line(RegressionDirection::OnY, slope, intercept).unwrap();

        assert!((recovered.scale - distribution.scale).abs() < 1e-9);
        assert!((recovered.shape - distribution.shape).abs() < 1e-9);
    }

    #[test]
    fn line_round_trip_regress_on_x() {
        let distribution = WeibullDistribution {
            scale: 42.0,
            shape: 1.8,
        };

        // the x-on-y line is the inverse map: ln t = y/beta + ln alpha
        let slope = 1.0 / distribution.shape;
        let intercept = distribution.scale.ln();
        let recovered =
            WeibullDistribution::from_line(RegressionDirection::OnX, slope, intercept).unwrap();

        assert!((recovered.scale - distribution.scale).abs() < 1e-9);
        assert!((recovered.shape - distribution.shape).abs() < 1e-9);
    }

    #[test]
    fn linearized_round_trip() {
        let distribution = WeibullDistribution {
            scale: 10.0,
            shape: 3.0,
        };
        let time = 7.5;

        let value = distribution.linearized(time);
        assert!((distribution.inverse_linearized(value) - time).abs() < TOLERANCE);
    }

    #[test]
    fn parameter_vector_round_trip() {
        let distribution = WeibullDistribution {
            scale: 4.0,
            shape: 0.5,
        };
        let vector: Vec<f64> = distribution.into();
        let recovered = WeibullDistribution::try_from(&vector[..]).unwrap();
        assert_eq!(distribution, recovered);
    }

    #[test]
    fn parameter_vector_length_mismatch() {
        let result = WeibullDistribution::<f64>::try_from(&[1.0, 2.0, 3.0][..]);
        assert!(matches!(
            result,
            Err(Error::IncompatibleDistributionParameterCount(3, 2))
        ));
    }
}
