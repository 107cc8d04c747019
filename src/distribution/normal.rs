use super::lfp::{LimitedFailure, MixtureInitialGuess};
use super::{Bound, CumulativeDensity, Density, ParameterBounds, ProbabilityPlot, Reliability};
use crate::error::Error;
use crate::regression::RegressionDirection;
use crate::sample::fitter::InitialSolvePoint;
use crate::sample::CensoredSample;
use crate::utils::{erf, mean_and_std, normal_quantile};
use ndarray::{Array, Array1, ArrayBase, Data, Dimension};
use std::convert::TryFrom;
use std::f64::consts::{PI, SQRT_2};

/// Normal distribution with location `mu` and scale `sigma`.
///
/// Implemented for `f64` only: the cumulative distribution and its quantile
/// go through the polynomial `erf`/probit approximations in `utils`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct NormalDistribution<F> {
    pub location: F,
    pub scale: F,
}

impl<F> From<NormalDistribution<F>> for Vec<F> {
    fn from(distribution: NormalDistribution<F>) -> Self {
        vec![distribution.location, distribution.scale]
    }
}

impl<'a, F> TryFrom<&'a [F]> for NormalDistribution<F>
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

        Ok(NormalDistribution {
            location: array[0],
            scale: array[1],
        })
    }
}

impl ParameterBounds for NormalDistribution<f64> {
    fn bounds() -> Vec<Bound> {
        vec![Bound::Free, Bound::Positive]
    }
}

impl<S, D> Density<ArrayBase<S, D>, Array<f64, D>> for NormalDistribution<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn density(&self, input: &ArrayBase<S, D>) -> Array<f64, D> {
        let location = self.location;
        let scale = self.scale;
        let norm = 1.0 / (scale * (2.0 * PI).sqrt());

        input.mapv(|t| {
            let z = (t - location) / scale;
            norm * (-0.5 * z * z).exp()
        })
    }
}

impl<S, D> CumulativeDensity<ArrayBase<S, D>, Array<f64, D>> for NormalDistribution<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn cumulative_density(&self, input: &ArrayBase<S, D>) -> Array<f64, D> {
        let location = self.location;
        let scale = self.scale;

        input.mapv(|t| {
            let z = (t - location) / scale;
            0.5 * (1.0 + erf(z / SQRT_2))
        })
    }
}

impl<S, D> Reliability<ArrayBase<S, D>, Array<f64, D>> for NormalDistribution<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn reliability(&self, input: &ArrayBase<S, D>) -> Array<f64, D> {
        let location = self.location;
        let scale = self.scale;

        input.mapv(|t| {
            let z = (t - location) / scale;
            0.5 * (1.0 - erf(z / SQRT_2))
        })
    }
}

impl ProbabilityPlot for NormalDistribution<f64> {
    /// The normal quantile of F is linear in t: plot `t` against
    /// `probit(F) = (t - mu)/sigma`.
    fn linearize(time: &Array1<f64>, probability: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let y = probability.mapv(normal_quantile);
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
        Ok(NormalDistribution { location, scale })
    }

    fn linearized(&self, time: f64) -> f64 {
        (time - self.location) / self.scale
    }

    fn inverse_linearized(&self, value: f64) -> f64 {
        self.location + self.scale * value
    }
}

impl InitialSolvePoint<NormalDistribution<f64>> for CensoredSample<f64> {
    fn initial_solve_point(&self) -> NormalDistribution<f64> {
        NormalDistribution {
            location: self.pooled_mean(),
            scale: self.pooled_std(),
        }
    }
}

impl MixtureInitialGuess for NormalDistribution<f64> {
    fn mixture_initial_guess(time: &Array1<f64>) -> LimitedFailure<Self, f64> {
        let (mean, std) = mean_and_std(time);
        LimitedFailure {
            base: NormalDistribution {
                location: mean,
                scale: std,
            },
            susceptible: 0.5,
        }
    }
}
