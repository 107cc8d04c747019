use super::{Bound, CumulativeDensity, Density, ParameterBounds, Reliability};
use crate::error::Error;
use crate::sample::fitter::InitialSolvePoint;
use ndarray::{Array, Array1, ArrayBase, Data, Dimension};
use num_traits::Float;
use std::convert::TryFrom;

/// Limited-failure-population mixture over any base family.
///
/// Only the fraction `susceptible` of the population can fail by the modeled
/// mode, so the mixture density and cumulative distribution are the base
/// family's scaled by `susceptible`, and reliability approaches
/// `1 - susceptible` instead of zero.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct LimitedFailure<D, F> {
    pub base: D,
    pub susceptible: F,
}

impl<D, F> From<LimitedFailure<D, F>> for Vec<F>
where
    D: Into<Vec<F>>,
{
    fn from(distribution: LimitedFailure<D, F>) -> Self {
        let mut params: Vec<F> = distribution.base.into();
        params.push(distribution.susceptible);
        params
    }
}

impl<'a, D, F> TryFrom<&'a [F]> for LimitedFailure<D, F>
where
    D: TryFrom<&'a [F], Error = Error>,
    F: Copy,
{
    type Error = Error;

    fn try_from(array: &'a [F]) -> Result<Self, Self::Error> {
        let (&susceptible, base) = array
            .split_last()
            .ok_or(Error::IncompatibleDistributionParameterCount(0, 1))?;

        Ok(LimitedFailure {
            base: D::try_from(base)?,
            susceptible,
        })
    }
}

impl<D, F> ParameterBounds for LimitedFailure<D, F>
where
    D: ParameterBounds,
{
    fn bounds() -> Vec<Bound> {
        let mut bounds = D::bounds();
        bounds.push(Bound::Unit);
        bounds
    }
}

impl<S, Dim, D, F> Density<ArrayBase<S, Dim>, Array<F, Dim>> for LimitedFailure<D, F>
where
    S: Data<Elem = F>,
    Dim: Dimension,
    D: Density<ArrayBase<S, Dim>, Array<F, Dim>>,
    F: Float,
{
    fn density(&self, input: &ArrayBase<S, Dim>) -> Array<F, Dim> {
        let p = self.susceptible;
        self.base.density(input).mapv_into(|f| p * f)
    }
}

impl<S, Dim, D, F> CumulativeDensity<ArrayBase<S, Dim>, Array<F, Dim>> for LimitedFailure<D, F>
where
    S: Data<Elem = F>,
    Dim: Dimension,
    D: CumulativeDensity<ArrayBase<S, Dim>, Array<F, Dim>>,
    F: Float,
{
    fn cumulative_density(&self, input: &ArrayBase<S, Dim>) -> Array<F, Dim> {
        let p = self.susceptible;
        self.base.cumulative_density(input).mapv_into(|f| p * f)
    }
}

impl<S, Dim, D, F> Reliability<ArrayBase<S, Dim>, Array<F, Dim>> for LimitedFailure<D, F>
where
    S: Data<Elem = F>,
    Dim: Dimension,
    D: CumulativeDensity<ArrayBase<S, Dim>, Array<F, Dim>>,
    F: Float,
{
    fn reliability(&self, input: &ArrayBase<S, Dim>) -> Array<F, Dim> {
        let p = self.susceptible;
        self.base
            .cumulative_density(input)
            .mapv_into(|f| F::one() - p * f)
    }
}

/// Starting point for a limited-failure-population curve fit over the
/// given times.
pub trait MixtureInitialGuess: Sized {
    fn mixture_initial_guess(time: &Array1<f64>) -> LimitedFailure<Self, f64>;
}

impl<T, D, F> InitialSolvePoint<LimitedFailure<D, F>> for T
where
    T: InitialSolvePoint<D>,
    F: Float,
{
    fn initial_solve_point(&self) -> LimitedFailure<D, F> {
        let one = F::one();
        LimitedFailure {
            base: self.initial_solve_point(),
            susceptible: one / (one + one),
        }
    }
}
