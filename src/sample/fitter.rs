use super::{Censor, CensoredSample, LogLikelihood};
use crate::distribution::{constrain, unconstrain, Bound, ParameterBounds};
use crate::error::Error;
use crate::error::Error::*;
use argmin::prelude::*;
use argmin::solver::neldermead::NelderMead;
use ndarray::prelude::*;
use ndarray::Data;
use num_traits::{Float, FromPrimitive};
use std::convert::TryFrom;
use std::fmt::Debug;
use std::marker::PhantomData;

const NON_ZERO_DELTA: f64 = 0.05;
const ZERO_DELTA: f64 = 0.00025;

/// Starting parameters a sample suggests for a distribution family.
pub trait InitialSolvePoint<T> {
    fn initial_solve_point(&self) -> T;
}

pub trait InitialNelderMeadSimplex<T> {
    fn initial_simplex(&self) -> Result<Vec<T>, Error>;
}

impl<F> InitialNelderMeadSimplex<Vec<F>> for [F]
where
    F: Float + FromPrimitive,
{
    fn initial_simplex(&self) -> Result<Vec<Vec<F>>, Error> {
        let initial_point: Vec<F> = self.into();

        let d = initial_point.len();
        let mut simplex = vec![initial_point; d + 1];
        for (index_within_point, point) in simplex.iter_mut().skip(1).enumerate() {
            if point[index_within_point] != F::zero() {
                let delta_multiple = 1.0 + NON_ZERO_DELTA;

                point[index_within_point] = F::from(delta_multiple)
                    .ok_or(NumericalConversion(delta_multiple))?
                    * point[index_within_point]
            } else {
                point[index_within_point] =
                    F::from(ZERO_DELTA).ok_or(NumericalConversion(ZERO_DELTA))?
            }
        }

        Ok(simplex)
    }
}

/// Maximum-likelihood fitter for one sample and one distribution family.
///
/// The optimizer walks an unconstrained space; each candidate point is mapped
/// through the family's parameter bounds before the likelihood is evaluated,
/// so scale and shape stay strictly positive and mixture weights stay inside
/// the unit interval.
pub struct BaseFitter<S, D> {
    input_state: S,
    bounds: Vec<Bound>,
    _distribution: PhantomData<D>,
}

impl<S, D> BaseFitter<S, D>
where
    D: ParameterBounds,
{
    pub fn new(input_state: S) -> Self {
        BaseFitter {
            input_state,
            bounds: D::bounds(),
            _distribution: PhantomData,
        }
    }

    pub fn state(&self) -> &S {
        &self.input_state
    }
}

impl<'f, S, D> ArgminOp for &'f BaseFitter<S, D>
where
    S: LogLikelihood<D, f64>,
    D: for<'a> TryFrom<&'a [f64], Error = Error>,
{
    type Param = Vec<f64>;
    type Output = f64;
    type Hessian = ();
    type Jacobian = ();
    type Float = f64;

    fn apply(&self, params: &Self::Param) -> Result<Self::Output, anyhow::Error> {
        let native = constrain(&self.bounds, params);
        let distribution = D::try_from(&native[..])?;
        Ok(-self.input_state.log_likelihood(&distribution))
    }
}

pub struct FitterParameters {
    pub max_iterations: u64,
    /// Attach argmin's terminal observer to watch the solver iterate.
    pub observe_progress: bool,
}

impl Default for FitterParameters {
    fn default() -> Self {
        FitterParameters {
            max_iterations: 100,
            observe_progress: false,
        }
    }
}

/// A fit plus the optimizer's own stopping diagnostics. Convergence is the
/// caller's call: inspect `termination` or use `into_converged`.
#[derive(Debug)]
pub struct FitOutcome<D> {
    pub distribution: D,
    pub neg_log_likelihood: f64,
    pub termination: TerminationReason,
}

impl<D> FitOutcome<D> {
    pub fn converged(&self) -> bool {
        self.neg_log_likelihood.is_finite()
            && self.termination != TerminationReason::MaxItersReached
    }

    pub fn into_converged(self) -> Result<D, Error> {
        if self.converged() {
            Ok(self.distribution)
        } else {
            Err(NonConvergence)
        }
    }
}

pub trait Fitter<S, P> {
    fn fit(&self, parameters: &FitterParameters) -> Result<FitOutcome<P>, Error>;
}

impl<S, D> Fitter<S, D> for BaseFitter<S, D>
where
    S: LogLikelihood<D, f64> + InitialSolvePoint<D>,
    D: for<'a> TryFrom<&'a [f64], Error = Error> + Into<Vec<f64>> + ParameterBounds + Debug,
{
    fn fit(&self, parameters: &FitterParameters) -> Result<FitOutcome<D>, Error> {
        let native: Vec<f64> = self.input_state.initial_solve_point().into();
        let initial_point = unconstrain(&self.bounds, &native);
        let initial_simplex = initial_point.initial_simplex()?;

        let solver = NelderMead::new().with_initial_params(initial_simplex);

        let mut executor =
            Executor::new(self, solver, initial_point).max_iters(parameters.max_iterations);
        if parameters.observe_progress {
            executor = executor.add_observer(ArgminSlogLogger::term(), ObserverMode::Always);
        }
        let res = executor.run()?;

        let fitted = constrain(&self.bounds, &res.state.best_param);
        Ok(FitOutcome {
            distribution: D::try_from(&fitted[..])?,
            neg_log_likelihood: res.state.best_cost,
            termination: res.state.termination_reason,
        })
    }
}

/// Fit a distribution family to censored times by maximum likelihood.
///
/// Censoring codes follow the observation-set convention: left-censored
/// entries contribute `ln cdf`, observed failures `ln pdf`, right-censored
/// entries `ln reliability`.
pub fn fit_mle<S, D>(
    time: &ArrayBase<S, Ix1>,
    censor: &[Censor],
    parameters: &FitterParameters,
) -> Result<FitOutcome<D>, Error>
where
    S: Data<Elem = f64>,
    CensoredSample<f64>: LogLikelihood<D, f64> + InitialSolvePoint<D>,
    D: for<'a> TryFrom<&'a [f64], Error = Error> + Into<Vec<f64>> + ParameterBounds + Debug,
{
    let sample = CensoredSample::from_codes(time, censor)?;
    BaseFitter::new(sample).fit(parameters)
}
