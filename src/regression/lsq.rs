use super::rank::{plotting_positions, PlottingFormula};
use super::RegressionDirection;
use crate::distribution::lfp::{LimitedFailure, MixtureInitialGuess};
use crate::distribution::{
    constrain, unconstrain, Bound, CumulativeDensity, ParameterBounds, ProbabilityPlot,
};
use crate::error::Error;
use crate::sample::fitter::{FitterParameters, InitialNelderMeadSimplex};
use crate::sample::Censor;
use crate::utils::argsort;
use argmin::prelude::*;
use argmin::solver::neldermead::NelderMead;
use ndarray::prelude::*;
use ndarray::Data;
use std::convert::TryFrom;
use std::marker::PhantomData;

/// A probability-plot regression result: the back-transformed distribution
/// plus the fitted line itself.
#[derive(Debug, Clone)]
pub struct RegressionFit<D> {
    pub distribution: D,
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the linearized fit.
    pub r_squared: f64,
}

/// Fit a distribution to failure times by rank regression on its
/// probability plot.
///
/// Times are sorted, plotting positions computed (rank-adjusted when
/// censoring codes are given), censored entries dropped, and a straight line
/// fitted through the family's linearizing transform in the chosen
/// direction.
pub fn fit_regression<S, D>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    formula: PlottingFormula,
    direction: RegressionDirection,
) -> Result<RegressionFit<D>, Error>
where
    S: Data<Elem = f64>,
    D: ProbabilityPlot,
{
    let plot = ObservedPlotData::prepare(time, censored, formula)?;

    let (x, y) = D::linearize(&plot.observed_time, &plot.observed_position);
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(
            "linearized plot coordinates are not finite".to_string(),
        ));
    }

    let line = match direction {
        RegressionDirection::OnY => polyfit_line(&x, &y)?,
        RegressionDirection::OnX => polyfit_line(&y, &x)?,
    };

    Ok(RegressionFit {
        distribution: D::from_line(direction, line.slope, line.intercept)?,
        slope: line.slope,
        intercept: line.intercept,
        r_squared: line.r_squared,
    })
}

/// Limited-failure-population rank regression: instead of a line, minimize
/// the squared residual between the mixture cumulative distribution
/// `p * cdf(t)` and the empirical plotting positions, with the mixture
/// weight confined to the unit interval.
pub fn fit_regression_lfp<S, D>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    formula: PlottingFormula,
    parameters: &FitterParameters,
) -> Result<LimitedFailure<D, f64>, Error>
where
    S: Data<Elem = f64>,
    D: MixtureInitialGuess + ParameterBounds + for<'b> TryFrom<&'b [f64], Error = Error>,
    LimitedFailure<D, f64>: CumulativeDensity<Array1<f64>, Array1<f64>> + Into<Vec<f64>>,
{
    let plot = ObservedPlotData::prepare(time, censored, formula)?;

    let guess = D::mixture_initial_guess(&plot.sorted_time);
    let native: Vec<f64> = guess.into();
    let bounds = LimitedFailure::<D, f64>::bounds();
    let initial_point = unconstrain(&bounds, &native);
    let initial_simplex = initial_point.initial_simplex()?;

    let op = MixtureResidualOp {
        time: &plot.observed_time,
        probability: &plot.observed_position,
        bounds: bounds.clone(),
        _distribution: PhantomData::<D>,
    };
    let solver = NelderMead::new().with_initial_params(initial_simplex);
    let mut executor =
        Executor::new(&op, solver, initial_point).max_iters(parameters.max_iterations);
    if parameters.observe_progress {
        executor = executor.add_observer(ArgminSlogLogger::term(), ObserverMode::Always);
    }
    let res = executor.run()?;
    if !res.state.best_cost.is_finite() {
        return Err(Error::NonConvergence);
    }

    let fitted = constrain(&bounds, &res.state.best_param);
    LimitedFailure::try_from(&fitted[..])
}

/// Sorted times with the plotting positions of their observed entries.
struct ObservedPlotData {
    sorted_time: Array1<f64>,
    observed_time: Array1<f64>,
    observed_position: Array1<f64>,
}

impl ObservedPlotData {
    fn prepare<S: Data<Elem = f64>>(
        time: &ArrayBase<S, Ix1>,
        censored: Option<&[Censor]>,
        formula: PlottingFormula,
    ) -> Result<Self, Error> {
        let values: Vec<f64> = time.iter().cloned().collect();
        if values.is_empty() {
            return Err(Error::EmptySample);
        }
        if values.iter().any(|t| !t.is_finite()) {
            return Err(Error::InvalidInput("times must be finite".to_string()));
        }
        if let Some(censored) = censored {
            if censored.len() != values.len() {
                return Err(Error::InvalidInput(format!(
                    "{} times but {} censoring codes",
                    values.len(),
                    censored.len()
                )));
            }
        }

        let order = argsort(&values);
        let sorted_time = Array::from(
            order.iter().map(|&i| values[i]).collect::<Vec<f64>>(),
        );
        let sorted_censor: Option<Vec<Censor>> =
            censored.map(|c| order.iter().map(|&i| c[i]).collect());

        let positions = plotting_positions(&sorted_time, sorted_censor.as_deref(), formula)?;

        let mut observed_time = Vec::new();
        let mut observed_position = Vec::new();
        for (i, position) in positions.iter().enumerate() {
            let observed = sorted_censor
                .as_ref()
                .map_or(true, |c| c[i] == Censor::Observed);
            if let (true, Some(position)) = (observed, position) {
                observed_time.push(sorted_time[i]);
                observed_position.push(*position);
            }
        }
        if observed_time.is_empty() {
            return Err(Error::EmptySample);
        }

        Ok(ObservedPlotData {
            sorted_time,
            observed_time: Array::from(observed_time),
            observed_position: Array::from(observed_position),
        })
    }
}

struct MixtureResidualOp<'a, D> {
    time: &'a Array1<f64>,
    probability: &'a Array1<f64>,
    bounds: Vec<Bound>,
    _distribution: PhantomData<D>,
}

impl<'a, 'f, D> ArgminOp for &'f MixtureResidualOp<'a, D>
where
    D: for<'b> TryFrom<&'b [f64], Error = Error>,
    LimitedFailure<D, f64>: CumulativeDensity<Array1<f64>, Array1<f64>>,
{
    type Param = Vec<f64>;
    type Output = f64;
    type Hessian = ();
    type Jacobian = ();
    type Float = f64;

    fn apply(&self, params: &Self::Param) -> Result<Self::Output, anyhow::Error> {
        let native = constrain(&self.bounds, params);
        let mixture = LimitedFailure::<D, f64>::try_from(&native[..])?;
        let residual = mixture.cumulative_density(self.time) - self.probability;
        Ok(residual.mapv(|r| r * r).sum())
    }
}

#[derive(Debug, Clone, Copy)]
struct Line {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

/// Ordinary least squares through sums of squares, with the coefficient of
/// determination of the fit.
fn polyfit_line(x: &Array1<f64>, y: &Array1<f64>) -> Result<Line, Error> {
    let n = x.len() as f64;
    let sum_x = x.sum();
    let sum_y = y.sum();
    let sum_xy = (x * y).sum();
    let sum_x2 = (x * x).sum();
    let sum_y2 = (y * y).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < 1e-30 {
        return Err(Error::InvalidInput(
            "degenerate regression: no spread in the predictor".to_string(),
        ));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot = sum_y2 - n * mean_y * mean_y;
    let ss_res = sum_y2 - 2.0 * intercept * sum_y - 2.0 * slope * sum_xy
        + n * intercept * intercept
        + 2.0 * intercept * slope * sum_x
        + slope * slope * sum_x2;
    let r_squared = if ss_tot.abs() < 1e-30 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(Line {
        slope,
        intercept,
        r_squared,
    })
}
