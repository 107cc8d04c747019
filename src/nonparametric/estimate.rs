use super::risk_set::RiskSet;
use crate::error::Error;
use crate::sample::Censor;
use crate::utils::SafeLogExp;
use ndarray::prelude::*;
use ndarray::Data;
use serde_derive::Serialize;

/// Which estimator produced a [`NonParametric`] result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstimatorKind {
    NelsonAalen,
    KaplanMeier,
    FlemingHarrington,
}

/// Hazard, cumulative hazard, reliability, and failure probability aligned to
/// a risk-set table's time axis. Built eagerly and never mutated afterwards.
///
/// A confidence-bound collaborator consumes `reliability` and `at_risk`
/// together with its own variance term; none is computed here.
#[derive(Debug, Clone, Serialize)]
pub struct NonParametric {
    pub model: EstimatorKind,
    pub time: Array1<f64>,
    pub at_risk: Array1<u64>,
    pub censored: Array1<u64>,
    pub failures: Array1<u64>,
    pub population: u64,
    pub hazard: Array1<f64>,
    pub cumulative_hazard: Array1<f64>,
    pub reliability: Array1<f64>,
    pub failure_probability: Array1<f64>,
}

impl NonParametric {
    /// Run the chosen estimator over a prepared risk-set table.
    ///
    /// A row with zero units at risk and zero failures (possible only through
    /// zero-count input rows) leaves an indeterminate `0/0` hazard; such rows
    /// produce NaN rather than a silently chosen value.
    pub fn estimate(model: EstimatorKind, table: &RiskSet) -> Result<Self, Error> {
        let hazard = match model {
            EstimatorKind::NelsonAalen => nelson_aalen_hazard(table)?,
            EstimatorKind::KaplanMeier => return kaplan_meier_estimate(table),
            EstimatorKind::FlemingHarrington => fleming_harrington_hazard(table)?,
        };

        let cumulative_hazard = cumulative_sum(&hazard);
        let reliability = cumulative_hazard.mapv(|h| (-h).exp());
        Ok(Self::assemble(
            model,
            table,
            hazard,
            cumulative_hazard,
            reliability,
        ))
    }

    /// Step-function arrays for rendering the reliability curve: time with a
    /// leading zero, reliability with a leading one.
    pub fn step_points(&self) -> (Array1<f64>, Array1<f64>) {
        let mut time = Vec::with_capacity(self.time.len() + 1);
        let mut reliability = Vec::with_capacity(self.reliability.len() + 1);
        time.push(0.0);
        reliability.push(1.0);
        time.extend(self.time.iter());
        reliability.extend(self.reliability.iter());
        (Array::from(time), Array::from(reliability))
    }

    fn assemble(
        model: EstimatorKind,
        table: &RiskSet,
        hazard: Array1<f64>,
        cumulative_hazard: Array1<f64>,
        reliability: Array1<f64>,
    ) -> Self {
        let failure_probability = reliability.mapv(|r| 1.0 - r);
        NonParametric {
            model,
            time: table.time.clone(),
            at_risk: table.at_risk.clone(),
            censored: table.censored.clone(),
            failures: table.failures.clone(),
            population: table.population,
            hazard,
            cumulative_hazard,
            reliability,
            failure_probability,
        }
    }
}

/// Nelson-Aalen estimate: `h = d/r`, `H = cumsum(h)`, `R = exp(-H)`.
pub fn nelson_aalen<S: Data<Elem = f64>>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    counts: Option<&[u64]>,
) -> Result<NonParametric, Error> {
    let table = RiskSet::build(time, censored, counts)?;
    NonParametric::estimate(EstimatorKind::NelsonAalen, &table)
}

/// Kaplan-Meier estimate: `R = cumprod((r - d)/r)`, `H = -ln R`.
///
/// When the whole population fails, the final reliability is exactly zero and
/// the cumulative hazard is reported at the clamped-logarithm ceiling rather
/// than infinity.
pub fn kaplan_meier<S: Data<Elem = f64>>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    counts: Option<&[u64]>,
) -> Result<NonParametric, Error> {
    let table = RiskSet::build(time, censored, counts)?;
    NonParametric::estimate(EstimatorKind::KaplanMeier, &table)
}

/// Fleming-Harrington estimate with the tie-corrected harmonic hazard
/// `h = sum_{j<d} 1/(r - j)`.
pub fn fleming_harrington<S: Data<Elem = f64>>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    counts: Option<&[u64]>,
) -> Result<NonParametric, Error> {
    let table = RiskSet::build(time, censored, counts)?;
    NonParametric::estimate(EstimatorKind::FlemingHarrington, &table)
}

fn nelson_aalen_hazard(table: &RiskSet) -> Result<Array1<f64>, Error> {
    let mut hazard = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let d = table.failures[i];
        let r = table.at_risk[i];
        if r == 0 && d > 0 {
            return Err(Error::InvalidInput(format!(
                "{} failures at time {} with no units at risk",
                d, table.time[i]
            )));
        }
        hazard.push(d as f64 / r as f64);
    }
    Ok(Array::from(hazard))
}

fn fleming_harrington_hazard(table: &RiskSet) -> Result<Array1<f64>, Error> {
    let mut hazard = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let d = table.failures[i];
        let r = table.at_risk[i];
        if d > r {
            return Err(Error::InvalidInput(format!(
                "{} failures at time {} but only {} units at risk",
                d, table.time[i], r
            )));
        }
        let h = (0..d).map(|j| 1.0 / (r - j) as f64).sum();
        hazard.push(h);
    }
    Ok(Array::from(hazard))
}

fn kaplan_meier_estimate(table: &RiskSet) -> Result<NonParametric, Error> {
    let mut ratios = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let d = table.failures[i];
        let r = table.at_risk[i];
        if r == 0 && d > 0 {
            return Err(Error::InvalidInput(format!(
                "{} failures at time {} with no units at risk",
                d, table.time[i]
            )));
        }
        ratios.push((r - d) as f64 / r as f64);
    }

    let reliability = cumulative_product(&Array::from(ratios));
    let cumulative_hazard = reliability.mapv(|r| -r.safe_ln());

    let mut hazard = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        if i == 0 {
            hazard.push(cumulative_hazard[0]);
        } else {
            hazard.push(cumulative_hazard[i] - cumulative_hazard[i - 1]);
        }
    }

    Ok(NonParametric::assemble(
        EstimatorKind::KaplanMeier,
        table,
        Array::from(hazard),
        cumulative_hazard,
        reliability,
    ))
}

fn cumulative_sum(values: &Array1<f64>) -> Array1<f64> {
    let mut total = 0.0;
    values.mapv(|v| {
        total += v;
        total
    })
}

fn cumulative_product(values: &Array1<f64>) -> Array1<f64> {
    let mut total = 1.0;
    values.mapv(|v| {
        total *= v;
        total
    })
}
