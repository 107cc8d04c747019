use crate::error::Error;
use crate::sample::Censor;
use crate::utils::argsort;
use ndarray::prelude::*;
use ndarray::Data;
use std::str::FromStr;

/// Named plotting-position formulas, each a pair of constants `(A, B)` in
/// `p = (rank - A)/(n + B)`.
///
/// Constants from Kirtay and Dispinar, "Effect of Ranking Selection on the
/// Weibull Modulus Estimation", Gazi University Journal of Science 25(1),
/// 2012.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlottingFormula {
    Blom,
    Median,
    Modal,
    Midpoint,
    Mean,
    Weibull,
    Benard,
    Beard,
    Hazen,
    Filiben,
    Gringorten,
    None,
    Tukey,
    Dpw,
}

impl PlottingFormula {
    /// The `(A, B)` constants of the formula.
    pub fn constants(self) -> (f64, f64) {
        match self {
            PlottingFormula::Blom => (0.375, 0.25),
            PlottingFormula::Median => (0.3, 0.4),
            PlottingFormula::Modal => (1.0, -1.0),
            PlottingFormula::Midpoint => (0.5, 0.0),
            PlottingFormula::Mean | PlottingFormula::Weibull => (0.0, 1.0),
            PlottingFormula::Benard => (0.3, 0.2),
            PlottingFormula::Beard => (0.31, 0.38),
            PlottingFormula::Hazen => (0.5, 0.0),
            PlottingFormula::Filiben => (0.3175, 1.635),
            PlottingFormula::Gringorten => (0.44, 0.12),
            PlottingFormula::None => (0.0, 0.0),
            PlottingFormula::Tukey => (1.0 / 3.0, 1.0 / 3.0),
            PlottingFormula::Dpw => (1.0, 0.0),
        }
    }
}

impl FromStr for PlottingFormula {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Blom" => Ok(PlottingFormula::Blom),
            "Median" => Ok(PlottingFormula::Median),
            "Modal" => Ok(PlottingFormula::Modal),
            "Midpoint" => Ok(PlottingFormula::Midpoint),
            "Mean" => Ok(PlottingFormula::Mean),
            "Weibull" => Ok(PlottingFormula::Weibull),
            "Benard" => Ok(PlottingFormula::Benard),
            "Beard" => Ok(PlottingFormula::Beard),
            "Hazen" => Ok(PlottingFormula::Hazen),
            "Filiben" => Ok(PlottingFormula::Filiben),
            "Gringorten" => Ok(PlottingFormula::Gringorten),
            "None" => Ok(PlottingFormula::None),
            "Tukey" => Ok(PlottingFormula::Tukey),
            "DPW" => Ok(PlottingFormula::Dpw),
            other => Err(Error::UnknownFormula(other.to_string())),
        }
    }
}

/// Mean-order-number adjusted ranks for right-censored ordered data.
///
/// Output is aligned to ascending time order; censored entries carry no
/// rank. With no censored entries the ranks are exactly `1..=n`.
pub fn rank_adjust<S: Data<Elem = f64>>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
) -> Result<Vec<Option<f64>>, Error> {
    let n = time.len();
    if n == 0 {
        return Err(Error::EmptySample);
    }
    if let Some(censored) = censored {
        if censored.len() != n {
            return Err(Error::InvalidInput(format!(
                "{} times but {} censoring codes",
                n,
                censored.len()
            )));
        }
    }

    let values: Vec<f64> = time.iter().cloned().collect();
    if values.iter().any(|t| !t.is_finite()) {
        return Err(Error::InvalidInput("times must be finite".to_string()));
    }

    let order = argsort(&values);
    let n_f = n as f64;
    let mut ranks = Vec::with_capacity(n);
    // Previous mean order number
    let mut previous = 0.0;

    for (i, &idx) in order.iter().enumerate() {
        let class = censored.map_or(Censor::Observed, |c| c[idx]);
        match class {
            Censor::Observed => {
                let rank = previous + (n_f + 1.0 - previous) / (n_f - i as f64 + 1.0);
                previous = rank;
                ranks.push(Some(rank));
            }
            Censor::Right => ranks.push(None),
            Censor::Left => {
                return Err(Error::InvalidInput(
                    "left-censored entries have no adjusted rank".to_string(),
                ))
            }
        }
    }

    Ok(ranks)
}

/// Plotting positions `(rank - A)/(n + B)` under the named formula, aligned
/// to ascending time order when censoring forces a rank adjustment, and to
/// the given order otherwise.
pub fn plotting_positions<S: Data<Elem = f64>>(
    time: &ArrayBase<S, Ix1>,
    censored: Option<&[Censor]>,
    formula: PlottingFormula,
) -> Result<Vec<Option<f64>>, Error> {
    let ranks = match censored {
        Some(_) => rank_adjust(time, censored)?,
        _ if time.is_empty() => return Err(Error::EmptySample),
        _ => (1..=time.len()).map(|k| Some(k as f64)).collect(),
    };

    let (a, b) = formula.constants();
    let n = ranks.len() as f64;
    Ok(ranks
        .into_iter()
        .map(|rank| rank.map(|r| (r - a) / (n + b)))
        .collect())
}
