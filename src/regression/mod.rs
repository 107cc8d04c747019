use crate::error::Error;
use std::str::FromStr;

pub mod lsq;
pub mod rank;

pub use lsq::{fit_regression, fit_regression_lfp, RegressionFit};
pub use rank::{plotting_positions, rank_adjust, PlottingFormula};

/// Which variable the probability-plot line is regressed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressionDirection {
    /// Regress transformed probability on transformed time.
    OnY,
    /// Regress transformed time on transformed probability.
    OnX,
}

impl FromStr for RegressionDirection {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "y" => Ok(RegressionDirection::OnY),
            "x" => Ok(RegressionDirection::OnX),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}
