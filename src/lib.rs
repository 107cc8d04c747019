#[cfg(doctest)]
use doc_comment::doctest;


pub mod distribution;
pub mod error;
pub mod nonparametric;
pub mod regression;
pub mod sample;
mod utils;

pub use error::Error;

pub use distribution::gumbel::GumbelDistribution;
pub use distribution::lfp::LimitedFailure;
pub use distribution::normal::NormalDistribution;
pub use distribution::weibull::WeibullDistribution;

pub use nonparametric::{
    fleming_harrington, kaplan_meier, nelson_aalen, success_run, turnbull, EstimatorKind,
    NonParametric, RiskSet, TurnbullEstimate, TurnbullOptions,
};

pub use regression::{
    fit_regression, fit_regression_lfp, plotting_positions, rank_adjust, PlottingFormula,
    RegressionDirection, RegressionFit,
};

pub use sample::fitter::{
    fit_mle, BaseFitter, FitOutcome, Fitter, FitterParameters, InitialSolvePoint,
};
pub use sample::{Censor, CensoredSample};

#[cfg(doctest)]
doctest!("../README.md");
