use self::Error::*;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Malformed input data: mismatched array lengths, non-finite times,
    /// a zero population, or a censoring code a component does not accept.
    InvalidInput(String),
    /// No usable observations remain after filtering.
    EmptySample,
    /// Unrecognized plotting-position formula name.
    UnknownFormula(String),
    /// Regression direction other than `x` or `y`.
    InvalidDirection(String),
    /// A Turnbull self-consistency step divided by a zero mass; the index is
    /// the offending interval.
    DegenerateInterval(usize),
    /// The optimizer stopped without satisfying its convergence criterion.
    NonConvergence,
    /// This error occurs when converting between vectors and distribution types
    /// Can probably be removed with constant generics https://github.com/rust-lang/rust/issues/44580
    IncompatibleDistributionParameterCount(usize, usize),
    NumericalConversion(f64),
    Anyhow(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            InvalidInput(reason) => write!(f, "Invalid input: {}", reason),
            EmptySample => write!(f, "No usable observations in sample"),
            UnknownFormula(name) => write!(f, "Unknown plotting position formula {:?}", name),
            InvalidDirection(code) => {
                write!(f, "Regression direction must be 'x' or 'y', got {:?}", code)
            }
            DegenerateInterval(index) => write!(
                f,
                "Interval {} has zero total mass over its candidate points",
                index
            ),
            NonConvergence => write!(f, "Optimizer terminated without converging"),
            IncompatibleDistributionParameterCount(vec, dist) =>
                write!(f, "Error converting between vector of {} elements and distribution with {} parameters", vec, dist),
            NumericalConversion(value) => {
                write!(f, "Error converting {} to the target float type", value)
            }
            Anyhow(e) => e.fmt(f),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Anyhow(e)
    }
}

impl std::error::Error for Error {}
