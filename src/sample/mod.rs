use crate::distribution::{CumulativeDensity, Density, Reliability};
use crate::error::Error;
use crate::utils::SafeLogExp;
use ndarray::prelude::*;
use ndarray::Data;
use num_traits::{Float, FromPrimitive};

pub mod fitter;

/// Censoring class of a recorded time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Censor {
    /// Failure occurred before the recorded time.
    Left,
    /// Failure observed exactly at the recorded time.
    Observed,
    /// Unit survived past the recorded time.
    Right,
}

impl Censor {
    /// Parse the integer code convention: `-1` left, `0` observed,
    /// `+1` right.
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            -1 => Ok(Censor::Left),
            0 => Ok(Censor::Observed),
            1 => Ok(Censor::Right),
            other => Err(Error::InvalidInput(format!(
                "unknown censoring code {}",
                other
            ))),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Censor::Left => -1,
            Censor::Observed => 0,
            Censor::Right => 1,
        }
    }
}

/// The log likelihood of data based on a distribution.
pub trait LogLikelihood<Distribution, F> {
    fn log_likelihood(&self, distribution: &Distribution) -> F;
}

/// A sample of recorded times partitioned by censoring class.
#[derive(Debug, Clone)]
pub struct CensoredSample<F> {
    pub left: Array1<F>,
    pub observed: Array1<F>,
    pub right: Array1<F>,
}

impl<F> CensoredSample<F>
where
    F: Float,
{
    /// Partition times by their censoring codes.
    pub fn from_codes<S: Data<Elem = F>>(
        time: &ArrayBase<S, Ix1>,
        censor: &[Censor],
    ) -> Result<Self, Error> {
        if time.len() != censor.len() {
            return Err(Error::InvalidInput(format!(
                "{} times but {} censoring codes",
                time.len(),
                censor.len()
            )));
        }
        if time.is_empty() {
            return Err(Error::EmptySample);
        }

        let third_capacity = time.len() / 3;
        let mut left = Vec::with_capacity(third_capacity);
        let mut observed = Vec::with_capacity(third_capacity);
        let mut right = Vec::with_capacity(third_capacity);

        for (&t, class) in time.iter().zip(censor.iter()) {
            match class {
                Censor::Left => left.push(t),
                Censor::Observed => observed.push(t),
                Censor::Right => right.push(t),
            }
        }

        Ok(CensoredSample {
            left: Array::from(left),
            observed: Array::from(observed),
            right: Array::from(right),
        })
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.observed.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F> CensoredSample<F>
where
    F: Float + FromPrimitive,
{
    /// Mean of every recorded time, censored or not.
    pub fn pooled_mean(&self) -> F {
        let total = self.left.sum() + self.observed.sum() + self.right.sum();
        total / F::from_usize(self.len()).unwrap()
    }

    /// Population standard deviation of every recorded time. Falls back to
    /// one for degenerate samples so optimizer scale parameters start
    /// strictly positive.
    pub fn pooled_std(&self) -> F {
        let mean = self.pooled_mean();
        let spread = |values: &Array1<F>| {
            values
                .iter()
                .fold(F::zero(), |acc, &t| acc + (t - mean) * (t - mean))
        };
        let variance = (spread(&self.left) + spread(&self.observed) + spread(&self.right))
            / F::from_usize(self.len()).unwrap();
        let std = variance.sqrt();
        if std > F::zero() {
            std
        } else {
            F::one()
        }
    }
}

impl<D, F> LogLikelihood<D, F> for CensoredSample<F>
where
    D: Density<Array1<F>, Array1<F>>
        + CumulativeDensity<Array1<F>, Array1<F>>
        + Reliability<Array1<F>, Array1<F>>,
    F: Float + SafeLogExp,
{
    /// `sum ln cdf` over left-censored, `sum ln pdf` over observed,
    /// `sum ln reliability` over right-censored entries, with the logarithms
    /// clamped away from zero.
    fn log_likelihood(&self, distribution: &D) -> F {
        let left = distribution
            .cumulative_density(&self.left)
            .mapv_into(SafeLogExp::safe_ln)
            .sum();
        let observed = distribution
            .density(&self.observed)
            .mapv_into(SafeLogExp::safe_ln)
            .sum();
        let right = distribution
            .reliability(&self.right)
            .mapv_into(SafeLogExp::safe_ln)
            .sum();

        left + observed + right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::weibull::WeibullDistribution;
    use ndarray::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn from_codes_partitions() {
        let time = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let censor = [
            Censor::Observed,
            Censor::Right,
            Censor::Left,
            Censor::Observed,
            Censor::Right,
        ];

        let sample = CensoredSample::from_codes(&time, &censor).unwrap();
        assert_eq!(sample.left, array![3.0]);
        assert_eq!(sample.observed, array![1.0, 4.0]);
        assert_eq!(sample.right, array![2.0, 5.0]);
        assert_eq!(sample.len(), 5);
    }

    #[test]
    fn from_codes_rejects_length_mismatch() {
        let result = CensoredSample::from_codes(&array![1.0, 2.0], &[Censor::Observed]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn from_codes_rejects_empty() {
        let result = CensoredSample::<f64>::from_codes(&array![], &[]);
        assert!(matches!(result, Err(Error::EmptySample)));
    }

    #[test]
    fn censor_code_round_trip() {
        for class in [Censor::Left, Censor::Observed, Censor::Right].iter() {
            assert_eq!(Censor::from_code(class.code()).unwrap(), *class);
        }
        assert!(Censor::from_code(2).is_err());
    }

    #[test]
    fn log_likelihood_exponential_by_hand() {
        // Weibull with scale 1, shape 1 is a unit exponential, so
        // ln pdf(t) = ln rel(t) = -t and ln cdf(t) = ln(1 - exp(-t)).
        let distribution = WeibullDistribution {
            scale: 1.0,
            shape: 1.0,
        };

        let sample = CensoredSample {
            left: array![0.5],
            observed: array![1.0, 2.0],
            right: array![3.0],
        };

        let expected = (1.0 - (-0.5f64).exp()).ln() - 1.0 - 2.0 - 3.0;
        let actual: f64 = sample.log_likelihood(&distribution);
        assert!((actual - expected).abs() < TOLERANCE);
    }

    #[test]
    fn pooled_moments() {
        let sample = CensoredSample {
            left: array![2.0],
            observed: array![4.0, 6.0],
            right: array![8.0],
        };

        assert!((sample.pooled_mean() - 5.0).abs() < TOLERANCE);
        // population variance of [2, 4, 6, 8] is 5
        assert!((sample.pooled_std() - 5.0f64.sqrt()).abs() < TOLERANCE);
    }
}
