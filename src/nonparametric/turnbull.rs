use crate::error::Error;
use ndarray::prelude::*;
use ndarray::Data;
use serde_derive::Serialize;

/// Iteration budget and stopping tolerance for the Turnbull
/// self-consistency loop.
#[derive(Debug, Clone)]
pub struct TurnbullOptions {
    pub max_iterations: usize,
    /// Stop once no point's mass moves by more than this between sweeps.
    pub tolerance: f64,
}

impl Default for TurnbullOptions {
    fn default() -> Self {
        TurnbullOptions {
            max_iterations: 1000,
            tolerance: 1e-9,
        }
    }
}

/// Discrete failure-probability mass over the distinct interval endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TurnbullEstimate {
    /// Sorted distinct endpoint values.
    pub time: Array1<f64>,
    /// Probability mass per point; sums to one.
    pub mass: Array1<f64>,
    /// Expected failure count per point (`mass` scaled by the sample size).
    pub expected_failures: Array1<f64>,
    /// `inclusion[[i, j]]` is one when interval `i` contains point `j`.
    pub inclusion: Array2<f64>,
    /// Sweeps actually performed.
    pub iterations: usize,
}

/// Turnbull estimate for interval-censored failure brackets.
///
/// Starting from a uniform mass over the endpoint values, each sweep
/// redistributes every unit's probability over the points its interval
/// contains, in proportion to the current mass, and renormalizes. The loop
/// is bounded: it stops at `tolerance` or after `max_iterations` sweeps,
/// whichever comes first. The iteration count is a budget, not a convergence
/// guarantee.
///
/// An unbounded upper endpoint may be given as `f64::INFINITY`.
pub fn turnbull<S: Data<Elem = f64>>(
    lower: &ArrayBase<S, Ix1>,
    upper: &ArrayBase<S, Ix1>,
    options: &TurnbullOptions,
) -> Result<TurnbullEstimate, Error> {
    if lower.len() != upper.len() {
        return Err(Error::InvalidInput(format!(
            "{} lower bounds but {} upper bounds",
            lower.len(),
            upper.len()
        )));
    }
    if lower.is_empty() {
        return Err(Error::EmptySample);
    }
    for (&lo, &hi) in lower.iter().zip(upper.iter()) {
        if !lo.is_finite() || hi.is_nan() {
            return Err(Error::InvalidInput(
                "interval endpoints must be numbers with a finite lower bound".to_string(),
            ));
        }
        if lo > hi {
            return Err(Error::InvalidInput(format!(
                "interval [{}, {}] is reversed",
                lo, hi
            )));
        }
    }

    let n = lower.len();
    let mut points: Vec<f64> = lower.iter().chain(upper.iter()).cloned().collect();
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    points.dedup();
    let m = points.len();

    let mut inclusion = Array2::zeros((n, m));
    for i in 0..n {
        for (j, &x) in points.iter().enumerate() {
            if lower[i] <= x && upper[i] >= x {
                inclusion[[i, j]] = 1.0;
            }
        }
    }

    let mut mass = Array1::from_elem(m, 1.0 / m as f64);
    let mut expected = Array1::zeros(m);
    let mut iterations = 0;

    loop {
        iterations += 1;

        expected.fill(0.0);
        for i in 0..n {
            let denominator: f64 = (0..m).map(|k| inclusion[[i, k]] * mass[k]).sum();
            if denominator <= 0.0 || !denominator.is_finite() {
                return Err(Error::DegenerateInterval(i));
            }
            for j in 0..m {
                expected[j] += inclusion[[i, j]] * mass[j] / denominator;
            }
        }

        let updated = &expected / n as f64;
        let change = updated
            .iter()
            .zip(mass.iter())
            .map(|(new, old)| (new - old).abs())
            .fold(0.0, f64::max);
        mass = updated;

        if change < options.tolerance || iterations >= options.max_iterations {
            return Ok(TurnbullEstimate {
                time: Array::from(points),
                mass,
                expected_failures: expected,
                inclusion,
                iterations,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn exact_observations_get_uniform_mass() {
        let estimate = turnbull(
            &array![1.0, 2.0, 3.0],
            &array![1.0, 2.0, 3.0],
            &Default::default(),
        )
        .unwrap();

        assert_eq!(estimate.time, array![1.0, 2.0, 3.0]);
        for &p in estimate.mass.iter() {
            assert!((p - 1.0 / 3.0).abs() < TOLERANCE);
        }
        assert_eq!(estimate.iterations, 1);
    }

    #[test]
    fn mass_sums_to_one() {
        let estimate = turnbull(
            &array![0.0, 1.0, 2.0, 4.0],
            &array![2.0, 3.0, 6.0, 9.0],
            &Default::default(),
        )
        .unwrap();

        assert!((estimate.mass.sum() - 1.0).abs() < TOLERANCE);
        assert!(estimate.mass.iter().all(|&p| p >= 0.0));
        assert!(
            (estimate.expected_failures.sum() - 4.0).abs() < TOLERANCE,
            "expected counts should sum to the sample size"
        );
    }

    #[test]
    fn overlapping_intervals_concentrate_shared_mass() {
        let estimate = turnbull(&array![0.0, 1.0], &array![2.0, 3.0], &Default::default()).unwrap();

        // Mass flows to the shared interior points.
        assert_eq!(estimate.time, array![0.0, 1.0, 2.0, 3.0]);
        assert!((estimate.mass.sum() - 1.0).abs() < TOLERANCE);
        assert!(estimate.mass[0] + estimate.mass[3] < 0.01);
        assert!((estimate.mass[1] - 0.5).abs() < 0.01);
        assert!((estimate.mass[2] - 0.5).abs() < 0.01);
    }

    #[test]
    fn indicator_matrix_reflects_containment() {
        let estimate = turnbull(&array![0.0, 1.0], &array![2.0, 3.0], &Default::default()).unwrap();

        assert_eq!(
            estimate.inclusion,
            array![[1.0, 1.0, 1.0, 0.0], [0.0, 1.0, 1.0, 1.0]]
        );
    }

    #[test]
    fn iteration_budget_is_honored() {
        let options = TurnbullOptions {
            max_iterations: 3,
            tolerance: 0.0,
        };
        let estimate = turnbull(&array![0.0, 1.0], &array![2.0, 3.0], &options).unwrap();
        assert_eq!(estimate.iterations, 3);
    }

    #[test]
    fn open_ended_upper_bound_is_allowed() {
        let estimate = turnbull(
            &array![1.0, 2.0],
            &array![3.0, f64::INFINITY],
            &Default::default(),
        )
        .unwrap();

        assert!((estimate.mass.sum() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn rejects_reversed_interval() {
        let result = turnbull(&array![2.0], &array![1.0], &Default::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_empty_sample() {
        let result = turnbull(&array![], &array![], &Default::default());
        assert!(matches!(result, Err(Error::EmptySample)));
    }
}
