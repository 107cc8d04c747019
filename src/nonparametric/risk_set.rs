use crate::error::Error;
use crate::sample::Censor;
use crate::utils::argsort;
use ndarray::prelude::*;
use ndarray::Data;
use serde_derive::Serialize;

/// Canonical per-unique-time event table: for each distinct recorded time,
/// the number of units still at risk just before it, the failures exactly at
/// it, and the right-censorings exactly at it.
///
/// Every distinct time gets a row, including times at which only censorings
/// occurred (`failures = 0` there). Left-censored observations have no place
/// in this representation and are rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSet {
    pub time: Array1<f64>,
    pub at_risk: Array1<u64>,
    pub censored: Array1<u64>,
    pub failures: Array1<u64>,
    pub population: u64,
}

impl RiskSet {
    /// Build the table from any of the observation-set encodings.
    ///
    /// - no censoring, no counts: duplicate times collapse into failure
    ///   multiplicities;
    /// - counts without censoring: entries are taken as already-distinct
    ///   times with per-time failure counts;
    /// - censoring with or without counts: failures and censorings
    ///   accumulate per distinct time, weighted by the counts when present.
    pub fn build<S: Data<Elem = f64>>(
        time: &ArrayBase<S, Ix1>,
        censored: Option<&[Censor]>,
        counts: Option<&[u64]>,
    ) -> Result<Self, Error> {
        if time.is_empty() {
            return Err(Error::EmptySample);
        }
        if let Some(censored) = censored {
            if censored.len() != time.len() {
                return Err(Error::InvalidInput(format!(
                    "{} times but {} censoring codes",
                    time.len(),
                    censored.len()
                )));
            }
            if censored.iter().any(|&c| c == Censor::Left) {
                return Err(Error::InvalidInput(
                    "left-censored entries cannot enter a risk-set table".to_string(),
                ));
            }
        }
        if let Some(counts) = counts {
            if counts.len() != time.len() {
                return Err(Error::InvalidInput(format!(
                    "{} times but {} counts",
                    time.len(),
                    counts.len()
                )));
            }
        }

        let values: Vec<f64> = time.iter().cloned().collect();
        if values.iter().any(|t| !t.is_finite()) {
            return Err(Error::InvalidInput("times must be finite".to_string()));
        }

        let population = match counts {
            Some(counts) => counts.iter().sum(),
            None => values.len() as u64,
        };
        if population == 0 {
            return Err(Error::InvalidInput("population size is zero".to_string()));
        }

        let order = argsort(&values);

        let mut unique = Vec::new();
        let mut failures = Vec::new();
        let mut censorings = Vec::new();

        if censored.is_none() && counts.is_some() {
            // Counts without censoring: times are assumed distinct already.
            let counts = counts.unwrap();
            for &idx in &order {
                unique.push(values[idx]);
                failures.push(counts[idx]);
                censorings.push(0);
            }
        } else {
            for &idx in &order {
                let weight = counts.map_or(1, |c| c[idx]);
                let is_failure = censored.map_or(true, |c| c[idx] == Censor::Observed);

                if unique.last() != Some(&values[idx]) {
                    unique.push(values[idx]);
                    failures.push(0);
                    censorings.push(0);
                }
                let row = unique.len() - 1;
                if is_failure {
                    failures[row] += weight;
                } else {
                    censorings[row] += weight;
                }
            }
        }

        // r[0] = N; r[i] = r[i-1] - d[i-1] - c[i-1]
        let mut at_risk = Vec::with_capacity(unique.len());
        let mut remaining = population;
        for row in 0..unique.len() {
            at_risk.push(remaining);
            remaining -= failures[row] + censorings[row];
        }

        Ok(RiskSet {
            time: Array::from(unique),
            at_risk: Array::from(at_risk),
            censored: Array::from(censorings),
            failures: Array::from(failures),
            population,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    #[test]
    fn uncensored_duplicates_collapse() {
        let table = RiskSet::build(&array![3.0, 1.0, 3.0, 2.0], None, None).unwrap();

        assert_eq!(table.time, array![1.0, 2.0, 3.0]);
        assert_eq!(table.failures, array![1, 1, 2]);
        assert_eq!(table.censored, array![0, 0, 0]);
        assert_eq!(table.at_risk, array![4, 3, 2]);
        assert_eq!(table.population, 4);
    }

    #[test]
    fn counts_without_censoring_sort_by_time() {
        let table = RiskSet::build(&array![20.0, 10.0], None, Some(&[2, 3])).unwrap();

        assert_eq!(table.time, array![10.0, 20.0]);
        assert_eq!(table.failures, array![3, 2]);
        assert_eq!(table.at_risk, array![5, 2]);
        assert_eq!(table.population, 5);
    }

    #[test]
    fn censored_times_keep_their_own_rows() {
        // Censored-only times appear as rows with zero failures.
        let censored = [
            Censor::Observed,
            Censor::Right,
            Censor::Observed,
            Censor::Observed,
            Censor::Right,
        ];
        let table =
            RiskSet::build(&array![2.0, 3.0, 5.0, 8.0, 10.0], Some(&censored), None).unwrap();

        assert_eq!(table.time, array![2.0, 3.0, 5.0, 8.0, 10.0]);
        assert_eq!(table.failures, array![1, 0, 1, 1, 0]);
        assert_eq!(table.censored, array![0, 1, 0, 0, 1]);
        assert_eq!(table.at_risk, array![5, 4, 3, 2, 1]);
    }

    #[test]
    fn censoring_and_counts_accumulate_per_time() {
        let censored = [Censor::Observed, Censor::Right, Censor::Observed];
        let table = RiskSet::build(
            &array![5.0, 5.0, 9.0],
            Some(&censored),
            Some(&[4, 2, 3]),
        )
        .unwrap();

        assert_eq!(table.time, array![5.0, 9.0]);
        assert_eq!(table.failures, array![4, 3]);
        assert_eq!(table.censored, array![2, 0]);
        assert_eq!(table.at_risk, array![9, 3]);
        assert_eq!(table.population, 9);
    }

    #[test]
    fn at_risk_is_non_increasing_and_covers_events() {
        let censored = [
            Censor::Observed,
            Censor::Right,
            Censor::Observed,
            Censor::Right,
            Censor::Observed,
            Censor::Observed,
        ];
        let table = RiskSet::build(
            &array![1.0, 1.0, 2.0, 3.0, 3.0, 4.0],
            Some(&censored),
            None,
        )
        .unwrap();

        for i in 0..table.len() {
            assert!(table.at_risk[i] >= table.failures[i] + table.censored[i]);
            if i > 0 {
                assert!(table.at_risk[i] <= table.at_risk[i - 1]);
            }
        }
    }

    #[test]
    fn rejects_left_censoring() {
        let result = RiskSet::build(&array![1.0, 2.0], Some(&[Censor::Left, Censor::Observed]), None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_zero_population() {
        let result = RiskSet::build(&array![1.0, 2.0], None, Some(&[0, 0]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_empty_input() {
        let result = RiskSet::build(&array![], None, None);
        assert!(matches!(result, Err(Error::EmptySample)));
    }

    #[test]
    fn rejects_non_finite_times() {
        let result = RiskSet::build(&array![1.0, f64::NAN], None, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
