//! Steady-state occupancy distribution P(n) = (1−ρ)·ρⁿ.

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, QueueResult};

/// Number of occupancy levels shown by default (n = 0..14).
pub const DEFAULT_MAX_N: usize = 15;
/// Largest number of occupancy levels any caller may ask for.
pub const MAX_DISTRIBUTION_LEN: usize = 1_000;

/// Probability of exactly `n` customers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyProbability {
    /// Number of customers in the system.
    pub n: usize,
    /// Steady-state probability P(n).
    pub probability: f64,
}

/// Truncated geometric occupancy distribution for n in [0, `max_n`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyDistribution {
    /// Utilization the distribution was computed for.
    pub utilization: f64,
    /// Ordered (n, P(n)) entries starting at n = 0.
    pub entries: Vec<OccupancyProbability>,
}

impl OccupancyDistribution {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the distribution has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// P(n) for a given n, if it lies in the truncated range.
    #[must_use]
    pub fn probability(&self, n: usize) -> Option<f64> {
        self.entries.get(n).map(|e| e.probability)
    }

    /// Probability mass covered by the truncated entries, 1 − ρ^N.
    #[must_use]
    pub fn covered_mass(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Probability of N or more customers, ρ^N, where N is the entry count.
    #[must_use]
    pub fn tail_mass(&self) -> f64 {
        let exponent = i32::try_from(self.entries.len()).unwrap_or(i32::MAX);
        self.utilization.powi(exponent)
    }

    /// Iterate `(n, P(n))` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|e| (e.n, e.probability))
    }
}

/// Compute P(n) = (1−ρ)·ρⁿ for n in [0, `max_n`).
///
/// # Errors
///
/// - [`QueueError::Unstable`] if ρ ≥ 1 (the distribution diverges).
/// - [`QueueError::InvalidParameter`] if ρ is negative or non-finite, or if
///   `max_n` exceeds [`MAX_DISTRIBUTION_LEN`].
pub fn occupancy_distribution(rho: f64, max_n: usize) -> QueueResult<OccupancyDistribution> {
    if !rho.is_finite() {
        return Err(QueueError::invalid("utilization", rho, "must be finite"));
    }
    if rho < 0.0 {
        return Err(QueueError::invalid("utilization", rho, "must be non-negative"));
    }
    if max_n > MAX_DISTRIBUTION_LEN {
        return Err(QueueError::invalid(
            "max_n",
            max_n as f64,
            "must not exceed 1000",
        ));
    }
    if rho >= 1.0 {
        return Err(QueueError::unstable(rho));
    }

    let idle = 1.0 - rho;
    let entries = std::iter::successors(Some(1.0_f64), |power| Some(power * rho))
        .take(max_n)
        .enumerate()
        .map(|(n, power)| OccupancyProbability {
            n,
            probability: idle * power,
        })
        .collect();

    Ok(OccupancyDistribution {
        utilization: rho,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p0_is_idle_probability() {
        let dist = occupancy_distribution(0.75, DEFAULT_MAX_N).expect("stable");
        assert_eq!(dist.len(), DEFAULT_MAX_N);
        assert!((dist.probability(0).unwrap_or_default() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_values() {
        let dist = occupancy_distribution(0.5, 4).expect("stable");
        let probs: Vec<f64> = dist.iter().map(|(_, p)| p).collect();
        assert_eq!(probs, vec![0.5, 0.25, 0.125, 0.0625]);
        assert_eq!(dist.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_mass_split() {
        let dist = occupancy_distribution(0.857_142_857, DEFAULT_MAX_N).expect("stable");
        let covered = dist.covered_mass();
        assert!(covered < 1.0);
        assert!((covered + dist.tail_mass() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unstable_rejected() {
        assert!(matches!(
            occupancy_distribution(1.0, 15),
            Err(QueueError::Unstable { .. })
        ));
        assert!(matches!(
            occupancy_distribution(1.2, 15),
            Err(QueueError::Unstable { .. })
        ));
    }

    #[test]
    fn test_invalid_rho_rejected() {
        assert!(matches!(
            occupancy_distribution(-0.1, 15),
            Err(QueueError::InvalidParameter { .. })
        ));
        assert!(occupancy_distribution(f64::NAN, 15).is_err());
    }

    #[test]
    fn test_oversized_length_rejected() {
        assert!(occupancy_distribution(0.5, MAX_DISTRIBUTION_LEN).is_ok());
        let err = occupancy_distribution(0.5, usize::MAX).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "max_n", .. }));
        assert!(occupancy_distribution(0.5, MAX_DISTRIBUTION_LEN + 1).is_err());
    }

    #[test]
    fn test_zero_length() {
        let dist = occupancy_distribution(0.5, 0).expect("stable");
        assert!(dist.is_empty());
        assert!((dist.tail_mass() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_utilization_all_mass_at_zero() {
        let dist = occupancy_distribution(0.0, 5).expect("stable");
        assert!((dist.probability(0).unwrap_or_default() - 1.0).abs() < 1e-12);
        assert!(dist.iter().skip(1).all(|(_, p)| p == 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// P(n) is strictly decreasing and starts at 1 − ρ.
            #[test]
            fn prop_strictly_decreasing(rho in 0.01f64..0.99) {
                let dist = occupancy_distribution(rho, DEFAULT_MAX_N).expect("stable");
                prop_assert!((dist.entries[0].probability - (1.0 - rho)).abs() < 1e-12);
                for pair in dist.entries.windows(2) {
                    prop_assert!(pair[1].probability < pair[0].probability);
                }
            }

            /// The truncated sum stays below 1.
            #[test]
            fn prop_partial_sum_below_one(rho in 0.2f64..0.99) {
                let dist = occupancy_distribution(rho, DEFAULT_MAX_N).expect("stable");
                prop_assert!(dist.covered_mass() < 1.0);
            }
        }

        #[test]
        fn test_partial_sum_approaches_one_as_rho_vanishes() {
            let covered = |rho: f64| {
                occupancy_distribution(rho, DEFAULT_MAX_N)
                    .expect("stable")
                    .covered_mass()
            };
            let sums: Vec<f64> = [0.9, 0.7, 0.5, 0.3].iter().map(|&rho| covered(rho)).collect();
            for pair in sums.windows(2) {
                assert!(pair[1] > pair[0]);
            }
            assert!(1.0 - covered(0.01) < 1e-12);
        }
    }
}
