use serde::{Deserialize, Serialize};

use super::domain::RepPeriodStats;
use super::safe_divide;

/// Store-wide funnel baselines pooled across every rep in the snapshot.
///
/// Pooled means sum-of-numerators over sum-of-denominators, not an average
/// of per-rep ratios, so reps with thin denominators cannot bias the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreBaselines {
    pub contact_rate: f64,
    pub appointment_set_rate: f64,
}

pub fn store_baselines(reps: &[RepPeriodStats]) -> StoreBaselines {
    let mut unique_leads_attempted = 0u64;
    let mut contacts = 0u64;
    let mut appointments_set = 0u64;

    for rep in reps {
        unique_leads_attempted += rep.unique_leads_attempted as u64;
        contacts += rep.contacts as u64;
        appointments_set += rep.appointments_set as u64;
    }

    StoreBaselines {
        contact_rate: safe_divide(contacts as f64, unique_leads_attempted as f64),
        appointment_set_rate: safe_divide(appointments_set as f64, contacts as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::rep_stats;

    #[test]
    fn baselines_pool_rather_than_average() {
        // Rep A: 1/1 contacted. Rep B: 10/100 contacted.
        // An average of ratios would say 0.55; pooling says 11/101.
        let reps = vec![
            rep_stats("a", &[("internet", 1)], 1, 2, 1, 1, 1, 0),
            rep_stats("b", &[("internet", 100)], 100, 150, 10, 5, 3, 1),
        ];
        let baselines = store_baselines(&reps);
        assert!((baselines.contact_rate - 11.0 / 101.0).abs() < 1e-12);
        assert!((baselines.appointment_set_rate - 6.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn empty_population_yields_zero_baselines() {
        let baselines = store_baselines(&[]);
        assert_eq!(baselines.contact_rate, 0.0);
        assert_eq!(baselines.appointment_set_rate, 0.0);
    }
}
