use serde::{Deserialize, Serialize};

use super::domain::RepPeriodStats;
use super::safe_divide;

/// Four-stage funnel conversion ratios for one rep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreRates {
    pub contact_rate: f64,
    pub appointment_set_rate: f64,
    pub show_rate: f64,
    pub close_from_show: f64,
    pub close_from_contact: f64,
}

/// Any ratio with a zero denominator resolves to 0 rather than erroring.
/// The two close rates are clamped to [0, 1]: an import can report more
/// units than shows, and the funnel model reads that as a saturated close.
pub fn core_rates(rep: &RepPeriodStats) -> CoreRates {
    let close_from_show = safe_divide(rep.units_sold as f64, rep.appointments_show as f64);
    let close_from_contact = safe_divide(rep.units_sold as f64, rep.contacts as f64);

    CoreRates {
        contact_rate: safe_divide(rep.contacts as f64, rep.unique_leads_attempted as f64),
        appointment_set_rate: safe_divide(rep.appointments_set as f64, rep.contacts as f64),
        show_rate: safe_divide(rep.appointments_show as f64, rep.appointments_set as f64),
        close_from_show: close_from_show.clamp(0.0, 1.0),
        close_from_contact: close_from_contact.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::rep_stats;

    #[test]
    fn rates_follow_funnel_counts() {
        let rep = rep_stats("r1", &[("internet", 20)], 20, 50, 10, 6, 4, 2);
        let rates = core_rates(&rep);
        assert_eq!(rates.contact_rate, 0.5);
        assert_eq!(rates.appointment_set_rate, 0.6);
        assert!((rates.show_rate - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(rates.close_from_show, 0.5);
        assert_eq!(rates.close_from_contact, 0.2);
    }

    #[test]
    fn zero_denominators_produce_zero_rates() {
        let rep = rep_stats("r1", &[], 0, 0, 0, 0, 0, 0);
        let rates = core_rates(&rep);
        assert_eq!(rates.contact_rate, 0.0);
        assert_eq!(rates.appointment_set_rate, 0.0);
        assert_eq!(rates.show_rate, 0.0);
        assert_eq!(rates.close_from_show, 0.0);
        assert_eq!(rates.close_from_contact, 0.0);
    }

    #[test]
    fn close_rates_saturate_on_malformed_funnels() {
        // More units than shows or contacts: clamp instead of rejecting.
        let rep = rep_stats("r1", &[("walk_in", 5)], 5, 10, 3, 3, 2, 7);
        let rates = core_rates(&rep);
        assert_eq!(rates.close_from_show, 1.0);
        assert_eq!(rates.close_from_contact, 1.0);
        // Non-close rates are deliberately left unclamped.
        assert!((rates.show_rate - 2.0 / 3.0).abs() < 1e-12);
    }
}
