use serde::{Deserialize, Serialize};

/// Tuning knobs for the analytics pipeline.
///
/// Deserializes with per-struct defaults so API callers can override any
/// subset of fields and inherit the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsParams {
    /// Fraction of the gap to the top performer folded into the next target.
    pub gap_close_rate: f64,
    /// Clamp applied to rep contact rate relative to the store baseline.
    pub contact_multiplier_bounds: (f64, f64),
    /// Clamp applied to rep appointment-set rate relative to the store baseline.
    pub appointment_multiplier_bounds: (f64, f64),
    /// Opportunity volume at which confidence reaches 1 - 1/e.
    pub confidence_tau: f64,
    /// Ceiling on the contact rate a prescription may ask for.
    pub max_realistic_contact_rate: f64,
    /// Passes of the iterative proportional scaling loop.
    pub weight_iterations: u32,
    /// Pseudo-lead count pulling each source weight toward the global rate.
    pub weight_prior_strength: f64,
    /// Upper bound on expected units per lead for any source.
    pub max_source_weight: f64,
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            gap_close_rate: 0.25,
            contact_multiplier_bounds: (0.80, 1.25),
            appointment_multiplier_bounds: (0.85, 1.20),
            confidence_tau: 50.0,
            max_realistic_contact_rate: 0.85,
            weight_iterations: 6,
            weight_prior_strength: 50.0,
            max_source_weight: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = AnalyticsParams::default();
        assert_eq!(params.gap_close_rate, 0.25);
        assert_eq!(params.contact_multiplier_bounds, (0.80, 1.25));
        assert_eq!(params.appointment_multiplier_bounds, (0.85, 1.20));
        assert_eq!(params.confidence_tau, 50.0);
        assert_eq!(params.max_realistic_contact_rate, 0.85);
        assert_eq!(params.weight_iterations, 6);
        assert_eq!(params.weight_prior_strength, 50.0);
        assert_eq!(params.max_source_weight, 2.0);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let params: AnalyticsParams =
            serde_json::from_str(r#"{"gap_close_rate": 0.5}"#).expect("params deserialize");
        assert_eq!(params.gap_close_rate, 0.5);
        assert_eq!(params.confidence_tau, 50.0);
        assert_eq!(params.weight_iterations, 6);
    }
}
