use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for sales reps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepId(pub String);

impl fmt::Display for RepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lead acquisition channel (internet, phone, walk-in, service, referral, ...).
/// Sources are open-ended strings; imports decide the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw per-rep funnel counts for a single reporting period.
///
/// Counts are assumed, not guaranteed, to form a monotone funnel: a malformed
/// import can report more units than shows and the pipeline degrades to
/// clamped rates instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPeriodStats {
    pub rep_id: RepId,
    pub period: String,
    pub units_sold: u32,
    pub leads_by_source: BTreeMap<SourceId, u32>,
    pub unique_leads_attempted: u32,
    pub attempts: u32,
    pub contacts: u32,
    pub appointments_set: u32,
    pub appointments_show: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_response_time_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_age_days_at_first_contact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<f64>,
}

impl RepPeriodStats {
    pub fn total_leads(&self) -> u32 {
        self.leads_by_source.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_leads_sums_every_source() {
        let mut leads_by_source = BTreeMap::new();
        leads_by_source.insert(SourceId::from("internet"), 12);
        leads_by_source.insert(SourceId::from("walk_in"), 3);
        let stats = RepPeriodStats {
            rep_id: RepId::from("r1"),
            period: "2026-07".to_string(),
            units_sold: 4,
            leads_by_source,
            unique_leads_attempted: 15,
            attempts: 40,
            contacts: 9,
            appointments_set: 6,
            appointments_show: 5,
            first_response_time_minutes: None,
            lead_age_days_at_first_contact: None,
            gross_profit: None,
        };
        assert_eq!(stats.total_leads(), 15);
    }

    #[test]
    fn optional_timing_fields_default_when_absent() {
        let json = r#"{
            "rep_id": "r1",
            "period": "2026-07",
            "units_sold": 2,
            "leads_by_source": {"internet": 10},
            "unique_leads_attempted": 10,
            "attempts": 20,
            "contacts": 6,
            "appointments_set": 4,
            "appointments_show": 3
        }"#;
        let stats: RepPeriodStats = serde_json::from_str(json).expect("stats deserialize");
        assert_eq!(stats.units_sold, 2);
        assert!(stats.first_response_time_minutes.is_none());
        assert!(stats.gross_profit.is_none());
    }
}
