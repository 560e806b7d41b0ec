use serde::{Deserialize, Serialize};

use super::params::AnalyticsParams;

/// Next-period unit goal that partially closes the gap to the top performer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchUpTarget {
    pub current_units: u32,
    pub top_performer_units: u32,
    pub gap: u32,
    pub gap_close_rate: f64,
    pub target_units: u32,
    pub delta_units: u32,
}

/// A trailing rep is always asked for at least one more unit; the leader's
/// target is simply their current total.
pub fn catch_up_target(
    rep_units: u32,
    top_performer_units: u32,
    params: &AnalyticsParams,
) -> CatchUpTarget {
    let gap = top_performer_units.saturating_sub(rep_units);
    let raw_target = (rep_units as f64 + gap as f64 * params.gap_close_rate).ceil() as u32;
    let target_units = if gap > 0 {
        raw_target.max(rep_units + 1)
    } else {
        raw_target
    };

    CatchUpTarget {
        current_units: rep_units,
        top_performer_units,
        gap,
        gap_close_rate: params.gap_close_rate,
        target_units,
        delta_units: target_units - rep_units,
    }
}
