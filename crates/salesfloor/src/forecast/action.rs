use super::domain::{ActionFocus, NextBestAction, RepMonthStats};

/// Above this quota-hit probability the only advice is to hold course.
const MAINTAIN_PACE_PROBABILITY: f64 = 0.75;
/// Contact rate below this marks the funnel's first stage as the bottleneck.
const CONTACT_RATE_FLOOR: f64 = 0.45;
/// Show rate below this marks appointment quality as the bottleneck.
const SHOW_RATE_FLOOR: f64 = 0.6;

/// First matching rule wins: pace, then contact rate, then show rate, then
/// raw lead volume. `target_delta` sizes the change each branch asks for.
pub fn compute_next_best_action(
    stats: &RepMonthStats,
    quota_hit_probability: f64,
    projected_units: f64,
    quota_units: u32,
) -> NextBestAction {
    if quota_hit_probability >= MAINTAIN_PACE_PROBABILITY {
        return NextBestAction {
            focus: ActionFocus::MaintainPace,
            message: "You are on track. Maintain current cadence and protect show quality."
                .to_string(),
            target_delta: (projected_units - quota_units as f64).round().max(0.0) as u32,
        };
    }

    if stats.contact_rate < CONTACT_RATE_FLOOR {
        let shortfall = (CONTACT_RATE_FLOOR - stats.contact_rate) * stats.leads.max(1) as f64;
        return NextBestAction {
            focus: ActionFocus::ImproveContactRate,
            message: "Prioritize first-response speed and same-day follow-up to lift contact rate."
                .to_string(),
            target_delta: shortfall.ceil() as u32,
        };
    }

    let show_rate = if stats.appts_set > 0 {
        stats.appts_show as f64 / stats.appts_set as f64
    } else {
        0.0
    };
    if show_rate < SHOW_RATE_FLOOR {
        let shortfall = (SHOW_RATE_FLOOR - show_rate) * stats.appts_set.max(1) as f64;
        return NextBestAction {
            focus: ActionFocus::ImproveShowRate,
            message:
                "Confirm appointments twice and tighten pre-appointment reminders to improve shows."
                    .to_string(),
            target_delta: shortfall.ceil() as u32,
        };
    }

    NextBestAction {
        focus: ActionFocus::IncreaseLeads,
        message: "Top lever now is additional lead volume from your highest converting channels."
            .to_string(),
        target_delta: ((quota_units as f64 - projected_units).ceil()).max(1.0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RepId;
    use chrono::NaiveDate;

    fn stats(leads: u32, contacts: u32, appts_set: u32, appts_show: u32) -> RepMonthStats {
        let contact_rate = if leads > 0 {
            contacts as f64 / leads as f64
        } else {
            0.0
        };
        RepMonthStats {
            rep_id: RepId::from("r1"),
            month: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid month"),
            leads,
            contacts,
            appts_set,
            appts_show,
            sold_units: 3,
            close_rate: 0.4,
            contact_rate,
        }
    }

    #[test]
    fn healthy_probability_says_maintain_pace() {
        let action = compute_next_best_action(&stats(40, 10, 5, 2), 0.8, 14.4, 12);
        assert_eq!(action.focus, ActionFocus::MaintainPace);
        // Surplus over quota, rounded: 14.4 - 12 = 2.
        assert_eq!(action.target_delta, 2);
    }

    #[test]
    fn maintain_pace_delta_never_goes_negative() {
        let action = compute_next_best_action(&stats(40, 10, 5, 2), 0.75, 11.2, 12);
        assert_eq!(action.focus, ActionFocus::MaintainPace);
        assert_eq!(action.target_delta, 0);
    }

    #[test]
    fn weak_contact_rate_is_the_first_bottleneck_checked() {
        // 10 / 40 contacted: well under the 0.45 floor.
        let action = compute_next_best_action(&stats(40, 10, 2, 0), 0.3, 6.0, 12);
        assert_eq!(action.focus, ActionFocus::ImproveContactRate);
        // ceil((0.45 - 0.25) * 40) = 8 more contacts.
        assert_eq!(action.target_delta, 8);
    }

    #[test]
    fn weak_show_rate_comes_next() {
        // Contact rate 0.5 is fine; shows 4 of 10 is not.
        let action = compute_next_best_action(&stats(40, 20, 10, 4), 0.3, 6.0, 12);
        assert_eq!(action.focus, ActionFocus::ImproveShowRate);
        // ceil((0.6 - 0.4) * 10) = 2 more shows.
        assert_eq!(action.target_delta, 2);
    }

    #[test]
    fn no_appointments_reads_as_zero_show_rate() {
        let action = compute_next_best_action(&stats(40, 20, 0, 0), 0.3, 6.0, 12);
        assert_eq!(action.focus, ActionFocus::ImproveShowRate);
        // ceil(0.6 * max(1, 0)) = 1.
        assert_eq!(action.target_delta, 1);
    }

    #[test]
    fn otherwise_ask_for_more_leads() {
        let action = compute_next_best_action(&stats(40, 20, 10, 8), 0.3, 6.0, 12);
        assert_eq!(action.focus, ActionFocus::IncreaseLeads);
        // ceil(12 - 6) = 6 more units of lead-driven volume.
        assert_eq!(action.target_delta, 6);
    }

    #[test]
    fn increase_leads_asks_for_at_least_one() {
        let action = compute_next_best_action(&stats(40, 20, 10, 8), 0.74, 12.5, 12);
        assert_eq!(action.focus, ActionFocus::IncreaseLeads);
        assert_eq!(action.target_delta, 1);
    }
}
