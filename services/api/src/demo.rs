use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use salesfloor::analytics::{
    AnalyticsParams, PerformanceAnalyzer, RepAnalysis, RepId, RepPeriodStats, SourceId,
};
use salesfloor::error::AppError;
use salesfloor::forecast::{month_start, ForecastService, MonthToDateCounts, RecomputeInput};

use crate::infra::InMemoryForecastStore;

#[derive(Args, Debug, Default)]
pub(crate) struct LeaderboardArgs {
    /// Include per-rep activity prescriptions in the output
    #[arg(long)]
    pub(crate) prescriptions: bool,
    /// Override the gap close rate used for catch-up targets
    #[arg(long)]
    pub(crate) gap_close_rate: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for month-end pacing (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Monthly unit quota applied to every rep in the demo
    #[arg(long, default_value_t = 12)]
    pub(crate) quota_units: u32,
}

pub(crate) fn run_leaderboard(args: LeaderboardArgs) -> Result<(), AppError> {
    let mut params = AnalyticsParams::default();
    if let Some(rate) = args.gap_close_rate {
        params.gap_close_rate = rate;
    }

    let reps = sample_showroom();
    let results = PerformanceAnalyzer::new(params).analyze(&reps);
    render_leaderboard(&results, args.prescriptions);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, quota_units } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let reps = sample_showroom();
    let results = PerformanceAnalyzer::default().analyze(&reps);
    render_leaderboard(&results, true);

    println!("\nMonth-end forecasts (as of {today}, quota {quota_units} units)");
    let store = Arc::new(InMemoryForecastStore::default());
    let service = ForecastService::new(store.clone());
    let month = month_start(today);

    for rep in &reps {
        store.record_activity(
            rep.rep_id.clone(),
            month,
            MonthToDateCounts {
                leads: rep.total_leads(),
                contacts: rep.contacts,
                appts_set: rep.appointments_set,
                appts_show: rep.appointments_show,
                sold_units: rep.units_sold,
            },
        );

        let input = RecomputeInput {
            rep_id: rep.rep_id.clone(),
            quota_units,
            month: Some(month),
        };
        let outcome = service.recompute(&input, today).and_then(|result| {
            store
                .forecast(&rep.rep_id, result.month)
                .map(|row| (result, row))
        });
        match outcome {
            Some((result, row)) => {
                println!(
                    "- {}: projected {:.1} units, quota-hit {:.0}%, next: {} (delta {})",
                    rep.rep_id,
                    result.projected_units,
                    result.quota_hit_probability * 100.0,
                    row.next_best_action.focus.label(),
                    row.next_best_action.target_delta
                );
                println!("    {}", row.next_best_action.message);
            }
            None => println!("- {}: forecast unavailable (store failure)", rep.rep_id),
        }
    }

    Ok(())
}

fn render_leaderboard(results: &BTreeMap<RepId, RepAnalysis>, prescriptions: bool) {
    println!("Showroom leaderboard");

    let mut ranked: Vec<&RepAnalysis> = results.values().collect();
    ranked.sort_by_key(|analysis| analysis.performance_metrics.rank);

    for analysis in &ranked {
        let metrics = &analysis.performance_metrics;
        println!(
            "{}. {} - {} units (expected {:.1}), balanced {:.2}, confidence {:.2}{}",
            metrics.rank,
            analysis.rep.rep_id,
            analysis.rep.units_sold,
            analysis.expected_units.final_expected,
            metrics.balanced_score,
            metrics.confidence_score,
            if analysis.is_top_performer {
                "  [top performer]"
            } else {
                ""
            }
        );
    }

    if let Some(leader) = ranked.first() {
        println!("\nStore baselines");
        println!(
            "- contact rate {:.2}, appointment rate {:.2}",
            leader.store_baselines.contact_rate, leader.store_baselines.appointment_set_rate
        );
        println!("\nSource weights (expected units per lead)");
        for (source, weight) in leader.source_weights.iter() {
            println!("- {source}: {weight:.3}");
        }
    }

    if !prescriptions {
        return;
    }

    println!("\nCatch-up prescriptions");
    for analysis in &ranked {
        let target = &analysis.catch_up_target;
        let recs = &analysis.activity_recommendations;
        if recs.is_on_track {
            println!("- {}: on track", analysis.rep.rep_id);
            continue;
        }

        println!(
            "- {}: {} -> {} units (close {} of the {}-unit gap)",
            analysis.rep.rep_id,
            target.current_units,
            target.target_units,
            target.delta_units,
            target.gap
        );
        for (source, leads) in &recs.additional_leads_needed {
            println!("    {} more {} leads", leads, source);
        }
        println!(
            "    contact rate {:.2} -> {:.2} (~{} more attempts)",
            analysis.core_rates.contact_rate,
            recs.required_contact_rate,
            recs.additional_attempts_needed
        );
    }
}

fn sample_showroom() -> Vec<RepPeriodStats> {
    vec![
        sample_rep(
            "alvarez",
            &[("internet", 40), ("phone", 12), ("walk_in", 8)],
            60,
            140,
            33,
            20,
            15,
            11,
        ),
        sample_rep(
            "brooks",
            &[("internet", 30), ("referral", 10), ("walk_in", 10)],
            50,
            90,
            21,
            12,
            8,
            6,
        ),
        sample_rep(
            "chen",
            &[("internet", 25), ("phone", 15), ("service", 10)],
            50,
            100,
            24,
            13,
            9,
            7,
        ),
        sample_rep(
            "davis",
            &[("internet", 10), ("walk_in", 20), ("service", 5)],
            35,
            40,
            10,
            5,
            3,
            2,
        ),
        sample_rep(
            "ellison",
            &[("internet", 20), ("referral", 6), ("phone", 9)],
            35,
            75,
            18,
            10,
            7,
            5,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample_rep(
    rep_id: &str,
    leads: &[(&str, u32)],
    unique_leads_attempted: u32,
    attempts: u32,
    contacts: u32,
    appointments_set: u32,
    appointments_show: u32,
    units_sold: u32,
) -> RepPeriodStats {
    let leads_by_source: BTreeMap<SourceId, u32> = leads
        .iter()
        .map(|(source, count)| (SourceId::from(*source), *count))
        .collect();

    RepPeriodStats {
        rep_id: RepId::from(rep_id),
        period: "current".to_string(),
        units_sold,
        leads_by_source,
        unique_leads_attempted,
        attempts,
        contacts,
        appointments_set,
        appointments_show,
        first_response_time_minutes: None,
        lead_age_days_at_first_contact: None,
        gross_profit: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_showroom_analyzes_cleanly() {
        let results = PerformanceAnalyzer::default().analyze(&sample_showroom());
        assert_eq!(results.len(), 5);
        let leader = &results[&RepId::from("alvarez")];
        assert!(leader.is_top_performer);
    }
}
