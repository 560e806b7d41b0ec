use std::collections::BTreeMap;

use salesfloor::analytics::{
    AnalyticsParams, PerformanceAnalyzer, PopulationModel, RepId, RepPeriodStats, SourceId,
};

#[allow(clippy::too_many_arguments)]
fn rep(
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
        period: "2026-07".to_string(),
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

fn showroom() -> Vec<RepPeriodStats> {
    vec![
        rep(
            "alvarez",
            &[("internet", 40), ("phone", 12), ("walk_in", 8)],
            60,
            140,
            33,
            20,
            15,
            11,
        ),
        rep(
            "brooks",
            &[("internet", 30), ("referral", 10), ("walk_in", 10)],
            50,
            90,
            21,
            12,
            8,
            6,
        ),
        rep(
            "chen",
            &[("internet", 25), ("phone", 15), ("service", 10)],
            50,
            100,
            24,
            13,
            9,
            7,
        ),
        rep(
            "davis",
            &[("internet", 10), ("walk_in", 20), ("service", 5)],
            35,
            40,
            10,
            5,
            3,
            2,
        ),
    ]
}

#[test]
fn empty_population_yields_empty_results() {
    let analyzer = PerformanceAnalyzer::default();
    let results = analyzer.analyze(&[]);
    assert!(results.is_empty());
}

#[test]
fn every_rep_appears_exactly_once() {
    let analyzer = PerformanceAnalyzer::default();
    let results = analyzer.analyze(&showroom());
    assert_eq!(results.len(), 4);
    for id in ["alvarez", "brooks", "chen", "davis"] {
        assert!(results.contains_key(&RepId::from(id)), "{id} missing");
    }
}

#[test]
fn top_performer_has_unit_index_and_rank_one() {
    let analyzer = PerformanceAnalyzer::default();
    let results = analyzer.analyze(&showroom());

    let leader = &results[&RepId::from("alvarez")];
    assert!(leader.is_top_performer);
    assert_eq!(leader.performance_metrics.rank, 1);
    assert_eq!(leader.performance_metrics.performance_index, 1.0);
    assert!(leader.activity_recommendations.is_on_track);
    assert_eq!(leader.catch_up_target.delta_units, 0);

    let trailing = &results[&RepId::from("davis")];
    assert!(!trailing.is_top_performer);
    assert_eq!(trailing.performance_metrics.rank, 4);
    assert!(trailing.performance_metrics.performance_index < 1.0);
}

#[test]
fn equal_sellers_rank_by_rep_id() {
    let reps = vec![
        rep("zimmer", &[("internet", 20)], 20, 40, 10, 6, 4, 5),
        rep("abbott", &[("internet", 20)], 20, 40, 10, 6, 4, 5),
    ];
    let results = PerformanceAnalyzer::default().analyze(&reps);

    assert_eq!(results[&RepId::from("abbott")].performance_metrics.rank, 1);
    assert_eq!(results[&RepId::from("zimmer")].performance_metrics.rank, 2);
    assert!(results[&RepId::from("abbott")].is_top_performer);
    assert!(!results[&RepId::from("zimmer")].is_top_performer);
}

#[test]
fn base_expected_equals_lead_mix_dot_weights() {
    let reps = showroom();
    let analyzer = PerformanceAnalyzer::default();
    let results = analyzer.analyze(&reps);

    for stats in &reps {
        let analysis = &results[&stats.rep_id];
        let dot: f64 = stats
            .leads_by_source
            .iter()
            .map(|(source, &leads)| {
                leads as f64 * analysis.source_weights.get(source).unwrap_or(0.0)
            })
            .sum();
        assert!(
            (analysis.expected_units.base_expected - dot).abs() < 1e-9,
            "{} base_expected drifted from its dot product",
            stats.rep_id
        );
    }
}

#[test]
fn gap_and_target_invariants_hold_for_every_rep() {
    let results = PerformanceAnalyzer::default().analyze(&showroom());

    for analysis in results.values() {
        let target = &analysis.catch_up_target;
        assert!(target.top_performer_units >= target.current_units + target.gap);
        assert_eq!(
            target.delta_units,
            target.target_units - target.current_units
        );
        if target.gap > 0 {
            assert!(target.target_units >= target.current_units + 1);
        } else {
            assert_eq!(target.target_units, target.current_units);
        }
    }
}

#[test]
fn weights_respect_bounds_for_every_source() {
    let params = AnalyticsParams::default();
    let results = PerformanceAnalyzer::new(params.clone()).analyze(&showroom());
    let any = results.values().next().expect("population is non-empty");

    assert!(!any.source_weights.is_empty());
    for (_, weight) in any.source_weights.iter() {
        assert!((0.0..=params.max_source_weight).contains(&weight));
    }
}

#[test]
fn trailing_reps_receive_concrete_prescriptions() {
    let results = PerformanceAnalyzer::default().analyze(&showroom());
    let trailing = &results[&RepId::from("davis")];
    let recs = &trailing.activity_recommendations;

    assert!(!recs.is_on_track);
    assert!(!recs.additional_leads_needed.is_empty());
    assert!(recs.additional_leads_needed.len() <= 3);
    for &leads in recs.additional_leads_needed.values() {
        assert!(leads >= 1, "a lead ask of zero is no ask at all");
    }
    assert!(recs.required_contact_rate <= 0.85 + 1e-12);
}

#[test]
fn analyze_rep_against_shared_model_matches_batch_analysis() {
    let reps = showroom();
    let params = AnalyticsParams::default();
    let analyzer = PerformanceAnalyzer::new(params.clone());

    let batch = analyzer.analyze(&reps);
    let model = PopulationModel::fit(&reps, &params);
    for stats in &reps {
        let single = analyzer.analyze_rep(&model, stats);
        assert_eq!(single, batch[&stats.rep_id]);
    }
}

#[test]
fn results_are_reproducible_across_runs() {
    let analyzer = PerformanceAnalyzer::default();
    let first = analyzer.analyze(&showroom());
    let second = analyzer.analyze(&showroom());
    assert_eq!(first, second);
}
