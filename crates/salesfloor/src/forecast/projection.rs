use super::domain::ProjectionInput;

/// Straight-line month-end extrapolation: lead flow so far continues at the
/// same daily rate, and remaining leads convert at the (clamped) close rate.
pub fn compute_projected_units(input: &ProjectionInput) -> f64 {
    let days_in_month = input.days_in_month.max(1);
    let days_elapsed = input.day_of_month.clamp(1, days_in_month);
    let days_remaining = days_in_month - days_elapsed;

    let leads_per_day = input.leads_so_far as f64 / days_elapsed as f64;
    let projected_remaining_leads = leads_per_day * days_remaining as f64;
    let expected_future_deals = projected_remaining_leads * input.close_rate.clamp(0.0, 1.0);

    input.sold_units_so_far as f64 + expected_future_deals
}
