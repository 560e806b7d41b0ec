use super::domain::QuotaProbabilityInput;

/// Exact binomial-tail probability of hitting quota: remaining sales are
/// modeled as `Binomial(leads_remaining, close_probability)` and the tail
/// `P(successes >= remaining_to_quota)` is summed term by term.
///
/// Each pmf term is derived from its predecessor with the binomial
/// coefficient ratio, so no factorial is ever materialized and the running
/// magnitudes stay near the masses themselves.
pub fn compute_quota_probability(input: &QuotaProbabilityInput) -> f64 {
    let p = input.close_probability.clamp(0.0, 1.0);
    let remaining_to_quota = input.quota_units.saturating_sub(input.sold_units_so_far);

    if remaining_to_quota == 0 {
        return 1.0;
    }
    let trials = input.leads_remaining;
    if trials == 0 || remaining_to_quota > trials {
        return 0.0;
    }
    if p <= 0.0 {
        // Quota still open and nothing ever closes.
        return 0.0;
    }
    if p >= 1.0 {
        // Every remaining lead closes and trials >= remaining_to_quota.
        return 1.0;
    }

    let q = 1.0 - p;
    let first = remaining_to_quota;

    // pmf(first) = C(trials, first) p^first q^(trials-first), built as an
    // interleaved running product to keep intermediates in range.
    let mut term = q.powi((trials - first) as i32);
    for i in 1..=first {
        term *= (trials - first + i) as f64 / i as f64 * p;
    }

    let mut tail = term;
    for successes in (first + 1)..=trials {
        // pmf(k) / pmf(k-1) = ((trials - k + 1) / k) * (p / q)
        term *= (trials - successes + 1) as f64 / successes as f64 * (p / q);
        tail += term;
        if term == 0.0 {
            break;
        }
    }

    tail.clamp(0.0, 1.0)
}
