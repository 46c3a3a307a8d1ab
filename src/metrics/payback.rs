//! Payback period

/// Fractional period at which the cumulative cashflow turns non-negative
///
/// Interpolates linearly inside the crossing period. Returns `Some(0.0)` when
/// period 0 is already non-negative and `None` when the cumulative never
/// recovers.
pub fn payback_period(cashflows: &[f64]) -> Option<f64> {
    let first = *cashflows.first()?;
    if first >= 0.0 {
        return Some(0.0);
    }

    let mut cumulative = first;
    for (period, &cf) in cashflows.iter().enumerate().skip(1) {
        let next = cumulative + cf;
        if next >= 0.0 {
            // cumulative < 0 <= next, so cf > 0
            return Some((period - 1) as f64 + (-cumulative) / cf);
        }
        cumulative = next;
    }

    None
}
