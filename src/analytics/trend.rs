//! Month-over-month comparison

use crate::models::Money;

/// Signed percent change from `prior` to `current`, rounded to a whole number
///
/// When `prior` is zero or negative there is no meaningful base and the
/// delta is reported as `0`. Callers should not present that as a real
/// "no change"; `MonthlyAggregate::comparison_delta` is `None` when the prior
/// month had no data at all.
pub fn month_over_month(current: Money, prior: Money) -> i64 {
    if !prior.is_positive() {
        return 0;
    }

    let delta = (current.as_f64() - prior.as_f64()) / prior.as_f64() * 100.0;
    delta.round() as i64
}
