use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds on the exact binary value of `value`, half-to-even, so that
/// 68.175 (stored as 68.17499...) becomes 68.17.
pub(crate) fn round_dp(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn rounds_on_exact_binary_value() {
        let site = (145.0 / 200.0 * 0.5 + 85.0 / 150.0 * 0.5) * 100.0;
        let stored = 68.0 * 0.4 + 72.0 * 0.3 + site * 0.3;
        assert!(close(round_dp(stored, 2), 68.17));
        assert!(close((stored * 100.0).round() / 100.0, 68.18));
    }

    #[test]
    fn rounds_repeating_fractions() {
        assert!(close(round_dp(64.583_333_333_333_33, 2), 64.58));
        assert!(close(round_dp(38.666_666_666_666_664, 2), 38.67));
        assert!(close(round_dp(-4.96, 1), -5.0));
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert!(close(round_dp(0.125, 2), 0.12));
        assert!(close(round_dp(0.375, 2), 0.38));
    }

    #[test]
    fn passes_through_values_outside_decimal_range() {
        assert_eq!(round_dp(1e300, 2), 1e300);
    }
}
