//! Fixed-point currency helpers.
//!
//! Every amount in a generated batch is a [`Decimal`] rounded to two places
//! with half-up (commercial) rounding.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::SynthError;

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents.
pub fn round2(value: Decimal) -> Decimal {
    round_half_up(value, 2)
}

/// Perturb `price` by a uniform factor in `[-pct, +pct]` and round to cents.
///
/// `draw` is a uniform sample from `[0, 1)`; it maps linearly onto the
/// `[-1, 1)` spread before scaling by `pct`.
pub(crate) fn perturb(price: Decimal, pct: Decimal, draw: f64) -> Result<Decimal, SynthError> {
    let spread = Decimal::from_f64(draw * 2.0 - 1.0)
        .ok_or_else(|| SynthError::Arithmetic(format!("cannot represent {draw} as decimal")))?;
    Ok(round2(price * (Decimal::ONE + spread * pct)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round2(dec!(2.345)), dec!(2.35));
        assert_eq!(round2(dec!(2.344)), dec!(2.34));
        assert_eq!(round2(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round2(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn round2_keeps_whole_amounts() {
        assert_eq!(round2(dec!(10)), dec!(10.00));
        assert_eq!(round2(dec!(10.10)).to_string(), "10.10");
    }

    #[test]
    fn perturb_maps_draw_onto_spread() {
        assert_eq!(perturb(dec!(100), dec!(0.10), 0.75).unwrap(), dec!(105.00));
        assert_eq!(perturb(dec!(100), dec!(0.10), 0.0).unwrap(), dec!(90.00));
        assert_eq!(perturb(dec!(19.99), dec!(0.10), 0.5).unwrap(), dec!(19.99));
    }

    #[test]
    fn perturb_with_zero_pct_is_identity() {
        assert_eq!(perturb(dec!(12.345), Decimal::ZERO, 0.9).unwrap(), dec!(12.35));
    }

    #[test]
    fn perturb_rejects_nan() {
        assert!(perturb(dec!(1), dec!(0.1), f64::NAN).is_err());
    }
}
