//! Derived body metrics.

use rust_decimal::{Decimal, RoundingStrategy};

const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Trimmed and upper-cased; blank means no gender.
pub fn normalize_gender(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// weight / height_m², with height_m at 4 decimals and the result at 2.
/// `None` also when the arithmetic overflows.
pub fn bmi(weight_kg: Option<Decimal>, height_cm: Option<Decimal>) -> Option<Decimal> {
    let (weight, height) = (weight_kg?, height_cm?);
    if height <= Decimal::ZERO {
        return None;
    }
    let meters = (height / Decimal::ONE_HUNDRED).round_dp_with_strategy(4, HALF_UP);
    let squared = meters.checked_mul(meters)?;
    if squared.is_zero() {
        return None;
    }
    let raw = weight.checked_div(squared)?;
    Some(raw.round_dp_with_strategy(4, HALF_UP).round_dp_with_strategy(2, HALF_UP))
}

/// Mifflin-St Jeor: 10w + 6.25h - 5age, +5 for men and -161 for women.
pub fn bmr(
    weight_kg: Option<Decimal>,
    height_cm: Option<Decimal>,
    age: Option<i32>,
    gender: Option<&str>,
) -> Option<Decimal> {
    let (weight, height, age, gender) = (weight_kg?, height_cm?, age?, gender?);
    let base = Decimal::TEN
        .checked_mul(weight)?
        .checked_add(Decimal::new(625, 2).checked_mul(height)?)?
        .checked_sub(Decimal::from(5 * i64::from(age)))?;
    let adjustment = match gender {
        "MALE" | "M" => Decimal::from(5),
        "FEMALE" | "F" => Decimal::from(-161),
        _ => Decimal::ZERO,
    };
    Some(base.checked_add(adjustment)?.round_dp_with_strategy(2, HALF_UP))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn gender_is_normalized() {
        assert_eq!(normalize_gender(Some("  female ")), Some("FEMALE".into()));
        assert_eq!(normalize_gender(Some("   ")), None);
        assert_eq!(normalize_gender(None), None);
    }

    #[test]
    fn bmi_rounds_half_up_to_two_places() {
        // 70 / 1.75² = 22.857...
        assert_eq!(bmi(Some(dec("70")), Some(dec("175"))), Some(dec("22.86")));
        // 24.554753... -> 24.5548 -> 24.55
        assert_eq!(bmi(Some(dec("80")), Some(dec("180.5"))), Some(dec("24.55")));
    }

    #[test]
    fn bmi_needs_positive_height() {
        assert_eq!(bmi(Some(dec("70")), Some(Decimal::ZERO)), None);
        assert_eq!(bmi(Some(dec("70")), Some(dec("-170"))), None);
        assert_eq!(bmi(None, Some(dec("170"))), None);
    }

    #[test]
    fn oversized_inputs_yield_nothing_instead_of_overflowing() {
        let huge = dec("100000000000000000000");
        assert_eq!(bmi(Some(dec("70")), Some(huge)), None);
        assert_eq!(bmi(Some(Decimal::MAX), Some(dec("0.01"))), None);
        assert_eq!(bmr(Some(Decimal::MAX), Some(dec("175")), Some(30), Some("MALE")), None);
        assert_eq!(bmr(Some(dec("70")), Some(Decimal::MAX), Some(30), Some("FEMALE")), None);
    }

    #[test]
    fn bmr_applies_gender_adjustment() {
        let (w, h) = (Some(dec("70")), Some(dec("175")));
        // 700 + 1093.75 - 150
        assert_eq!(bmr(w, h, Some(30), Some("MALE")), Some(dec("1648.75")));
        assert_eq!(bmr(w, h, Some(30), Some("M")), Some(dec("1648.75")));
        assert_eq!(bmr(w, h, Some(30), Some("FEMALE")), Some(dec("1482.75")));
        assert_eq!(bmr(w, h, Some(30), Some("NON_BINARY")), Some(dec("1643.75")));
    }

    #[test]
    fn bmr_needs_every_input() {
        let (w, h) = (Some(dec("70")), Some(dec("175")));
        assert_eq!(bmr(w, h, None, Some("MALE")), None);
        assert_eq!(bmr(w, h, Some(30), None), None);
        assert_eq!(bmr(None, h, Some(30), Some("F")), None);
    }
}
