//! Checklist indicators. Every function here is pure: it reads a slice of the
//! snapshot and returns an [`IndicatorResult`], falling back to
//! [`IndicatorResult::no_verdict`] whenever the input cannot support a verdict.
//!
//! [`IndicatorResult`]: crate::domain::indicator::IndicatorResult
//! [`IndicatorResult::no_verdict`]: crate::domain::indicator::IndicatorResult::no_verdict

pub mod earnings;
pub mod ownership;
pub mod price;
pub mod ratings;

/// Denominators smaller than this are not divided by.
pub const NEAR_ZERO: f64 = 0.01;

/// Growth reported for a step away from a near-zero base.
pub const SATURATED_GROWTH_PCT: f64 = 10_000.0;

/// Percentage growth from `previous` to `current`.
///
/// A near-zero `previous` saturates at ±[`SATURATED_GROWTH_PCT`], or yields 0
/// when both values are equal.
pub fn growth_pct(previous: f64, current: f64) -> f64 {
    if previous.abs() < NEAR_ZERO {
        if current == previous {
            0.0
        } else if current > previous {
            SATURATED_GROWTH_PCT
        } else {
            -SATURATED_GROWTH_PCT
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `1234567.4` -> `1,234,567`.
pub(crate) fn format_thousands(n: f64) -> String {
    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_pct_divides_regular_bases() {
        assert!((growth_pct(2.0, 3.0) - 50.0).abs() < 1e-9);
        assert!((growth_pct(-2.0, -1.0) - -50.0).abs() < 1e-9);
    }

    #[test]
    fn growth_pct_saturates_near_zero() {
        assert_eq!(growth_pct(0.0, 1.0), SATURATED_GROWTH_PCT);
        assert_eq!(growth_pct(0.005, -3.0), -SATURATED_GROWTH_PCT);
        assert_eq!(growth_pct(0.0, 0.0), 0.0);
        assert!(growth_pct(0.0, 5.0).is_finite());
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(format_thousands(400_000.0), "400,000");
        assert_eq!(format_thousands(1_234_567.4), "1,234,567");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(-12_500.0), "-12,500");
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    }
}
