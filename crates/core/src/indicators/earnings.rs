use crate::domain::indicator::IndicatorResult;
use crate::domain::snapshot::EarningsPoint;
use crate::indicators::{growth_pct, mean};

pub const EPS_GROWTH_THRESHOLD_PCT: f64 = 25.0;
pub const ANNUAL_EPS_GROWTH_THRESHOLD_PCT: f64 = 25.0;
pub const SALES_GROWTH_THRESHOLD_PCT: f64 = 20.0;
pub const ROE_THRESHOLD_PCT: f64 = 17.0;

/// Average quarter-over-quarter EPS growth across the last four quarters.
///
/// Any missing or negative EPS among those four rejects the series.
pub fn recent_eps_growth(quarterly: &[EarningsPoint]) -> IndicatorResult {
    if quarterly.len() < 4 {
        return IndicatorResult::no_verdict();
    }

    let mut eps = Vec::with_capacity(4);
    for point in &quarterly[quarterly.len() - 4..] {
        match point.eps {
            Some(v) if v >= 0.0 => eps.push(v),
            _ => return IndicatorResult::no_verdict(),
        }
    }

    let rates: Vec<f64> = eps.windows(2).map(|w| growth_pct(w[0], w[1])).collect();
    let Some(average) = mean(&rates) else {
        return IndicatorResult::no_verdict();
    };

    IndicatorResult::percent(average, average >= EPS_GROWTH_THRESHOLD_PCT)
}

/// Average growth of per-share earnings over the last three quarters, derived
/// from net earnings and shares outstanding.
pub fn three_quarter_eps_growth(
    quarterly: &[EarningsPoint],
    shares_outstanding: Option<f64>,
) -> IndicatorResult {
    if quarterly.len() < 3 {
        return IndicatorResult::no_verdict();
    }
    let Some(shares) = shares_outstanding.filter(|s| *s > 0.0) else {
        return IndicatorResult::no_verdict();
    };

    let mut eps = Vec::with_capacity(3);
    for point in &quarterly[quarterly.len() - 3..] {
        let Some(earnings) = point.earnings else {
            return IndicatorResult::no_verdict();
        };
        eps.push(earnings / shares);
    }

    let rates: Vec<f64> = eps.windows(2).map(|w| growth_pct(w[0], w[1])).collect();
    let Some(average) = mean(&rates) else {
        return IndicatorResult::no_verdict();
    };

    IndicatorResult::percent(average, average >= EPS_GROWTH_THRESHOLD_PCT)
}

/// Compound annual EPS growth over the last four years, ignoring loss years.
pub fn average_annual_eps_growth(yearly: &[EarningsPoint]) -> IndicatorResult {
    if yearly.len() < 4 {
        return IndicatorResult::no_verdict();
    }

    let positive: Vec<f64> = yearly[yearly.len() - 4..]
        .iter()
        .filter_map(|p| p.eps)
        .filter(|eps| *eps > 0.0)
        .collect();

    let (Some(&initial), Some(&last)) = (positive.first(), positive.last()) else {
        return IndicatorResult::no_verdict();
    };
    if positive.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let years = (positive.len() - 1) as f64;
    let growth = ((last / initial).powf(1.0 / years) - 1.0) * 100.0;

    IndicatorResult::percent(growth, growth >= ANNUAL_EPS_GROWTH_THRESHOLD_PCT)
}

/// Revenue growth between the two most recent quarters.
pub fn sales_growth(quarterly: &[EarningsPoint]) -> IndicatorResult {
    if quarterly.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let previous = quarterly[quarterly.len() - 2].revenue;
    let recent = quarterly[quarterly.len() - 1].revenue;
    let (Some(previous), Some(recent)) = (previous, recent) else {
        return IndicatorResult::no_verdict();
    };
    if previous == 0.0 {
        return IndicatorResult::no_verdict();
    }

    let growth = (recent - previous) / previous * 100.0;
    IndicatorResult::percent(growth, growth >= SALES_GROWTH_THRESHOLD_PCT)
}

/// Whether each quarter's earnings growth beats the previous quarter's.
///
/// A zero base ends the walk as "not accelerating".
pub fn accelerating_earnings_growth(quarterly: &[EarningsPoint]) -> IndicatorResult {
    if quarterly.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let mut earnings = Vec::with_capacity(quarterly.len());
    for point in quarterly {
        let Some(v) = point.earnings else {
            return IndicatorResult::no_verdict();
        };
        earnings.push(v);
    }

    let mut accelerating = true;
    let mut previous_growth: Option<f64> = None;
    for w in earnings.windows(2) {
        if w[0] == 0.0 {
            accelerating = false;
            break;
        }
        let growth = growth_pct(w[0], w[1]);
        if previous_growth.is_some_and(|prev| growth <= prev) {
            accelerating = false;
            break;
        }
        previous_growth = Some(growth);
    }

    let label = if accelerating { "Yes" } else { "No" };
    IndicatorResult::verdict(label, accelerating).with_metric(if accelerating { 100.0 } else { 0.0 })
}

/// Return on equity, given as a fraction.
pub fn return_on_equity(roe: Option<f64>) -> IndicatorResult {
    match roe {
        Some(roe) => {
            let pct = roe * 100.0;
            IndicatorResult::percent(pct, pct >= ROE_THRESHOLD_PCT)
        }
        None => IndicatorResult::no_verdict(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps_quarters(values: &[Option<f64>]) -> Vec<EarningsPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, eps)| EarningsPoint {
                period: format!("Q{i}"),
                eps: *eps,
                ..Default::default()
            })
            .collect()
    }

    fn earnings_quarters(values: &[f64]) -> Vec<EarningsPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| EarningsPoint {
                period: format!("Q{i}"),
                earnings: Some(*v),
                ..Default::default()
            })
            .collect()
    }

    fn revenue_quarters(values: &[Option<f64>]) -> Vec<EarningsPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| EarningsPoint {
                period: format!("Q{i}"),
                revenue: *v,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn recent_eps_growth_averages_three_transitions() {
        let q = eps_quarters(&[Some(1.00), Some(1.10), Some(1.21), Some(1.3310)]);
        let r = recent_eps_growth(&q);
        assert_eq!(r.value(), Some("10.00%"));
        assert_eq!(r.passed(), Some(false));
        assert!((r.metric().unwrap() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn recent_eps_growth_uses_only_last_four_quarters() {
        let q = eps_quarters(&[Some(-5.0), Some(1.0), Some(1.5), Some(2.25), Some(3.375)]);
        let r = recent_eps_growth(&q);
        assert_eq!(r.value(), Some("50.00%"));
        assert_eq!(r.passed(), Some(true));
    }

    #[test]
    fn recent_eps_growth_rejects_short_missing_or_negative() {
        assert!(recent_eps_growth(&eps_quarters(&[Some(1.0), Some(2.0), Some(3.0)])).is_no_verdict());
        assert!(recent_eps_growth(&eps_quarters(&[Some(1.0), None, Some(2.0), Some(3.0)])).is_no_verdict());
        let r = recent_eps_growth(&eps_quarters(&[Some(1.0), Some(-0.2), Some(2.0), Some(3.0)]));
        assert!(r.is_no_verdict());
        assert_eq!(r.passed(), None);
    }

    #[test]
    fn recent_eps_growth_saturates_on_zero_base() {
        let r = recent_eps_growth(&eps_quarters(&[Some(0.0), Some(0.0), Some(0.0), Some(1.0)]));
        assert_eq!(r.value(), Some("3333.33%"));
        assert!(r.metric().unwrap().is_finite());
    }

    #[test]
    fn three_quarter_eps_growth_divides_by_shares() {
        let q = earnings_quarters(&[50.0, 100.0, 150.0, 300.0]);
        let r = three_quarter_eps_growth(&q, Some(100.0));
        // 1.0 -> 1.5 -> 3.0: 50% and 100%.
        assert_eq!(r.value(), Some("75.00%"));
        assert_eq!(r.passed(), Some(true));
    }

    #[test]
    fn three_quarter_eps_growth_requires_shares_and_earnings() {
        let q = earnings_quarters(&[1.0, 2.0, 3.0]);
        assert!(three_quarter_eps_growth(&q, None).is_no_verdict());
        assert!(three_quarter_eps_growth(&q, Some(0.0)).is_no_verdict());
        assert!(three_quarter_eps_growth(&q[..2], Some(1.0)).is_no_verdict());

        let mut gap = earnings_quarters(&[1.0, 2.0, 3.0]);
        gap[1].earnings = None;
        assert!(three_quarter_eps_growth(&gap, Some(1.0)).is_no_verdict());
    }

    #[test]
    fn three_quarter_eps_growth_handles_near_zero_eps() {
        // Per-share values 0.0, 0.0, 2.0.
        let q = earnings_quarters(&[0.0, 0.0, 200.0]);
        let r = three_quarter_eps_growth(&q, Some(100.0));
        assert_eq!(r.value(), Some("5000.00%"));
    }

    #[test]
    fn annual_eps_growth_compounds() {
        let yearly = eps_quarters(&[Some(1.0), Some(2.0), Some(4.0), Some(8.0)]);
        let r = average_annual_eps_growth(&yearly);
        assert_eq!(r.value(), Some("100.00%"));
        assert_eq!(r.passed(), Some(true));
    }

    #[test]
    fn annual_eps_growth_skips_loss_years() {
        let yearly = eps_quarters(&[Some(-1.0), Some(1.0), None, Some(1.21)]);
        let r = average_annual_eps_growth(&yearly);
        assert_eq!(r.value(), Some("21.00%"));
        assert_eq!(r.passed(), Some(false));

        let yearly = eps_quarters(&[Some(-1.0), Some(-2.0), Some(0.0), Some(1.0)]);
        assert!(average_annual_eps_growth(&yearly).is_no_verdict());
        assert!(average_annual_eps_growth(&yearly[..3]).is_no_verdict());
    }

    #[test]
    fn sales_growth_compares_last_two_quarters() {
        let r = sales_growth(&revenue_quarters(&[Some(10.0), Some(100.0), Some(125.0)]));
        assert_eq!(r.value(), Some("25.00%"));
        assert_eq!(r.passed(), Some(true));

        let r = sales_growth(&revenue_quarters(&[Some(100.0), Some(110.0)]));
        assert_eq!(r.passed(), Some(false));
    }

    #[test]
    fn sales_growth_rejects_zero_base() {
        assert!(sales_growth(&revenue_quarters(&[Some(0.0), Some(10.0)])).is_no_verdict());
        assert!(sales_growth(&revenue_quarters(&[Some(10.0)])).is_no_verdict());
        assert!(sales_growth(&revenue_quarters(&[None, Some(10.0)])).is_no_verdict());
    }

    #[test]
    fn accelerating_growth_requires_strict_increase() {
        let r = accelerating_earnings_growth(&earnings_quarters(&[100.0, 110.0, 125.0, 150.0]));
        assert_eq!(r.value(), Some("Yes"));
        assert_eq!(r.passed(), Some(true));

        let r = accelerating_earnings_growth(&earnings_quarters(&[100.0, 120.0, 130.0]));
        assert_eq!(r.value(), Some("No"));
        assert_eq!(r.passed(), Some(false));

        // Equal growth is not acceleration.
        let r = accelerating_earnings_growth(&earnings_quarters(&[100.0, 110.0, 121.0]));
        assert_eq!(r.passed(), Some(false));
    }

    #[test]
    fn accelerating_growth_stops_on_zero_base() {
        let r = accelerating_earnings_growth(&earnings_quarters(&[0.0, 10.0, 30.0]));
        assert_eq!(r.value(), Some("No"));
        assert!(accelerating_earnings_growth(&earnings_quarters(&[5.0])).is_no_verdict());
    }

    #[test]
    fn roe_is_reported_as_percentage() {
        let r = return_on_equity(Some(0.1712));
        assert_eq!(r.value(), Some("17.12%"));
        assert_eq!(r.passed(), Some(true));
        assert_eq!(return_on_equity(Some(0.0)).passed(), Some(false));
        assert!(return_on_equity(None).is_no_verdict());
    }
}
