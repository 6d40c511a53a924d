use crate::domain::indicator::IndicatorResult;
use crate::domain::snapshot::{MarketSummary, PriceBar};
use crate::indicators::format_thousands;
use chrono::NaiveDate;
use std::collections::HashMap;

pub const DEFAULT_MIN_SHARE_PRICE: f64 = 15.0;
pub const DEFAULT_MIN_AVERAGE_VOLUME: f64 = 400_000.0;

/// Stocks further than this below their 52-week high fail.
pub const MAX_PERCENT_OFF_HIGH: f64 = 15.0;

/// Volume must reach this multiple of the average to count as heavy.
pub const BREAKOUT_VOLUME_RATIO: f64 = 1.4;
pub const VOLUME_ABOVE_AVERAGE_THRESHOLD_PCT: f64 = 40.0;

pub const BUY_POINT_MIN_BARS: usize = 10;
pub const BUY_POINT_TOLERANCE: f64 = 0.05;
/// Cash margin added above the pivot high.
pub const BUY_POINT_MARGIN: f64 = 0.10;

/// Benchmark bars averaged for the market trend. With monthly bars this spans
/// roughly 200 trading days.
pub const MARKET_TREND_PERIOD: usize = 10;

fn yes_no(flag: bool) -> IndicatorResult {
    IndicatorResult::verdict(if flag { "Yes" } else { "No" }, flag)
        .with_metric(if flag { 100.0 } else { 0.0 })
}

pub fn current_share_price(summary: Option<&MarketSummary>, min_price: f64) -> IndicatorResult {
    match summary.and_then(|s| s.price) {
        Some(price) => {
            IndicatorResult::verdict(format!("${price:.2}"), price >= min_price).with_metric(price)
        }
        None => IndicatorResult::no_verdict(),
    }
}

pub fn average_daily_volume(summary: Option<&MarketSummary>, min_volume: f64) -> IndicatorResult {
    match summary.and_then(|s| s.average_volume) {
        Some(avg) => IndicatorResult::verdict(
            format!("{} shares", format_thousands(avg)),
            avg >= min_volume,
        )
        .with_metric(avg),
        None => IndicatorResult::no_verdict(),
    }
}

/// How far the current price sits below the 52-week high, in percent.
pub fn percent_off_high(summary: Option<&MarketSummary>) -> IndicatorResult {
    let Some(summary) = summary else {
        return IndicatorResult::no_verdict();
    };
    let (Some(price), Some(high)) = (summary.price, summary.fifty_two_week_high) else {
        return IndicatorResult::no_verdict();
    };
    if high <= 0.0 {
        return IndicatorResult::no_verdict();
    }

    let off = (1.0 - price / high) * 100.0;
    IndicatorResult::percent(off, off <= MAX_PERCENT_OFF_HIGH)
}

pub(crate) fn simple_moving_average(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let sum: f64 = values.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Direction of the benchmark: last close against its moving average.
pub fn market_trend(benchmark: &[PriceBar]) -> IndicatorResult {
    let closes: Vec<f64> = benchmark.iter().map(|b| b.close).collect();
    let (Some(sma), Some(&last)) = (simple_moving_average(&closes, MARKET_TREND_PERIOD), closes.last())
    else {
        return IndicatorResult::no_verdict();
    };

    let up = last > sma;
    let label = if up { "Uptrend" } else { "Downtrend" };
    let distance = if sma != 0.0 { (last / sma - 1.0) * 100.0 } else { 0.0 };
    IndicatorResult::verdict(label, up).with_metric(distance)
}

/// Price closing up on heavy volume.
pub fn breakout(prices: &[PriceBar], summary: Option<&MarketSummary>) -> IndicatorResult {
    if prices.len() < 2 {
        return IndicatorResult::no_verdict();
    }
    let Some(average_volume) = summary.and_then(|s| s.average_volume) else {
        return IndicatorResult::no_verdict();
    };

    let recent = &prices[prices.len() - 1];
    let previous = &prices[prices.len() - 2];
    let price_up = recent.close > previous.close;
    let heavy_volume = recent.volume >= average_volume * BREAKOUT_VOLUME_RATIO;

    let detected = price_up && heavy_volume;
    let label = if detected { "Breakout detected" } else { "No breakout" };
    IndicatorResult::verdict(label, detected).with_metric(if detected { 100.0 } else { 0.0 })
}

/// Current session volume against the average, in percent above it.
pub fn volume_above_average(summary: Option<&MarketSummary>) -> IndicatorResult {
    let Some(summary) = summary else {
        return IndicatorResult::no_verdict();
    };
    let (Some(volume), Some(average)) = (summary.volume, summary.average_volume) else {
        return IndicatorResult::no_verdict();
    };
    if average <= 0.0 {
        return IndicatorResult::no_verdict();
    }

    let above = (volume - average) / average * 100.0;
    IndicatorResult::percent(above, above >= VOLUME_ABOVE_AVERAGE_THRESHOLD_PCT)
}

/// Ratio of stock to benchmark closes on shared dates, scaled by 100.
pub fn relative_strength_line(stock: &[PriceBar], benchmark: &[PriceBar]) -> Vec<f64> {
    let benchmark_closes: HashMap<NaiveDate, f64> =
        benchmark.iter().map(|b| (b.date, b.close)).collect();

    stock
        .iter()
        .filter_map(|bar| {
            let bench = *benchmark_closes.get(&bar.date)?;
            (bench != 0.0).then(|| bar.close / bench * 100.0)
        })
        .collect()
}

/// Whether the relative strength line is at its highest point.
pub fn rs_line_new_high(stock: &[PriceBar], benchmark: &[PriceBar]) -> IndicatorResult {
    if stock.len() < 2 || benchmark.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let line = relative_strength_line(stock, benchmark);
    let Some(&current) = line.last() else {
        return IndicatorResult::no_verdict();
    };
    if line.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let high = line.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    yes_no(current >= high)
}

/// Highest plausible intraday high plus the cash margin. Highs at or above
/// twice the first bar's high are treated as bad ticks.
pub fn ideal_buy_point(prices: &[PriceBar]) -> Option<f64> {
    let first_high = prices.first()?.high;
    prices
        .iter()
        .map(|b| b.high)
        .filter(|h| *h > 0.0 && *h < 2.0 * first_high)
        .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |a| a.max(h))))
        .map(|pivot| pivot + BUY_POINT_MARGIN)
}

/// Whether the current price is within ±5% of the ideal buy point.
pub fn within_buy_point(current_price: Option<f64>, prices: &[PriceBar]) -> IndicatorResult {
    let Some(price) = current_price.filter(|p| *p > 0.0) else {
        return IndicatorResult::no_verdict();
    };
    if prices.len() < BUY_POINT_MIN_BARS {
        return IndicatorResult::no_verdict();
    }
    let Some(ideal) = ideal_buy_point(prices) else {
        return IndicatorResult::no_verdict();
    };

    let lower = ideal * (1.0 - BUY_POINT_TOLERANCE);
    let upper = ideal * (1.0 + BUY_POINT_TOLERANCE);
    yes_no((lower..=upper).contains(&price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(i: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i)
    }

    fn bar(i: u64, close: f64, volume: f64) -> PriceBar {
        PriceBar {
            date: day(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    fn summary(price: Option<f64>, average: Option<f64>, volume: Option<f64>, high: Option<f64>) -> MarketSummary {
        MarketSummary {
            price,
            average_volume: average,
            volume,
            fifty_two_week_high: high,
        }
    }

    #[test]
    fn share_price_and_volume_thresholds() {
        let s = summary(Some(15.0), Some(1_250_000.0), None, None);
        let r = current_share_price(Some(&s), DEFAULT_MIN_SHARE_PRICE);
        assert_eq!(r.value(), Some("$15.00"));
        assert_eq!(r.passed(), Some(true));

        let r = average_daily_volume(Some(&s), DEFAULT_MIN_AVERAGE_VOLUME);
        assert_eq!(r.value(), Some("1,250,000 shares"));
        assert_eq!(r.passed(), Some(true));

        let thin = summary(Some(9.5), Some(399_999.0), None, None);
        assert_eq!(current_share_price(Some(&thin), 15.0).passed(), Some(false));
        assert_eq!(average_daily_volume(Some(&thin), 400_000.0).passed(), Some(false));
        assert!(current_share_price(None, 15.0).is_no_verdict());
    }

    #[test]
    fn percent_off_high_against_52_week_high() {
        let r = percent_off_high(Some(&summary(Some(90.0), None, None, Some(100.0))));
        assert_eq!(r.value(), Some("10.00%"));
        assert_eq!(r.passed(), Some(true));

        let r = percent_off_high(Some(&summary(Some(50.0), None, None, Some(100.0))));
        assert_eq!(r.passed(), Some(false));

        assert!(percent_off_high(Some(&summary(Some(50.0), None, None, Some(0.0)))).is_no_verdict());
        assert!(percent_off_high(Some(&summary(Some(50.0), None, None, None))).is_no_verdict());
    }

    #[test]
    fn market_trend_compares_to_moving_average() {
        let rising: Vec<PriceBar> = (0..12).map(|i| bar(i, 100.0 + i as f64, 1.0)).collect();
        let r = market_trend(&rising);
        assert_eq!(r.value(), Some("Uptrend"));
        assert_eq!(r.passed(), Some(true));

        let falling: Vec<PriceBar> = (0..12).map(|i| bar(i, 100.0 - i as f64, 1.0)).collect();
        assert_eq!(market_trend(&falling).value(), Some("Downtrend"));

        assert!(market_trend(&rising[..9]).is_no_verdict());
    }

    #[test]
    fn breakout_needs_price_up_and_heavy_volume() {
        let s = summary(None, Some(1_000.0), None, None);

        let r = breakout(&[bar(0, 10.0, 500.0), bar(1, 11.0, 1_500.0)], Some(&s));
        assert_eq!(r.value(), Some("Breakout detected"));
        assert_eq!(r.passed(), Some(true));

        let r = breakout(&[bar(0, 10.0, 500.0), bar(1, 11.0, 1_300.0)], Some(&s));
        assert_eq!(r.value(), Some("No breakout"));

        let r = breakout(&[bar(0, 10.0, 500.0), bar(1, 9.0, 5_000.0)], Some(&s));
        assert_eq!(r.passed(), Some(false));

        assert!(breakout(&[bar(0, 10.0, 500.0)], Some(&s)).is_no_verdict());
        assert!(breakout(&[bar(0, 10.0, 500.0), bar(1, 11.0, 5_000.0)], None).is_no_verdict());
    }

    #[test]
    fn volume_above_average_in_percent() {
        let r = volume_above_average(Some(&summary(None, Some(1_000.0), Some(1_500.0), None)));
        assert_eq!(r.value(), Some("50.00%"));
        assert_eq!(r.passed(), Some(true));

        let r = volume_above_average(Some(&summary(None, Some(1_000.0), Some(1_200.0), None)));
        assert_eq!(r.passed(), Some(false));

        assert!(volume_above_average(Some(&summary(None, Some(0.0), Some(1.0), None))).is_no_verdict());
        assert!(volume_above_average(None).is_no_verdict());
    }

    #[test]
    fn rs_line_joins_on_dates() {
        let stock = vec![bar(0, 10.0, 1.0), bar(1, 12.0, 1.0), bar(2, 15.0, 1.0), bar(5, 99.0, 1.0)];
        let bench = vec![bar(0, 100.0, 1.0), bar(1, 100.0, 1.0), bar(2, 100.0, 1.0), bar(3, 100.0, 1.0)];
        let line = relative_strength_line(&stock, &bench);
        assert_eq!(line.len(), 3);
        for (got, want) in line.iter().zip([10.0, 12.0, 15.0]) {
            assert!((got - want).abs() < 1e-9);
        }

        let r = rs_line_new_high(&stock, &bench);
        assert_eq!(r.value(), Some("Yes"));
        assert_eq!(r.passed(), Some(true));
    }

    #[test]
    fn rs_line_below_peak_is_not_new_high() {
        let stock = vec![bar(0, 10.0, 1.0), bar(1, 20.0, 1.0), bar(2, 15.0, 1.0)];
        let bench = vec![bar(0, 100.0, 1.0), bar(1, 100.0, 1.0), bar(2, 100.0, 1.0)];
        assert_eq!(rs_line_new_high(&stock, &bench).value(), Some("No"));
    }

    #[test]
    fn rs_line_skips_zero_benchmark_and_needs_overlap() {
        let stock = vec![bar(0, 10.0, 1.0), bar(1, 12.0, 1.0)];
        let bench = vec![bar(0, 0.0, 1.0), bar(1, 100.0, 1.0)];
        assert!(rs_line_new_high(&stock, &bench).is_no_verdict());

        let disjoint = vec![bar(7, 100.0, 1.0), bar(8, 100.0, 1.0)];
        assert!(rs_line_new_high(&stock, &disjoint).is_no_verdict());
        assert!(rs_line_new_high(&stock, &[]).is_no_verdict());
    }

    #[test]
    fn buy_point_uses_filtered_high_plus_margin() {
        let mut prices: Vec<PriceBar> = (0..10).map(|i| bar(i, 50.0, 1.0)).collect();
        // Pivot at 59 high; a 500 spike is discarded as a bad tick.
        prices[4].high = 59.0;
        prices[6].high = 500.0;
        let ideal = ideal_buy_point(&prices).unwrap();
        assert!((ideal - 59.10).abs() < 1e-9);

        let r = within_buy_point(Some(60.0), &prices);
        assert_eq!(r.value(), Some("Yes"));
        assert_eq!(r.passed(), Some(true));

        let r = within_buy_point(Some(50.0), &prices);
        assert_eq!(r.value(), Some("No"));
    }

    #[test]
    fn buy_point_needs_price_and_ten_bars() {
        let prices: Vec<PriceBar> = (0..9).map(|i| bar(i, 50.0, 1.0)).collect();
        assert!(within_buy_point(Some(51.0), &prices).is_no_verdict());
        let prices: Vec<PriceBar> = (0..10).map(|i| bar(i, 50.0, 1.0)).collect();
        assert!(within_buy_point(None, &prices).is_no_verdict());
        assert!(within_buy_point(Some(0.0), &prices).is_no_verdict());
    }
}
