use crate::domain::indicator::{Grade, IndicatorResult};
use crate::domain::snapshot::{Fundamentals, PriceBar};
use crate::indicators::mean;

pub const RSI_PERIOD: usize = 14;
pub const RS_RATING_THRESHOLD: f64 = 80.0;

/// Bars considered by the accumulation/distribution rating.
pub const AD_LOOKBACK_BARS: usize = 100;

// Breakpoints are exclusive lower bounds for A, B, C, D; anything else is E.
const SALES_GROWTH_BREAKPOINTS: [f64; 4] = [0.25, 0.15, 0.05, 0.0];
const MARGIN_BREAKPOINTS: [f64; 4] = [0.20, 0.15, 0.10, 0.05];
const ROE_BREAKPOINTS: [f64; 4] = [0.20, 0.15, 0.10, 0.05];

fn bucket(value: f64, breakpoints: [f64; 4]) -> Grade {
    const GRADES: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];
    for (grade, floor) in GRADES.into_iter().zip(breakpoints) {
        if value > floor {
            return grade;
        }
    }
    Grade::E
}

/// Sales, margin and ROE letter grades plus the overall (worst) grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmrGrades {
    pub sales: Grade,
    pub margin: Grade,
    pub roe: Grade,
}

impl SmrGrades {
    pub fn from_ratios(revenue_growth: f64, gross_margin: f64, roe: f64) -> Self {
        Self {
            sales: bucket(revenue_growth, SALES_GROWTH_BREAKPOINTS),
            margin: bucket(gross_margin, MARGIN_BREAKPOINTS),
            roe: bucket(roe, ROE_BREAKPOINTS),
        }
    }

    pub fn overall(&self) -> Grade {
        self.sales.max(self.margin).max(self.roe)
    }
}

/// SMR (sales, margins, return on equity) rating. Passes at A or B.
pub fn smr_rating(fundamentals: Option<&Fundamentals>) -> IndicatorResult {
    let Some(f) = fundamentals else {
        return IndicatorResult::no_verdict();
    };
    let (Some(sales), Some(margin), Some(roe)) = (f.revenue_growth, f.gross_margin, f.return_on_equity)
    else {
        return IndicatorResult::no_verdict();
    };

    let grade = SmrGrades::from_ratios(sales, margin, roe).overall();
    IndicatorResult::verdict(grade.as_str(), matches!(grade, Grade::A | Grade::B))
        .with_metric(grade.score())
}

/// Wilder's RSI over `closes`. Needs `period + 1` closes.
///
/// The first `period` deltas seed the average gain and loss; later deltas are
/// smoothed in with weight `1 / period`. A series without losses reads 100, a
/// flat series reads 50.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let (seed, rest) = deltas.split_at(period);

    let p = period as f64;
    let mut avg_gain = seed.iter().map(|d| d.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = seed.iter().map(|d| (-d).max(0.0)).sum::<f64>() / p;

    for d in rest {
        avg_gain = (avg_gain * (p - 1.0) + d.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-d).max(0.0)) / p;
    }

    if avg_loss == 0.0 {
        return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Relative strength rating as a 14-period RSI of closing prices.
pub fn relative_strength_rating(prices: &[PriceBar]) -> IndicatorResult {
    let closes: Vec<f64> = prices.iter().map(|b| b.close).collect();
    match wilder_rsi(&closes, RSI_PERIOD) {
        Some(rsi) => IndicatorResult::percent(rsi, rsi >= RS_RATING_THRESHOLD),
        None => IndicatorResult::no_verdict(),
    }
}

/// Money-flow volume of one bar. A bar with no range moves the line by 0.
fn money_flow_volume(bar: &PriceBar) -> f64 {
    let range = bar.high - bar.low;
    if range <= 0.0 {
        return 0.0;
    }
    let multiplier = ((bar.close - bar.low) - (bar.high - bar.close)) / range;
    multiplier * bar.volume
}

/// Cumulative accumulation/distribution line.
pub fn accumulation_distribution_line(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .scan(0.0, |adl, bar| {
            *adl += money_flow_volume(bar);
            Some(*adl)
        })
        .collect()
}

/// Grades the latest change of the A/D line against the average change over
/// the window. An unchanged line grades C.
pub fn accumulation_distribution_grade(bars: &[PriceBar]) -> Option<Grade> {
    if bars.len() < 2 {
        return None;
    }
    let window = &bars[bars.len().saturating_sub(AD_LOOKBACK_BARS)..];
    let adl = accumulation_distribution_line(window);

    let changes: Vec<f64> = adl.windows(2).map(|w| w[1] - w[0]).collect();
    let latest = *changes.last()?;
    let average = mean(&changes)?;

    let grade = if latest > 0.0 {
        if latest >= average * 1.2 {
            Grade::A
        } else {
            Grade::B
        }
    } else if latest < 0.0 && latest <= -average * 1.2 {
        Grade::D
    } else {
        Grade::C
    };
    Some(grade)
}

/// Accumulation/distribution rating. Passes at A, B or C.
pub fn accumulation_distribution_rating(prices: &[PriceBar]) -> IndicatorResult {
    match accumulation_distribution_grade(prices) {
        Some(grade) => IndicatorResult::verdict(grade.as_str(), grade <= Grade::C)
            .with_metric(grade.score()),
        None => IndicatorResult::no_verdict(),
    }
}
