use crate::composite::{composite_rating, CompositeFactor, CompositeInput, CompositeProfile};
use crate::domain::indicator::{IndicatorResult, NEUTRAL_WEIGHT};
use crate::domain::report::{
    ChecklistReport, EarningsQuality, InstitutionalSupport, TechnicalStrength, Timing,
};
use crate::domain::snapshot::StockSnapshot;
use crate::error::ChecklistError;
use crate::indicators::{earnings, ownership, price, ratings};

/// Weight of the share-price and liquidity rows.
const LIQUIDITY_WEIGHT: u32 = 5;

#[derive(Debug, Clone)]
pub struct ChecklistOptions {
    /// Minimum share price for the current-price row.
    pub min_share_price: f64,

    /// Minimum average daily volume, in shares.
    pub min_average_volume: f64,

    pub composite_profile: CompositeProfile,
}

impl Default for ChecklistOptions {
    fn default() -> Self {
        Self {
            min_share_price: price::DEFAULT_MIN_SHARE_PRICE,
            min_average_volume: price::DEFAULT_MIN_AVERAGE_VOLUME,
            composite_profile: CompositeProfile::default(),
        }
    }
}

impl ChecklistOptions {
    pub fn from_env() -> Result<Self, ChecklistError> {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("CHECKLIST_MIN_SHARE_PRICE") {
            if let Ok(n) = s.parse::<f64>() {
                out.min_share_price = n;
            }
        }

        if let Ok(s) = std::env::var("CHECKLIST_MIN_AVERAGE_VOLUME") {
            if let Ok(n) = s.parse::<f64>() {
                out.min_average_volume = n;
            }
        }

        if let Ok(s) = std::env::var("COMPOSITE_PROFILE") {
            if !s.trim().is_empty() {
                out.composite_profile = CompositeProfile::from_name(&s)?;
            }
        }

        Ok(out)
    }
}

/// Runs every checklist row over `snapshot` and groups the results.
///
/// Only a missing ticker is an error; every other gap in the snapshot turns
/// into no-verdict rows.
pub fn evaluate(
    snapshot: &StockSnapshot,
    options: &ChecklistOptions,
) -> Result<ChecklistReport, ChecklistError> {
    let ticker = snapshot.ticker.trim();
    if ticker.is_empty() {
        return Err(ChecklistError::MissingTicker);
    }

    let profile = &options.composite_profile;
    let weighted = |factor: CompositeFactor, result: IndicatorResult| {
        result.with_weight(profile.weight_of(factor).unwrap_or(NEUTRAL_WEIGHT))
    };

    let fundamentals = snapshot.fundamentals.as_ref();
    let summary = snapshot.market_summary.as_ref();
    let quarterly = snapshot.quarterly();
    let prices = snapshot.prices();
    let benchmark = snapshot.benchmark_prices();

    let eps_growth = weighted(
        CompositeFactor::EpsGrowth,
        earnings::recent_eps_growth(quarterly),
    );
    let sales_growth = weighted(
        CompositeFactor::SalesGrowth,
        earnings::sales_growth(quarterly),
    );
    let return_on_equity = weighted(
        CompositeFactor::ReturnOnEquity,
        earnings::return_on_equity(fundamentals.and_then(|f| f.return_on_equity)),
    );
    let accelerating = weighted(
        CompositeFactor::AcceleratingGrowth,
        earnings::accelerating_earnings_growth(quarterly),
    );
    let accumulation_distribution = weighted(
        CompositeFactor::AccumulationDistribution,
        ratings::accumulation_distribution_rating(prices),
    );
    let relative_strength = weighted(
        CompositeFactor::RelativeStrength,
        ratings::relative_strength_rating(prices),
    );
    let percent_off_high = weighted(
        CompositeFactor::PercentOffHigh,
        price::percent_off_high(summary),
    );

    let inputs: Vec<CompositeInput<'_>> = profile
        .factors()
        .iter()
        .map(|fw| CompositeInput {
            factor: fw.factor,
            result: match fw.factor {
                CompositeFactor::EpsGrowth => &eps_growth,
                CompositeFactor::SalesGrowth => &sales_growth,
                CompositeFactor::ReturnOnEquity => &return_on_equity,
                CompositeFactor::RelativeStrength => &relative_strength,
                CompositeFactor::AcceleratingGrowth => &accelerating,
                CompositeFactor::AccumulationDistribution => &accumulation_distribution,
                CompositeFactor::PercentOffHigh => &percent_off_high,
            },
        })
        .collect();
    let composite = composite_rating(&inputs);

    let report = ChecklistReport {
        ticker: ticker.to_string(),
        earnings_quality: EarningsQuality {
            composite_rating: composite,
            eps_growth,
            three_quarter_eps_growth: earnings::three_quarter_eps_growth(
                quarterly,
                fundamentals.and_then(|f| f.shares_outstanding),
            ),
            accelerating_earnings_growth: accelerating,
            annual_eps_growth: earnings::average_annual_eps_growth(snapshot.yearly()),
            sales_growth,
            return_on_equity,
            smr_rating: ratings::smr_rating(fundamentals),
        },
        institutional_support: InstitutionalSupport {
            increase_in_funds_ownership: ownership::increase_in_funds_ownership(
                snapshot.ownership_records(),
            ),
            accumulation_distribution_rating: accumulation_distribution,
        },
        technical_strength: TechnicalStrength {
            relative_strength_rating: relative_strength,
            current_share_price: price::current_share_price(summary, options.min_share_price)
                .with_weight(LIQUIDITY_WEIGHT),
            average_daily_volume: price::average_daily_volume(summary, options.min_average_volume)
                .with_weight(LIQUIDITY_WEIGHT),
            percent_off_high,
            market_trend: price::market_trend(benchmark),
        },
        timing: Timing {
            breaking_out_of_sound_base: price::breakout(prices, summary),
            volume_above_average: price::volume_above_average(summary),
            rs_line_new_high: price::rs_line_new_high(prices, benchmark),
            within_buy_point: price::within_buy_point(summary.and_then(|s| s.price), prices),
        },
    };

    tracing::debug!(
        ticker = %report.ticker,
        profile = profile.name(),
        composite = report.composite().value().unwrap_or("n/a"),
        passed = report.passed_count(),
        no_verdict = report.no_verdict_count(),
        "checklist evaluated"
    );

    Ok(report)
}
