use crate::domain::indicator::IndicatorResult;
use serde::Serialize;

/// Thematic grouping of checklist rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rock {
    EarningsQuality,
    InstitutionalSupport,
    TechnicalStrength,
    Timing,
}

/// Full checklist for one ticker. Field order is the presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistReport {
    pub ticker: String,
    pub earnings_quality: EarningsQuality,
    pub institutional_support: InstitutionalSupport,
    pub technical_strength: TechnicalStrength,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuality {
    pub composite_rating: IndicatorResult,
    pub eps_growth: IndicatorResult,
    pub three_quarter_eps_growth: IndicatorResult,
    pub accelerating_earnings_growth: IndicatorResult,
    pub annual_eps_growth: IndicatorResult,
    pub sales_growth: IndicatorResult,
    pub return_on_equity: IndicatorResult,
    pub smr_rating: IndicatorResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalSupport {
    pub increase_in_funds_ownership: IndicatorResult,
    pub accumulation_distribution_rating: IndicatorResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalStrength {
    pub relative_strength_rating: IndicatorResult,
    pub current_share_price: IndicatorResult,
    pub average_daily_volume: IndicatorResult,
    pub percent_off_high: IndicatorResult,
    pub market_trend: IndicatorResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub breaking_out_of_sound_base: IndicatorResult,
    pub volume_above_average: IndicatorResult,
    pub rs_line_new_high: IndicatorResult,
    pub within_buy_point: IndicatorResult,
}

impl ChecklistReport {
    pub fn composite(&self) -> &IndicatorResult {
        &self.earnings_quality.composite_rating
    }

    /// Every row as `(rock, key, result)` in presentation order. Keys match the
    /// serialized field names.
    pub fn entries(&self) -> Vec<(Rock, &'static str, &IndicatorResult)> {
        let e = &self.earnings_quality;
        let i = &self.institutional_support;
        let t = &self.technical_strength;
        let m = &self.timing;
        vec![
            (Rock::EarningsQuality, "compositeRating", &e.composite_rating),
            (Rock::EarningsQuality, "epsGrowth", &e.eps_growth),
            (Rock::EarningsQuality, "threeQuarterEpsGrowth", &e.three_quarter_eps_growth),
            (Rock::EarningsQuality, "acceleratingEarningsGrowth", &e.accelerating_earnings_growth),
            (Rock::EarningsQuality, "annualEpsGrowth", &e.annual_eps_growth),
            (Rock::EarningsQuality, "salesGrowth", &e.sales_growth),
            (Rock::EarningsQuality, "returnOnEquity", &e.return_on_equity),
            (Rock::EarningsQuality, "smrRating", &e.smr_rating),
            (Rock::InstitutionalSupport, "increaseInFundsOwnership", &i.increase_in_funds_ownership),
            (Rock::InstitutionalSupport, "accumulationDistributionRating", &i.accumulation_distribution_rating),
            (Rock::TechnicalStrength, "relativeStrengthRating", &t.relative_strength_rating),
            (Rock::TechnicalStrength, "currentSharePrice", &t.current_share_price),
            (Rock::TechnicalStrength, "averageDailyVolume", &t.average_daily_volume),
            (Rock::TechnicalStrength, "percentOffHigh", &t.percent_off_high),
            (Rock::TechnicalStrength, "marketTrend", &t.market_trend),
            (Rock::Timing, "breakingOutOfSoundBase", &m.breaking_out_of_sound_base),
            (Rock::Timing, "volumeAboveAverage", &m.volume_above_average),
            (Rock::Timing, "rsLineNewHigh", &m.rs_line_new_high),
            (Rock::Timing, "withinBuyPoint", &m.within_buy_point),
        ]
    }

    /// Rows with a verdict that passed.
    pub fn passed_count(&self) -> usize {
        self.entries()
            .into_iter()
            .filter(|(_, _, r)| r.passed() == Some(true))
            .count()
    }

    /// Rows that reported no verdict.
    pub fn no_verdict_count(&self) -> usize {
        self.entries()
            .into_iter()
            .filter(|(_, _, r)| r.is_no_verdict())
            .count()
    }
}
