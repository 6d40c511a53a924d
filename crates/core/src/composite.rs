//! Composite rating: a weighted blend of several checklist rows on a common
//! 0–100 scale.

use crate::domain::indicator::IndicatorResult;
use crate::error::ChecklistError;
use serde::{Deserialize, Serialize};

pub const COMPOSITE_PASS_THRESHOLD: f64 = 95.0;

/// Growth (EPS or sales) that maps to a full score.
pub const GROWTH_REFERENCE_PCT: f64 = 25.0;
pub const ROE_REFERENCE_PCT: f64 = 17.0;
/// Distance below the 52-week high that maps to a zero score.
pub const OFF_HIGH_REFERENCE_PCT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeFactor {
    EpsGrowth,
    SalesGrowth,
    ReturnOnEquity,
    RelativeStrength,
    AcceleratingGrowth,
    AccumulationDistribution,
    PercentOffHigh,
}

impl CompositeFactor {
    /// Maps an indicator metric onto [0, 100].
    pub fn normalize(self, metric: f64) -> f64 {
        let score = match self {
            CompositeFactor::EpsGrowth | CompositeFactor::SalesGrowth => {
                metric / GROWTH_REFERENCE_PCT * 100.0
            }
            CompositeFactor::ReturnOnEquity => metric / ROE_REFERENCE_PCT * 100.0,
            // Already on the 0–100 scale (RSI, yes/no, letter grade score).
            CompositeFactor::RelativeStrength
            | CompositeFactor::AcceleratingGrowth
            | CompositeFactor::AccumulationDistribution => metric,
            CompositeFactor::PercentOffHigh => (1.0 - metric / OFF_HIGH_REFERENCE_PCT) * 100.0,
        };
        score.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorWeight {
    pub factor: CompositeFactor,
    pub weight: u32,
}

/// Which rows feed the composite and how much each counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeProfile {
    name: &'static str,
    factors: Vec<FactorWeight>,
}

impl CompositeProfile {
    /// EPS growth and relative strength dominate; accelerating growth counts.
    pub fn standard() -> Self {
        Self::with_timing_factor("standard", CompositeFactor::AcceleratingGrowth)
    }

    /// Same weights, with accumulation/distribution in place of accelerating
    /// growth.
    pub fn accumulation() -> Self {
        Self::with_timing_factor("accumulation", CompositeFactor::AccumulationDistribution)
    }

    fn with_timing_factor(name: &'static str, factor: CompositeFactor) -> Self {
        let factors = vec![
            FactorWeight { factor: CompositeFactor::EpsGrowth, weight: 30 },
            FactorWeight { factor: CompositeFactor::SalesGrowth, weight: 10 },
            FactorWeight { factor: CompositeFactor::ReturnOnEquity, weight: 10 },
            FactorWeight { factor: CompositeFactor::RelativeStrength, weight: 30 },
            FactorWeight { factor, weight: 10 },
            FactorWeight { factor: CompositeFactor::PercentOffHigh, weight: 10 },
        ];
        Self { name, factors }
    }

    pub fn from_name(name: &str) -> Result<Self, ChecklistError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "accumulation" => Ok(Self::accumulation()),
            other => Err(ChecklistError::UnknownCompositeProfile(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn factors(&self) -> &[FactorWeight] {
        &self.factors
    }

    pub fn weight_of(&self, factor: CompositeFactor) -> Option<u32> {
        self.factors
            .iter()
            .find(|fw| fw.factor == factor)
            .map(|fw| fw.weight)
    }
}

impl Default for CompositeProfile {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompositeInput<'a> {
    pub factor: CompositeFactor,
    pub result: &'a IndicatorResult,
}

/// Weighted average of the normalized inputs, each weighted by its result's
/// `weight`. Any input without a verdict leaves the composite without one.
pub fn composite_rating(inputs: &[CompositeInput<'_>]) -> IndicatorResult {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for input in inputs {
        let Some(metric) = input.result.metric() else {
            return IndicatorResult::no_verdict();
        };
        let weight = f64::from(input.result.weight());
        weighted_sum += input.factor.normalize(metric) * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return IndicatorResult::no_verdict();
    }

    let score = weighted_sum / total_weight;
    IndicatorResult::percent(score, score >= COMPOSITE_PASS_THRESHOLD)
}
