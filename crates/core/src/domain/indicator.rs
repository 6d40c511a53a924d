use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight carried by results the composite does not consume.
pub const NEUTRAL_WEIGHT: u32 = 1;

/// One checklist judgment.
///
/// `value` is `None` when the inputs were insufficient; in that case `passed`
/// is `None` as well. The constructors are the only way to build a result, so
/// a verdict can never be attached to the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    value: Option<String>,
    passed: Option<bool>,
    weight: u32,
    /// Unrounded number behind `value`, consumed by the composite.
    #[serde(skip)]
    metric: Option<f64>,
}

impl IndicatorResult {
    pub fn no_verdict() -> Self {
        Self {
            value: None,
            passed: None,
            weight: NEUTRAL_WEIGHT,
            metric: None,
        }
    }

    pub fn verdict(value: impl Into<String>, passed: bool) -> Self {
        Self {
            value: Some(value.into()),
            passed: Some(passed),
            weight: NEUTRAL_WEIGHT,
            metric: None,
        }
    }

    /// Formats `pct` with two decimals and keeps the unrounded number as metric.
    pub fn percent(pct: f64, passed: bool) -> Self {
        Self::verdict(format!("{pct:.2}%"), passed).with_metric(pct)
    }

    pub fn with_metric(mut self, metric: f64) -> Self {
        if self.value.is_some() {
            self.metric = Some(metric);
        }
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn metric(&self) -> Option<f64> {
        self.metric
    }

    pub fn is_no_verdict(&self) -> bool {
        self.value.is_none()
    }
}

/// Letter grade, `A` best. Ordering follows the alphabet so the worst grade of
/// a set is its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// Position on the 0–100 composite scale.
    pub fn score(self) -> f64 {
        match self {
            Grade::A => 100.0,
            Grade::B => 80.0,
            Grade::C => 60.0,
            Grade::D => 40.0,
            Grade::E => 20.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
