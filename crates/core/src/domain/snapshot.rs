use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the checklist needs to know about one ticker, as returned by the
/// acquisition layer. Every section is optional; indicators that lack their
/// input report no verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub ticker: String,
    #[serde(default)]
    pub fundamentals: Option<Fundamentals>,
    #[serde(default)]
    pub ownership: Option<Vec<OwnershipRecord>>,
    #[serde(default)]
    pub price_series: Option<Vec<PriceBar>>,
    #[serde(default)]
    pub benchmark_price_series: Option<Vec<PriceBar>>,
    #[serde(default)]
    pub market_summary: Option<MarketSummary>,
}

impl StockSnapshot {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn quarterly(&self) -> &[EarningsPoint] {
        self.fundamentals
            .as_ref()
            .map(|f| f.quarterly.as_slice())
            .unwrap_or_default()
    }

    pub fn yearly(&self) -> &[EarningsPoint] {
        self.fundamentals
            .as_ref()
            .map(|f| f.yearly.as_slice())
            .unwrap_or_default()
    }

    pub fn prices(&self) -> &[PriceBar] {
        self.price_series.as_deref().unwrap_or_default()
    }

    pub fn benchmark_prices(&self) -> &[PriceBar] {
        self.benchmark_price_series.as_deref().unwrap_or_default()
    }

    pub fn ownership_records(&self) -> &[OwnershipRecord] {
        self.ownership.as_deref().unwrap_or_default()
    }
}

/// Earnings, revenue and ratio data. Ratios are fractions (`0.25` is 25%).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    /// Quarterly points, oldest first.
    #[serde(default)]
    pub quarterly: Vec<EarningsPoint>,
    /// Yearly points, oldest first.
    #[serde(default)]
    pub yearly: Vec<EarningsPoint>,
    pub shares_outstanding: Option<f64>,
    pub eps_trailing_twelve_months: Option<f64>,
    pub eps_current_year: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub gross_margin: Option<f64>,
    pub revenue_growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsPoint {
    /// Reporting period label, e.g. `2Q2024` or `2023`.
    pub period: String,
    /// Reported EPS.
    pub eps: Option<f64>,
    /// Net earnings for the period.
    pub earnings: Option<f64>,
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRecord {
    pub report_date: NaiveDate,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub price: Option<f64>,
    pub average_volume: Option<f64>,
    pub volume: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}
