use crate::domain::snapshot::{OwnershipRecord, PriceBar};
use serde::{Deserialize, Serialize};

/// `/v1/ownership/{ticker}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipResponse {
    pub ticker: String,
    #[serde(default)]
    pub records: Vec<OwnershipRecord>,
}

/// `/v1/history/{ticker}` body. Bars come back oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub ticker: String,
    pub interval: Option<String>,
    #[serde(default)]
    pub bars: Vec<PriceBar>,
}
