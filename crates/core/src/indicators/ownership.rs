use crate::domain::indicator::IndicatorResult;
use crate::domain::snapshot::OwnershipRecord;

/// Percentage change between the two most recent fund ownership reports.
/// Passes on any increase.
pub fn increase_in_funds_ownership(records: &[OwnershipRecord]) -> IndicatorResult {
    if records.len() < 2 {
        return IndicatorResult::no_verdict();
    }

    let mut sorted: Vec<&OwnershipRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.report_date);

    let previous = sorted[sorted.len() - 2].position;
    let latest = sorted[sorted.len() - 1].position;
    if previous == 0.0 {
        return IndicatorResult::no_verdict();
    }

    let increase = latest - previous;
    IndicatorResult::percent(increase / previous * 100.0, increase > 0.0)
}
