use thiserror::Error;

/// Failures caused by the caller rather than by the market data.
///
/// Thin or missing data never shows up here; it becomes a no-verdict result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("ticker symbol is missing")]
    MissingTicker,

    #[error("unknown composite profile: {0} (expected `standard` or `accumulation`)")]
    UnknownCompositeProfile(String),
}
