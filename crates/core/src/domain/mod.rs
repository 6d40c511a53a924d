pub mod indicator;
pub mod report;
pub mod snapshot;
