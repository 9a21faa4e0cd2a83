//! Poolscope - bonding-curve pool account decoder and config differ
//! Built with Domain-Driven Design principles

pub mod application;
pub mod codec;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;
pub mod webserver;

// Re-export main types for convenience
pub use application::PoolComparisonService;
pub use domain::diff::diff;
pub use domain::pool::{PoolConfigRecord, PoolStateRecord};
pub use report::ComparisonReport;
