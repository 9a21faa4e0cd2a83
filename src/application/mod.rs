//! Application layer - use cases and services

pub mod services;

pub use services::PoolComparisonService;
