// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # aiusage Core
//!
//! Core types, models, and the time-window aggregator for `aiusage`.
//!
//! This crate holds everything that is independent of where usage data
//! comes from:
//!
//! - The canonical usage event every parser normalizes into
//! - Usage windows with explicit null propagation
//! - Provider reports, status classification, and the aggregate report
//! - Calendar period bounds (local day, Monday week, calendar month)
//! - The aggregator that buckets events into windows
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderId`] - The fixed set of supported AI coding tools
//! - [`Capability`] - What a provider is able to measure
//!
//! ### Usage Types
//! - [`UsageEvent`] - One normalized usage record
//! - [`UsageWindow`] - Additive sum of events inside one period
//! - [`UsageWindows`] - The four windows reported per provider
//! - [`Period`] - today / this week / this month / total
//!
//! ### Reports
//! - [`ProviderReport`] - One provider's row
//! - [`ReportStatus`] - `active`, `unavailable`, `not_applicable`, `error`
//! - [`AggregateReport`] - Ordered rows for one invocation
//!
//! ### Aggregation
//! - [`PeriodBounds`] - Window boundaries for a reference "now"
//! - [`Aggregator`] - Buckets events into windows

pub mod aggregate;
pub mod error;
pub mod models;
pub mod time;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provider types
    Capability,
    ProviderId,
    // Usage types
    Period,
    Usd,
    UsageEvent,
    UsageWindow,
    UsageWindows,
    // Reports
    AggregateReport,
    ProviderReport,
    ReportStatus,
};

// Re-export aggregation
pub use aggregate::{Aggregator, PeriodBounds};
