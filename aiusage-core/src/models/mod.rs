//! Domain models for aiusage.
//!
//! This module contains the data structures shared by every parser and by
//! the report renderers.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider identity and capability
//! - [`cost`] - Reported dollar cost
//! - [`event`] - The canonical usage event
//! - [`window`] - Usage windows and periods
//! - [`report`] - Provider reports, status, and the aggregate report

mod cost;
mod event;
mod provider;
mod report;
mod window;

// Re-export everything at the models level
pub use cost::Usd;
pub use event::UsageEvent;
pub use provider::{Capability, ProviderId};
pub use report::{AggregateReport, ProviderReport, ReportStatus};
pub use window::{Period, UsageWindow, UsageWindows};
