// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # aiusage Store
//!
//! Configuration for aiusage.
//!
//! This crate provides:
//!
//! - **Config**: Timeouts, disabled providers, credential variables, and
//!   path overrides read from `<config_dir>/aiusage/config.json`
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use aiusage_store::Config;
//!
//! let config = Config::load()?;
//! let settings = config.fetch_settings()?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, PathOverrides};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};
