//! Turbine Configuration Module
//!
//! Provides per-turbine configuration loaded from TOML files, replacing all
//! hardcoded classifier thresholds with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `DRIFTOPS_CONFIG` environment variable (path to TOML file)
//! 2. `turbine_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Load once at process start and share read-only:
//!
//! ```ignore
//! use std::sync::Arc;
//! use driftops_core::config::TurbineConfig;
//!
//! let config = Arc::new(TurbineConfig::load());
//! let session = driftops_core::AnalysisSession::new(config);
//! ```
//!
//! The configuration is never mutated after load; `Arc` sharing makes it
//! safe for unlimited concurrent read access.

mod turbine_config;

pub use turbine_config::*;
