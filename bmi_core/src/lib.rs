#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI tracker.
//!
//! This crate provides:
//! - Domain types (units, measurements, classifications, records)
//! - Unit conversion and the BMI engine
//! - CSV history persistence (append, recent rows, overwrite, import, trend)
//! - Session state for the presentation layer

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod engine;
pub mod history;
pub mod session;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use types::*;
pub use config::Config;
pub use engine::{advice, classify, compute, compute_from_input};
pub use history::{HistoryStore, ImportMode, ImportSummary, Trend, TrendPoint};
pub use session::{Calculation, Session};
