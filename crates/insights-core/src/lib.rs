//! Shared types for Event Insights.
//!
//! Holds the typed event record, the summary produced by aggregation, the
//! error taxonomy and the command-line settings.

pub mod error;
pub mod models;
pub mod settings;
