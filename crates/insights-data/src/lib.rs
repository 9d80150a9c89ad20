//! Data layer for Event Insights.
//!
//! Reads raw CSV event exports, converts rows into typed events, folds them
//! into summary statistics and runs the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod converter;
pub mod reader;

pub use insights_core as core;
