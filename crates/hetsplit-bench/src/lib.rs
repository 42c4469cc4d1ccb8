//! Synthetic knowledge-graph generator and benchmark utilities for hetsplit.
//!
//! This crate provides deterministic generation of node and edge tables for
//! benchmarking and property-based testing of `hetsplit-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratedTables, GeneratorConfig, SizeTier, generate_tables};
