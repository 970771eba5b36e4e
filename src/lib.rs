//! Track dependency graph engine
//!
//! Keeps a decomposed project's dependency structure, execution order, and
//! per-track lifecycle state mutually consistent: cycle detection, wave
//! scheduling, what-if edge checks, lifecycle validation, wave completion
//! gating, drift detection, and progress reporting.

pub mod commands;
pub mod drift;
pub mod gate;
pub mod graph;
pub mod lifecycle;
pub mod models;
pub mod progress;
pub mod store;
