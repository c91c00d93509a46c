//! Mission submission intake for the Mission17 platform.
//!
//! AI-scored mission proofs pass through a human-in-the-loop spot-check gate before they
//! are stored and, when approved, credited through the points ledger.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
