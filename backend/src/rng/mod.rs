//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: Every party draw and proposer selection MUST go through this module.

mod xorshift;

pub use xorshift::RngManager;
