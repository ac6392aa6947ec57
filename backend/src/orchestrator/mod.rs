//! Orchestrator - per-bill voting loop
//!
//! See `engine.rs` for the round state machine and `config.rs` for the
//! input records.

pub mod config;
pub mod engine;

// Re-export main types for convenience
pub use config::{EngineConfig, MedianReference, ParameterSet, ProposerSelection};
pub use engine::{run_bill, RoundPhase, RoundResult, SimulationError, VotingEngine};
