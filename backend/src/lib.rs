//! Legislative Bargaining Core - Rust Engine
//!
//! Simulates how a bill is bargained to passage under a one-dimensional
//! spatial voting model, with deterministic execution.
//!
//! # Architecture
//!
//! - **models**: Domain types (Legislator, Party, BillOutcome, events)
//! - **population**: Ideal-point generation for both parties
//! - **acceptance**: Whether a legislator accepts a proposal
//! - **proposal**: Proposal strategies (nearest point to the median)
//! - **orchestrator**: Per-bill voting state machine
//! - **batch**: Parameter sweeps over a worker pool
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG, one per run)
//! 2. Tolerance after k failed votes is exactly `initial + k * increment`
//! 3. Configuration errors surface before any simulation work

// Module declarations
pub mod acceptance;
pub mod batch;
pub mod models;
pub mod orchestrator;
pub mod population;
pub mod proposal;
pub mod rng;

// Re-exports for convenience
pub use batch::{BatchConfig, BatchDriver, BatchError, BatchReport, SweepGrid};
pub use models::{
    BillOutcome, EventLog, Legislator, OutcomeRow, PartyAffiliation, PartyConfig,
    ToleranceSchedule, VoteEvent,
};
pub use orchestrator::{
    run_bill, EngineConfig, MedianReference, ParameterSet, ProposerSelection, RoundPhase,
    RoundResult, SimulationError, VotingEngine,
};
pub use population::{Population, PopulationGenerator};
pub use proposal::{NearestToMedian, ProposalStrategy};
pub use rng::RngManager;
