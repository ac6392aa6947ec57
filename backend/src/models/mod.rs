//! Domain models for the legislative bargaining simulator

pub mod event;
pub mod legislator;
pub mod outcome;
pub mod party;

// Re-exports
pub use event::{EventLog, VoteEvent};
pub use legislator::Legislator;
pub use outcome::{BillOutcome, OutcomeRow};
pub use party::{PartyAffiliation, PartyConfig, ToleranceSchedule};
