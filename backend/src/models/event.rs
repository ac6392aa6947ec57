//! Event logging for a single bill.
//!
//! Every vote on a bill leaves a trail of events so a run can be inspected
//! after the fact:
//! - **Proposed**: a proposer put a policy point to the floor
//! - **Tallied**: the chamber voted on it
//! - **FatigueApplied**: the vote failed and every tolerance grew
//! - **Passed**: the bill passed (terminal)
//!
//! # Example
//!
//! ```rust
//! use legislative_bargaining_core_rs::models::{EventLog, VoteEvent};
//!
//! let mut log = EventLog::new();
//! log.log(VoteEvent::Tallied { round: 1, yeas: 40, nays: 61, passed: false });
//! assert_eq!(log.events_in_round(1).len(), 1);
//! ```

use crate::models::party::PartyAffiliation;
use serde::{Deserialize, Serialize};

/// A state change during one bill's voting process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoteEvent {
    Proposed {
        round: u32,
        proposer_id: usize,
        proposer_party: PartyAffiliation,
        proposer_ideal: f64,
        proposal: f64,
    },

    Tallied {
        round: u32,
        yeas: usize,
        nays: usize,
        passed: bool,
    },

    /// Tolerances after the failed vote, per party (`None` for an empty party)
    FatigueApplied {
        round: u32,
        failed_rounds: u32,
        majority_tolerance: Option<f64>,
        minority_tolerance: Option<f64>,
    },

    Passed {
        round: u32,
        final_value: f64,
    },
}

impl VoteEvent {
    /// Vote number (1-based) the event belongs to
    pub fn round(&self) -> u32 {
        match self {
            VoteEvent::Proposed { round, .. }
            | VoteEvent::Tallied { round, .. }
            | VoteEvent::FatigueApplied { round, .. }
            | VoteEvent::Passed { round, .. } => *round,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            VoteEvent::Proposed { .. } => "proposed",
            VoteEvent::Tallied { .. } => "tallied",
            VoteEvent::FatigueApplied { .. } => "fatigue_applied",
            VoteEvent::Passed { .. } => "passed",
        }
    }
}

/// Ordered event history of one bill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<VoteEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: VoteEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[VoteEvent] {
        &self.events
    }

    pub fn events_in_round(&self, round: u32) -> Vec<&VoteEvent> {
        self.events.iter().filter(|e| e.round() == round).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&VoteEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Proposals in the order they were made
    pub fn proposals(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                VoteEvent::Proposed { proposal, .. } => Some(*proposal),
                _ => None,
            })
            .collect()
    }
}
