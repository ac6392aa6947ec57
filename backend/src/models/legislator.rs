//! Legislator model
//!
//! Each legislator has:
//! - A fixed ideal point on the one-dimensional policy axis
//! - A party affiliation that never changes after generation
//! - A tolerance ("error" radius) that grows by a fatigue increment after
//!   every failed vote within one bill
//!
//! Tolerance is stored as a failed-round counter over a [`ToleranceSchedule`],
//! so it is non-negative and non-decreasing for any valid schedule.

use crate::acceptance;
use crate::models::party::{PartyAffiliation, ToleranceSchedule};
use serde::{Deserialize, Serialize};

/// A single member of the chamber.
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::models::{Legislator, PartyAffiliation, ToleranceSchedule};
///
/// let mut legislator = Legislator::new(0, PartyAffiliation::Majority, 0.5, ToleranceSchedule::new(0.02, 0.01));
/// assert!(legislator.accepts(0.51));
/// assert!(!legislator.accepts(0.6));
///
/// legislator.apply_fatigue();
/// assert_eq!(legislator.failed_rounds(), 1);
/// assert_eq!(legislator.tolerance(), 0.02 + 0.01);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    /// Index within the chamber (unique per population)
    id: usize,

    party: PartyAffiliation,

    /// Most-preferred policy position
    ideal: f64,

    schedule: ToleranceSchedule,

    /// Failed votes seen during the current bill
    failed_rounds: u32,
}

impl Legislator {
    pub fn new(id: usize, party: PartyAffiliation, ideal: f64, schedule: ToleranceSchedule) -> Self {
        Self {
            id,
            party,
            ideal,
            schedule,
            failed_rounds: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn party(&self) -> PartyAffiliation {
        self.party
    }

    pub fn ideal(&self) -> f64 {
        self.ideal
    }

    pub fn schedule(&self) -> ToleranceSchedule {
        self.schedule
    }

    pub fn failed_rounds(&self) -> u32 {
        self.failed_rounds
    }

    /// Current tolerance: `initial + failed_rounds * increment`.
    pub fn tolerance(&self) -> f64 {
        self.schedule.tolerance_after(self.failed_rounds)
    }

    /// Closed interval of acceptable proposals `[ideal - tolerance, ideal + tolerance]`.
    pub fn acceptance_interval(&self) -> (f64, f64) {
        let tolerance = self.tolerance();
        (self.ideal - tolerance, self.ideal + tolerance)
    }

    /// Would this legislator vote yea on `proposal` right now?
    pub fn accepts(&self, proposal: f64) -> bool {
        acceptance::accepts(self.ideal, self.tolerance(), proposal)
    }

    /// Record one failed vote (fatigue).
    pub fn apply_fatigue(&mut self) {
        self.failed_rounds += 1;
    }

    /// Return to the baseline tolerance for a new bill.
    pub fn reset_tolerance(&mut self) {
        self.failed_rounds = 0;
    }
}
