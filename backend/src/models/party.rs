//! Party model
//!
//! A party only parameterizes legislator generation: size, mean ideal point
//! ("median") and the spread of ideal points (homogeneity). It carries no
//! mutable state during voting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the chamber a legislator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyAffiliation {
    Majority,
    Minority,
}

impl fmt::Display for PartyAffiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Majority => write!(f, "majority"),
            Self::Minority => write!(f, "minority"),
        }
    }
}

/// Baseline tolerance and per-failed-vote growth for a group of legislators.
///
/// After `k` failed votes a legislator's tolerance is
/// `initial_tolerance + k * fatigue_increment`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSchedule {
    /// Tolerance at the start of every bill (baseline error)
    pub initial_tolerance: f64,

    /// Tolerance added after each failed vote
    pub fatigue_increment: f64,
}

impl ToleranceSchedule {
    pub fn new(initial_tolerance: f64, fatigue_increment: f64) -> Self {
        Self {
            initial_tolerance,
            fatigue_increment,
        }
    }

    /// Tolerance after `failed_rounds` failed votes.
    ///
    /// Computed from the round count rather than accumulated, so the value
    /// never drifts from `initial + k * increment`.
    pub fn tolerance_after(&self, failed_rounds: u32) -> f64 {
        self.initial_tolerance + f64::from(failed_rounds) * self.fatigue_increment
    }
}

/// Generation parameters for one party.
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::models::{PartyAffiliation, PartyConfig, ToleranceSchedule};
///
/// let majority = PartyConfig::new(
///     PartyAffiliation::Majority,
///     51,
///     0.5,
///     0.1,
///     ToleranceSchedule::new(0.02, 0.01),
/// );
/// assert_eq!(majority.size, 51);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyConfig {
    pub affiliation: PartyAffiliation,

    /// Number of seats held by the party
    pub size: usize,

    /// Mean ideal point of the party
    pub mean: f64,

    /// Standard deviation of ideal points (lower = more homogeneous)
    pub std_dev: f64,

    pub schedule: ToleranceSchedule,
}

impl PartyConfig {
    pub fn new(
        affiliation: PartyAffiliation,
        size: usize,
        mean: f64,
        std_dev: f64,
        schedule: ToleranceSchedule,
    ) -> Self {
        Self {
            affiliation,
            size,
            mean,
            std_dev,
            schedule,
        }
    }
}
