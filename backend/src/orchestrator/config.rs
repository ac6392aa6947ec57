//! Run configuration
//!
//! [`ParameterSet`] is the per-bill input record (party sizes, means,
//! spreads, tolerance schedule, passage threshold). [`EngineConfig`] holds
//! the knobs of the voting engine itself. Both load from JSON.
//!
//! # Example
//!
//! ```rust
//! use legislative_bargaining_core_rs::orchestrator::ParameterSet;
//!
//! let params = ParameterSet::from_json(r#"{
//!     "majority_size": 10,
//!     "minority_size": 10,
//!     "majority_mean": 1.0,
//!     "minority_mean": -1.0,
//!     "majority_stddev": 0.01,
//!     "minority_stddev": 0.01,
//!     "initial_tolerance": 0.05,
//!     "fatigue_increment": 0.05,
//!     "passage_threshold": 0.5
//! }"#).unwrap();
//!
//! assert!(params.validate().is_ok());
//! assert_eq!(params.median_distance(), 2.0);
//! ```

use crate::models::party::{PartyAffiliation, PartyConfig, ToleranceSchedule};
use crate::orchestrator::engine::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Input record for one bill-resolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub majority_size: usize,
    pub minority_size: usize,
    pub majority_mean: f64,
    pub minority_mean: f64,
    pub majority_stddev: f64,
    pub minority_stddev: f64,

    /// Baseline tolerance for every legislator
    pub initial_tolerance: f64,

    /// Tolerance growth per failed vote for every legislator
    pub fatigue_increment: f64,

    /// Share of the chamber that must vote yea, in (0, 1]
    pub passage_threshold: f64,

    /// Majority-specific tolerance schedule (overrides the global values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub majority_schedule: Option<ToleranceSchedule>,

    /// Minority-specific tolerance schedule (overrides the global values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minority_schedule: Option<ToleranceSchedule>,
}

impl Default for ParameterSet {
    /// 101-seat chamber, 51-seat majority, party means one unit apart.
    fn default() -> Self {
        Self {
            majority_size: 51,
            minority_size: 50,
            majority_mean: 0.5,
            minority_mean: -0.5,
            majority_stddev: 0.1,
            minority_stddev: 0.1,
            initial_tolerance: 0.02,
            fatigue_increment: 0.01,
            passage_threshold: 0.5,
            majority_schedule: None,
            minority_schedule: None,
        }
    }
}

impl ParameterSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Distance between the party means.
    pub fn median_distance(&self) -> f64 {
        (self.majority_mean - self.minority_mean).abs()
    }

    /// Total seats.
    pub fn chamber_size(&self) -> usize {
        self.majority_size + self.minority_size
    }

    fn global_schedule(&self) -> ToleranceSchedule {
        ToleranceSchedule::new(self.initial_tolerance, self.fatigue_increment)
    }

    pub fn majority_party(&self) -> PartyConfig {
        PartyConfig::new(
            PartyAffiliation::Majority,
            self.majority_size,
            self.majority_mean,
            self.majority_stddev,
            self.majority_schedule.unwrap_or_else(|| self.global_schedule()),
        )
    }

    pub fn minority_party(&self) -> PartyConfig {
        PartyConfig::new(
            PartyAffiliation::Minority,
            self.minority_size,
            self.minority_mean,
            self.minority_stddev,
            self.minority_schedule.unwrap_or_else(|| self.global_schedule()),
        )
    }

    /// Reject configurations the engine cannot run.
    ///
    /// Nothing is clamped: a zero-size party, a negative spread, a
    /// non-positive fatigue increment or a threshold outside (0, 1] is an
    /// error.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for party in [self.majority_party(), self.minority_party()] {
            if party.size == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} party size must be > 0",
                    party.affiliation
                )));
            }
            validate_spread(&party)?;
            validate_schedule(party.affiliation, &party.schedule)?;
        }

        if !(self.passage_threshold > 0.0 && self.passage_threshold <= 1.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "passage_threshold must be in (0, 1], got {}",
                self.passage_threshold
            )));
        }

        Ok(())
    }

    /// SHA-256 of the parameter values, hex encoded.
    ///
    /// Stable across runs and platforms; identifies a grid point in batch
    /// output.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.majority_size as u64).to_le_bytes());
        hasher.update((self.minority_size as u64).to_le_bytes());
        for value in [
            self.majority_mean,
            self.minority_mean,
            self.majority_stddev,
            self.minority_stddev,
            self.passage_threshold,
        ] {
            hasher.update(value.to_bits().to_le_bytes());
        }
        for schedule in [
            self.majority_party().schedule,
            self.minority_party().schedule,
        ] {
            hasher.update(schedule.initial_tolerance.to_bits().to_le_bytes());
            hasher.update(schedule.fatigue_increment.to_bits().to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Validate a party's mean and spread (size is the caller's concern).
pub(crate) fn validate_spread(party: &PartyConfig) -> Result<(), SimulationError> {
    if !party.mean.is_finite() {
        return Err(SimulationError::InvalidConfig(format!(
            "{} mean must be finite, got {}",
            party.affiliation, party.mean
        )));
    }
    if !(party.std_dev.is_finite() && party.std_dev >= 0.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "{} std-dev must be >= 0, got {}",
            party.affiliation, party.std_dev
        )));
    }
    Ok(())
}

/// Reject a negative initial tolerance or a non-positive fatigue increment.
pub(crate) fn validate_schedule(
    affiliation: PartyAffiliation,
    schedule: &ToleranceSchedule,
) -> Result<(), SimulationError> {
    if !(schedule.initial_tolerance.is_finite() && schedule.initial_tolerance >= 0.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "{} initial tolerance must be >= 0, got {}",
            affiliation, schedule.initial_tolerance
        )));
    }
    if !(schedule.fatigue_increment.is_finite() && schedule.fatigue_increment > 0.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "{} fatigue increment must be > 0, got {}",
            affiliation, schedule.fatigue_increment
        )));
    }
    Ok(())
}

/// How the proposer is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposerSelection {
    /// Draw a new proposer uniformly before every vote
    #[default]
    EachRound,

    /// Draw one proposer per bill and keep them until passage
    FixedPerBill,
}

/// Point proposers steer toward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianReference {
    /// Median ideal point of the generated chamber
    #[default]
    Chamber,

    /// Fixed reference point
    Fixed(f64),
}

/// Voting engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Votes allowed before a bill is abandoned as non-convergent
    pub max_rounds: u32,

    pub proposer_selection: ProposerSelection,

    pub median_reference: MedianReference,

    /// Clamp drawn ideal points into `[lo, hi]`
    pub policy_bounds: Option<(f64, f64)>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100_000,
            proposer_selection: ProposerSelection::EachRound,
            median_reference: MedianReference::Chamber,
            policy_bounds: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.max_rounds == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_rounds must be > 0".to_string(),
            ));
        }

        if let MedianReference::Fixed(point) = self.median_reference {
            if !point.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "fixed median reference must be finite, got {}",
                    point
                )));
            }
        }

        if let Some((lo, hi)) = self.policy_bounds {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(SimulationError::InvalidConfig(format!(
                    "policy bounds must satisfy lo < hi, got ({}, {})",
                    lo, hi
                )));
            }
        }

        Ok(())
    }
}
