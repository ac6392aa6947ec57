//! Bill outcome records
//!
//! A [`BillOutcome`] is the immutable result of one fully resolved bill:
//! the first proposal, the passed proposal, how many votes it took and the
//! parameters that produced it. [`OutcomeRow`] flattens it into the column
//! layout consumed by downstream regression and plotting tooling.

use crate::orchestrator::config::ParameterSet;
use serde::{Deserialize, Serialize};

/// Terminal vote of a bill, as observed by the voting engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Passage {
    /// First proposal made for the bill
    pub initial_value: f64,

    /// Proposal that passed
    pub final_value: f64,

    /// Votes taken, including the passing one (>= 1)
    pub rounds: u32,

    pub yeas: usize,
    pub nays: usize,
}

/// Result of one simulated bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOutcome {
    pub initial_value: f64,
    pub final_value: f64,
    pub rounds: u32,
    pub yeas: usize,
    pub nays: usize,

    pub majority_size: usize,
    pub minority_size: usize,

    /// Gap between the party means
    pub median_distance: f64,

    pub majority_std_dev: f64,
    pub minority_std_dev: f64,
    pub majority_fatigue: f64,
    pub minority_fatigue: f64,

    /// Seed the run was started from
    pub seed: u64,
}

impl BillOutcome {
    /// Assemble the outcome of a passed bill. Pure data assembly.
    pub fn record(params: &ParameterSet, passage: &Passage, seed: u64) -> Self {
        let majority = params.majority_party();
        let minority = params.minority_party();

        Self {
            initial_value: passage.initial_value,
            final_value: passage.final_value,
            rounds: passage.rounds,
            yeas: passage.yeas,
            nays: passage.nays,
            majority_size: majority.size,
            minority_size: minority.size,
            median_distance: params.median_distance(),
            majority_std_dev: majority.std_dev,
            minority_std_dev: minority.std_dev,
            majority_fatigue: majority.schedule.fatigue_increment,
            minority_fatigue: minority.schedule.fatigue_increment,
            seed,
        }
    }

    /// Flatten into a table row with the given 1-based run index.
    pub fn to_row(&self, run: usize, config_hash: &str) -> OutcomeRow {
        OutcomeRow {
            run,
            majority_size: self.majority_size,
            minority_size: self.minority_size,
            median_distance: self.median_distance,
            initial_value: self.initial_value,
            final_value: self.final_value,
            rounds: self.rounds,
            yeas: self.yeas,
            majority_std_dev: self.majority_std_dev,
            majority_fatigue: self.majority_fatigue,
            minority_std_dev: self.minority_std_dev,
            minority_fatigue: self.minority_fatigue,
            seed: self.seed,
            config_hash: config_hash.to_string(),
        }
    }
}

/// One row of the results table.
///
/// Field names serialize to the column headers the analysis scripts expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    #[serde(rename = "Run")]
    pub run: usize,
    #[serde(rename = "Majority Party Size")]
    pub majority_size: usize,
    #[serde(rename = "Minority Party Size")]
    pub minority_size: usize,
    #[serde(rename = "Distance between Medians")]
    pub median_distance: f64,
    #[serde(rename = "Initial Value")]
    pub initial_value: f64,
    #[serde(rename = "Final Value")]
    pub final_value: f64,
    #[serde(rename = "Number of Votes")]
    pub rounds: u32,
    #[serde(rename = "Yeas")]
    pub yeas: usize,
    #[serde(rename = "Majority St. Dev.")]
    pub majority_std_dev: f64,
    #[serde(rename = "Majority Round Adjustment")]
    pub majority_fatigue: f64,
    #[serde(rename = "Minority St. Dev.")]
    pub minority_std_dev: f64,
    #[serde(rename = "Minority Round Adjustment")]
    pub minority_fatigue: f64,
    #[serde(rename = "Seed")]
    pub seed: u64,
    #[serde(rename = "Config")]
    pub config_hash: String,
}
