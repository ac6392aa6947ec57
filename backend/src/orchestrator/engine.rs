//! Voting Engine
//!
//! Resolves one bill by repeated voting:
//!
//! ```text
//! Proposing → Tallying → Passed
//!                 ↓
//!              Failed → Proposing
//!                 ↓
//!             Abandoned   (max_rounds reached)
//! ```
//!
//! - **Proposing**: pick a proposer uniformly from the chamber and ask the
//!   proposal strategy for a policy point. The first one is the bill's
//!   initial value.
//! - **Tallying**: every legislator votes under their current tolerance; the
//!   proposer always votes yea. The bill passes when the yea share exceeds
//!   the passage threshold (or the vote is unanimous).
//! - **Failed**: every legislator's tolerance grows by its fatigue increment.
//!
//! Rounds are strictly sequential: each depends on the tolerances left by
//! the previous one.
//!
//! # Example
//!
//! ```rust
//! use legislative_bargaining_core_rs::orchestrator::{EngineConfig, ParameterSet, VotingEngine};
//!
//! let mut engine = VotingEngine::new(ParameterSet::default(), EngineConfig::default(), 12345).unwrap();
//! let outcome = engine.run_to_passage().unwrap();
//!
//! assert!(outcome.rounds >= 1);
//! assert_eq!(engine.votes_taken(), outcome.rounds);
//! ```

use crate::models::outcome::Passage;
use crate::models::{BillOutcome, EventLog, PartyAffiliation, VoteEvent};
use crate::orchestrator::config::{
    validate_schedule, EngineConfig, MedianReference, ParameterSet, ProposerSelection,
};
use crate::population::{Population, PopulationGenerator};
use crate::proposal::{NearestToMedian, ProposalStrategy};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Empty electorate: no legislator can propose or vote")]
    EmptyElectorate,

    #[error("No passage after {rounds} votes (max_rounds = {max_rounds}); fatigue increment too small for the policy space")]
    NonConvergence { rounds: u32, max_rounds: u32 },

    #[error("Illegal round transition: {from} -> {to}")]
    IllegalTransition { from: RoundPhase, to: RoundPhase },

    #[error("Bill already resolved")]
    AlreadyResolved,
}

/// State of the voting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Proposing,
    Tallying,
    Failed,
    /// Terminal: the bill passed
    Passed,
    /// Terminal: round cap reached without passage
    Abandoned,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Abandoned)
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposing => write!(f, "Proposing"),
            Self::Tallying => write!(f, "Tallying"),
            Self::Failed => write!(f, "Failed"),
            Self::Passed => write!(f, "Passed"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

fn is_legal_transition(from: RoundPhase, to: RoundPhase) -> bool {
    use RoundPhase::*;

    matches!(
        (from, to),
        (Proposing, Tallying)
            | (Tallying, Passed)
            | (Tallying, Failed)
            | (Failed, Proposing)
            | (Failed, Abandoned)
    )
}

/// Result of one vote
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    /// Vote number (1-based)
    pub round: u32,
    pub proposer_id: usize,
    pub proposer_party: PartyAffiliation,
    pub proposal: f64,
    pub yeas: usize,
    pub nays: usize,
    pub passed: bool,
}

/// Does `yeas` out of `chamber` clear the threshold?
///
/// A yea share strictly above `threshold`, or a unanimous vote (so a
/// threshold of 1.0 means unanimity). The share is compared directly;
/// `threshold * chamber` rounds below the exact product for thresholds such
/// as 0.57.
pub fn passes(yeas: usize, chamber: usize, threshold: f64) -> bool {
    chamber > 0 && (yeas == chamber || yeas as f64 / chamber as f64 > threshold)
}

/// Resolves a single bill.
///
/// Owns the chamber, its tolerances and the RNG for the run; nothing is
/// shared with other runs.
pub struct VotingEngine {
    params: ParameterSet,

    seed: u64,

    max_rounds: u32,

    proposer_selection: ProposerSelection,

    population: Population,

    rng: RngManager,

    strategy: Box<dyn ProposalStrategy>,

    /// Point proposers steer toward (chamber median unless fixed)
    reference: f64,

    phase: RoundPhase,

    /// Votes taken so far; also the number of failed votes while not passed
    votes_taken: u32,

    /// Proposer kept for the whole bill under `FixedPerBill`
    fixed_proposer: Option<usize>,

    current_proposer: Option<usize>,

    current_proposal: Option<f64>,

    initial_proposal: Option<f64>,

    last_round: Option<RoundResult>,

    event_log: EventLog,

    outcome: Option<BillOutcome>,
}

impl VotingEngine {
    /// Validate the configuration, seed the RNG and generate a fresh chamber.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for any rejected parameter; nothing is drawn from
    /// the RNG before validation succeeds.
    pub fn new(
        params: ParameterSet,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        config.validate()?;

        let mut rng = RngManager::new(seed);
        let population = PopulationGenerator::new()
            .with_policy_bounds(config.policy_bounds)
            .generate(&params.majority_party(), &params.minority_party(), &mut rng)?;

        Self::assemble(params, config, population, rng, seed)
    }

    /// Run over a prebuilt chamber instead of generating one.
    ///
    /// Party sizes in `params` are informational only; the passage threshold
    /// and reporting fields are still taken from it.
    ///
    /// # Errors
    ///
    /// - `EmptyElectorate` if `population` has no members
    /// - `InvalidConfig` for a threshold outside (0, 1], a legislator with a
    ///   negative tolerance or non-positive fatigue increment, or ids that
    ///   are not exactly `0..len` in seat order
    pub fn with_population(
        params: ParameterSet,
        config: EngineConfig,
        population: Population,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if !(params.passage_threshold > 0.0 && params.passage_threshold <= 1.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "passage_threshold must be in (0, 1], got {}",
                params.passage_threshold
            )));
        }
        for (seat, legislator) in population.legislators().iter().enumerate() {
            if legislator.id() != seat {
                return Err(SimulationError::InvalidConfig(format!(
                    "legislator in seat {} has id {}; ids must be 0..{}",
                    seat,
                    legislator.id(),
                    population.len()
                )));
            }
            validate_schedule(legislator.party(), &legislator.schedule())?;
        }

        Self::assemble(params, config, population, RngManager::new(seed), seed)
    }

    fn assemble(
        params: ParameterSet,
        config: EngineConfig,
        population: Population,
        rng: RngManager,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        if population.is_empty() {
            return Err(SimulationError::EmptyElectorate);
        }

        let reference = match config.median_reference {
            MedianReference::Chamber => population
                .median_ideal()
                .ok_or(SimulationError::EmptyElectorate)?,
            MedianReference::Fixed(point) => point,
        };

        Ok(Self {
            params,
            seed,
            max_rounds: config.max_rounds,
            proposer_selection: config.proposer_selection,
            population,
            rng,
            strategy: Box::new(NearestToMedian),
            reference,
            phase: RoundPhase::Proposing,
            votes_taken: 0,
            fixed_proposer: None,
            current_proposer: None,
            current_proposal: None,
            initial_proposal: None,
            last_round: None,
            event_log: EventLog::new(),
            outcome: None,
        })
    }

    /// Replace the proposal strategy (default: [`NearestToMedian`]).
    pub fn with_strategy(mut self, strategy: Box<dyn ProposalStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn votes_taken(&self) -> u32 {
        self.votes_taken
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn reference_point(&self) -> f64 {
        self.reference
    }

    pub fn initial_proposal(&self) -> Option<f64> {
        self.initial_proposal
    }

    pub fn current_proposal(&self) -> Option<f64> {
        self.current_proposal
    }

    pub fn last_round(&self) -> Option<&RoundResult> {
        self.last_round.as_ref()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Outcome, once the bill has passed
    pub fn outcome(&self) -> Option<&BillOutcome> {
        self.outcome.as_ref()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ========================================================================
    // State machine
    // ========================================================================

    fn transition(&mut self, to: RoundPhase) -> Result<(), SimulationError> {
        if !is_legal_transition(self.phase, to) {
            return Err(SimulationError::IllegalTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// Advance one transition and return the new phase.
    ///
    /// # Errors
    ///
    /// - `NonConvergence` when a failed vote hits `max_rounds` (the engine
    ///   is left `Abandoned`)
    /// - `AlreadyResolved` when called in a terminal phase
    pub fn step(&mut self) -> Result<RoundPhase, SimulationError> {
        match self.phase {
            RoundPhase::Proposing => self.propose()?,
            RoundPhase::Tallying => self.tally()?,
            RoundPhase::Failed => self.fatigue()?,
            RoundPhase::Passed | RoundPhase::Abandoned => {
                return Err(SimulationError::AlreadyResolved)
            }
        }
        Ok(self.phase)
    }

    fn select_proposer(&mut self) -> Result<usize, SimulationError> {
        if let (ProposerSelection::FixedPerBill, Some(index)) =
            (self.proposer_selection, self.fixed_proposer)
        {
            return Ok(index);
        }

        let index = self
            .rng
            .choose_index(self.population.len())
            .ok_or(SimulationError::EmptyElectorate)?;

        if self.proposer_selection == ProposerSelection::FixedPerBill {
            self.fixed_proposer = Some(index);
        }
        Ok(index)
    }

    fn propose(&mut self) -> Result<(), SimulationError> {
        let index = self.select_proposer()?;
        let proposer = self
            .population
            .get(index)
            .ok_or(SimulationError::EmptyElectorate)?;
        let proposal = self.strategy.propose(proposer, self.reference);

        self.event_log.log(VoteEvent::Proposed {
            round: self.votes_taken + 1,
            proposer_id: proposer.id(),
            proposer_party: proposer.party(),
            proposer_ideal: proposer.ideal(),
            proposal,
        });

        if self.initial_proposal.is_none() {
            self.initial_proposal = Some(proposal);
        }
        self.current_proposer = Some(index);
        self.current_proposal = Some(proposal);

        self.transition(RoundPhase::Tallying)
    }

    fn tally(&mut self) -> Result<(), SimulationError> {
        let (index, proposal) = match (self.current_proposer, self.current_proposal) {
            (Some(index), Some(proposal)) => (index, proposal),
            _ => {
                return Err(SimulationError::IllegalTransition {
                    from: RoundPhase::Proposing,
                    to: RoundPhase::Tallying,
                })
            }
        };
        let proposer = self
            .population
            .get(index)
            .ok_or(SimulationError::EmptyElectorate)?;
        let (proposer_id, proposer_party) = (proposer.id(), proposer.party());

        let chamber = self.population.len();
        let yeas = self.population.tally(proposal, index);
        let nays = chamber - yeas;
        let passed = passes(yeas, chamber, self.params.passage_threshold);
        self.votes_taken += 1;
        let round = self.votes_taken;

        debug!(round, proposer_id, proposal, yeas, nays, passed, "vote tallied");
        self.event_log.log(VoteEvent::Tallied {
            round,
            yeas,
            nays,
            passed,
        });
        self.last_round = Some(RoundResult {
            round,
            proposer_id,
            proposer_party,
            proposal,
            yeas,
            nays,
            passed,
        });

        if !passed {
            return self.transition(RoundPhase::Failed);
        }

        let passage = Passage {
            initial_value: self.initial_proposal.unwrap_or(proposal),
            final_value: proposal,
            rounds: round,
            yeas,
            nays,
        };
        self.event_log.log(VoteEvent::Passed {
            round,
            final_value: proposal,
        });
        info!(
            rounds = round,
            initial_value = passage.initial_value,
            final_value = proposal,
            seed = self.seed,
            "bill passed"
        );
        self.outcome = Some(BillOutcome::record(&self.params, &passage, self.seed));

        self.transition(RoundPhase::Passed)
    }

    fn fatigue(&mut self) -> Result<(), SimulationError> {
        if self.votes_taken >= self.max_rounds {
            warn!(
                rounds = self.votes_taken,
                max_rounds = self.max_rounds,
                seed = self.seed,
                "bill abandoned without passage"
            );
            self.transition(RoundPhase::Abandoned)?;
            return Err(SimulationError::NonConvergence {
                rounds: self.votes_taken,
                max_rounds: self.max_rounds,
            });
        }

        self.population.apply_fatigue();

        let party_tolerance = |affiliation| {
            self.population
                .party_members(affiliation)
                .next()
                .map(|l| l.tolerance())
        };
        let event = VoteEvent::FatigueApplied {
            round: self.votes_taken,
            failed_rounds: self.votes_taken,
            majority_tolerance: party_tolerance(PartyAffiliation::Majority),
            minority_tolerance: party_tolerance(PartyAffiliation::Minority),
        };
        self.event_log.log(event);

        self.transition(RoundPhase::Proposing)
    }

    /// Run one complete vote: propose, tally and, on failure, apply fatigue.
    ///
    /// Returns the vote's result; the engine is left in `Proposing` after a
    /// failed vote or `Passed` after a successful one.
    pub fn run_round(&mut self) -> Result<RoundResult, SimulationError> {
        if self.phase.is_terminal() {
            return Err(SimulationError::AlreadyResolved);
        }
        while self.phase != RoundPhase::Tallying {
            self.step()?;
        }
        let phase = self.step()?;
        if phase == RoundPhase::Failed {
            self.step()?;
        }

        self.last_round
            .clone()
            .ok_or(SimulationError::AlreadyResolved)
    }

    /// Vote until the bill passes.
    ///
    /// # Errors
    ///
    /// `NonConvergence` if `max_rounds` votes fail.
    pub fn run_to_passage(&mut self) -> Result<BillOutcome, SimulationError> {
        while !self.phase.is_terminal() {
            self.step()?;
        }

        match &self.outcome {
            Some(outcome) => Ok(outcome.clone()),
            None => Err(SimulationError::NonConvergence {
                rounds: self.votes_taken,
                max_rounds: self.max_rounds,
            }),
        }
    }
}

/// Resolve one bill from scratch: generate a chamber from `seed` and vote
/// until passage.
pub fn run_bill(
    params: &ParameterSet,
    config: &EngineConfig,
    seed: u64,
) -> Result<BillOutcome, SimulationError> {
    VotingEngine::new(params.clone(), config.clone(), seed)?.run_to_passage()
}
