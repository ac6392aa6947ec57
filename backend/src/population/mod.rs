//! Legislator population generation.
//!
//! Builds the chamber for one bill: majority members first, then minority
//! members, each ideal point drawn independently from N(mean, std_dev). All
//! generation is deterministic based on the RNG seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same parties → same chamber
//! 2. **Fresh per bill**: Every run generates its own population
//! 3. **Degenerate inputs**: A size-0 party is empty; a zero spread puts
//!    every member exactly at the party mean
//!
//! # Example
//!
//! ```
//! use legislative_bargaining_core_rs::orchestrator::ParameterSet;
//! use legislative_bargaining_core_rs::population::PopulationGenerator;
//! use legislative_bargaining_core_rs::rng::RngManager;
//!
//! let params = ParameterSet::default();
//! let mut rng = RngManager::new(42);
//! let population = PopulationGenerator::new()
//!     .generate(&params.majority_party(), &params.minority_party(), &mut rng)
//!     .unwrap();
//!
//! assert_eq!(population.len(), 101);
//! assert!(population.median_ideal().is_some());
//! ```

use crate::models::{Legislator, PartyAffiliation, PartyConfig};
use crate::orchestrator::config::validate_spread;
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;

/// Draws legislator ideal points for both parties.
#[derive(Debug, Clone, Default)]
pub struct PopulationGenerator {
    /// Clamp drawn ideal points into `[lo, hi]`
    policy_bounds: Option<(f64, f64)>,
}

impl PopulationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy_bounds(mut self, bounds: Option<(f64, f64)>) -> Self {
        self.policy_bounds = bounds;
        self
    }

    /// Generate the full chamber.
    ///
    /// Ids are assigned `0..n` with majority members first.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if a party's mean is not finite or its standard
    /// deviation is negative. Empty parties are not an error here.
    pub fn generate(
        &self,
        majority: &PartyConfig,
        minority: &PartyConfig,
        rng: &mut RngManager,
    ) -> Result<Population, SimulationError> {
        let mut legislators = self.generate_party(majority, 0, rng)?;
        let minority_members = self.generate_party(minority, legislators.len(), rng)?;
        legislators.extend(minority_members);

        Ok(Population::new(legislators))
    }

    /// Generate one party's members with ids starting at `first_id`.
    pub fn generate_party(
        &self,
        party: &PartyConfig,
        first_id: usize,
        rng: &mut RngManager,
    ) -> Result<Vec<Legislator>, SimulationError> {
        validate_spread(party)?;

        let members = (0..party.size)
            .map(|offset| {
                let ideal = self.clamp(rng.normal(party.mean, party.std_dev));
                Legislator::new(first_id + offset, party.affiliation, ideal, party.schedule)
            })
            .collect();

        Ok(members)
    }

    fn clamp(&self, ideal: f64) -> f64 {
        match self.policy_bounds {
            Some((lo, hi)) => ideal.clamp(lo, hi),
            None => ideal,
        }
    }
}

/// The chamber for one bill.
///
/// Owned by a single run and discarded when it ends.
#[derive(Debug, Clone)]
pub struct Population {
    legislators: Vec<Legislator>,

    /// Ideal points in ascending order (fixed for the population's lifetime)
    sorted_ideals: Vec<f64>,
}

impl Population {
    pub fn new(legislators: Vec<Legislator>) -> Self {
        let mut sorted_ideals: Vec<f64> = legislators.iter().map(|l| l.ideal()).collect();
        sorted_ideals.sort_by(|a, b| a.total_cmp(b));

        Self {
            legislators,
            sorted_ideals,
        }
    }

    pub fn len(&self) -> usize {
        self.legislators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legislators.is_empty()
    }

    pub fn legislators(&self) -> &[Legislator] {
        &self.legislators
    }

    /// Legislator at `index` (equal to its id for generated chambers)
    pub fn get(&self, index: usize) -> Option<&Legislator> {
        self.legislators.get(index)
    }

    pub fn party_members(
        &self,
        affiliation: PartyAffiliation,
    ) -> impl Iterator<Item = &Legislator> + '_ {
        self.legislators
            .iter()
            .filter(move |l| l.party() == affiliation)
    }

    pub fn party_size(&self, affiliation: PartyAffiliation) -> usize {
        self.party_members(affiliation).count()
    }

    /// Median ideal point of the chamber.
    ///
    /// Odd chambers use the middle member; even chambers the midpoint of
    /// the two middle members. `None` for an empty chamber.
    pub fn median_ideal(&self) -> Option<f64> {
        let n = self.sorted_ideals.len();
        if n == 0 {
            return None;
        }
        if n % 2 == 1 {
            Some(self.sorted_ideals[n / 2])
        } else {
            Some((self.sorted_ideals[n / 2 - 1] + self.sorted_ideals[n / 2]) / 2.0)
        }
    }

    /// Count yeas on `proposal`. The proposer (seat `proposer_index`) always
    /// votes for their own proposal.
    pub fn tally(&self, proposal: f64, proposer_index: usize) -> usize {
        self.legislators
            .iter()
            .enumerate()
            .filter(|(seat, l)| *seat == proposer_index || l.accepts(proposal))
            .count()
    }

    /// Grow every legislator's tolerance after a failed vote.
    pub fn apply_fatigue(&mut self) {
        for legislator in &mut self.legislators {
            legislator.apply_fatigue();
        }
    }
}
