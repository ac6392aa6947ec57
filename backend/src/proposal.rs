//! Proposal strategies
//!
//! A strategy turns the current proposer and the chamber's reference point
//! (normally the median ideal point) into the policy point put to a vote.
//!
//! # Strategy Interface
//!
//! ```rust
//! use legislative_bargaining_core_rs::models::Legislator;
//! use legislative_bargaining_core_rs::proposal::ProposalStrategy;
//!
//! struct ProposeOwnIdeal;
//!
//! impl ProposalStrategy for ProposeOwnIdeal {
//!     fn propose(&self, proposer: &Legislator, _reference: f64) -> f64 {
//!         proposer.ideal()
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "own_ideal"
//!     }
//! }
//! ```

use crate::acceptance;
use crate::models::Legislator;

/// Computes the policy point a proposer puts to the floor.
pub trait ProposalStrategy: Send + Sync {
    fn propose(&self, proposer: &Legislator, reference: f64) -> f64;

    fn name(&self) -> &'static str;
}

/// Propose the point of the proposer's acceptance interval closest to the
/// reference point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestToMedian;

impl ProposalStrategy for NearestToMedian {
    fn propose(&self, proposer: &Legislator, reference: f64) -> f64 {
        nearest_acceptable_point(proposer.ideal(), proposer.tolerance(), reference)
    }

    fn name(&self) -> &'static str {
        "nearest_to_median"
    }
}

/// Point within `[ideal - tolerance, ideal + tolerance]` nearest to `target`.
///
/// Returns `target` itself when the proposer would accept it, otherwise the
/// interval boundary on the target's side. Containment uses the acceptance
/// predicate so the two models agree at the boundary.
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::proposal::nearest_acceptable_point;
///
/// // median inside the interval: propose the median
/// assert_eq!(nearest_acceptable_point(0.5, 0.2, 0.4), 0.4);
/// // median below the interval: lower boundary
/// assert_eq!(nearest_acceptable_point(0.5, 0.1, 0.0), 0.5 - 0.1);
/// // median above the interval: upper boundary
/// assert_eq!(nearest_acceptable_point(-0.5, 0.1, 0.0), -0.5 + 0.1);
/// ```
pub fn nearest_acceptable_point(ideal: f64, tolerance: f64, target: f64) -> f64 {
    if acceptance::accepts(ideal, tolerance, target) {
        target
    } else if target < ideal {
        ideal - tolerance
    } else {
        ideal + tolerance
    }
}
