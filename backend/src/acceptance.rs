//! Acceptance model
//!
//! A legislator votes yea iff the proposal lies within their tolerance of
//! their ideal point. Pure: called once per legislator per vote.

/// `|ideal - proposal| <= tolerance`.
///
/// With `tolerance == 0.0` only a proposal exactly at the ideal point is
/// accepted. Any NaN input rejects.
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::acceptance::accepts;
///
/// assert!(accepts(0.5, 0.1, 0.45));
/// assert!(!accepts(0.5, 0.1, 0.3));
/// assert!(accepts(0.5, 0.0, 0.5));
/// ```
pub fn accepts(ideal: f64, tolerance: f64, proposal: f64) -> bool {
    (ideal - proposal).abs() <= tolerance
}
