//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same legislators, same proposers, same round count. Each
//! bill-resolution run owns its own `RngManager`, so parallel runs never
//! contend on generator state.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let seat = rng.choose_index(101); // Some(0..101)
/// let ideal = rng.normal(0.5, 0.1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Arguments
    /// * `seed` - Initial seed value (u64)
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Pick an index uniformly from `0..len`.
    ///
    /// Returns `None` when `len == 0` instead of panicking, so callers can
    /// surface an empty electorate as a configuration error.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next() % len as u64) as usize)
    }

    /// Get current RNG state (for replay)
    ///
    /// # Example
    /// ```
    /// use legislative_bargaining_core_rs::RngManager;
    ///
    /// let rng = RngManager::new(12345);
    /// let state = rng.get_state();
    ///
    /// // Later, can recreate RNG from this state
    /// let rng2 = RngManager::new(state);
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// # Example
    /// ```
    /// use legislative_bargaining_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let probability = rng.next_f64();
    /// assert!(probability >= 0.0 && probability < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) by dividing by 2^64
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample from the standard normal distribution (Box-Muller transform).
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Sample from N(mean, std_dev).
    ///
    /// A zero standard deviation returns `mean` exactly. The draw is still
    /// consumed so that the sequence stays aligned regardless of spread.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z = self.standard_normal();
        if std_dev == 0.0 {
            mean
        } else {
            mean + std_dev * z
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_choose_index_empty_is_none() {
        let mut rng = RngManager::new(7);
        assert_eq!(rng.choose_index(0), None);
        assert_eq!(rng.choose_index(1), Some(0));
    }

    #[test]
    fn test_normal_zero_sd_returns_mean() {
        let mut rng = RngManager::new(99);
        for _ in 0..100 {
            assert_eq!(rng.normal(0.5, 0.0), 0.5);
        }
    }

    #[test]
    fn test_standard_normal_is_finite() {
        let mut rng = RngManager::new(1);
        for _ in 0..10_000 {
            assert!(rng.standard_normal().is_finite());
        }
    }

    #[test]
    fn test_normal_sample_moments() {
        let mut rng = RngManager::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(1.0, 0.5)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!((mean - 1.0).abs() < 0.02, "mean {} too far from 1.0", mean);
        assert!((var.sqrt() - 0.5).abs() < 0.02, "sd {} too far from 0.5", var.sqrt());
    }
}
