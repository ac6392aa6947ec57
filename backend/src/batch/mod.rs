//! Batch driver: parameter sweeps over many independent bills.
//!
//! A [`SweepGrid`] lists the parameter sets to study; the [`BatchDriver`]
//! runs `repetitions` bills per grid point on a rayon worker pool and
//! collects the outcomes into a [`BatchReport`].
//!
//! Runs share no mutable state: each one builds its own chamber from its
//! own seed. Repetition `r` of every grid point uses seed `base_seed + r`,
//! and results are reported in (grid point, repetition) order whatever the
//! worker count.
//!
//! # Example
//!
//! ```rust
//! use legislative_bargaining_core_rs::batch::{BatchConfig, BatchDriver, SweepGrid};
//! use legislative_bargaining_core_rs::orchestrator::ParameterSet;
//!
//! let grid = SweepGrid::party_size(ParameterSet::default(), 101, &[51, 61, 71]);
//! let driver = BatchDriver::new(BatchConfig {
//!     repetitions: 5,
//!     ..BatchConfig::default()
//! })
//! .unwrap();
//!
//! let report = driver.run(&grid);
//! assert_eq!(report.outcomes().len(), 15);
//! assert!(report.failures().is_empty());
//! ```

use crate::models::{BillOutcome, OutcomeRow};
use crate::orchestrator::{run_bill, EngineConfig, ParameterSet, SimulationError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Write;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by the batch driver itself (never by individual runs).
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid batch config: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// Single configuration
    Fixed,
    /// Majority size within a fixed-size chamber
    MajoritySize,
    /// Distance between party means
    MedianDistance,
    /// Intra-party standard deviation (both parties)
    Homogeneity,
}

/// Ordered list of parameter sets to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub axis: SweepAxis,
    pub points: Vec<ParameterSet>,
}

impl SweepGrid {
    pub fn single(params: ParameterSet) -> Self {
        Self {
            axis: SweepAxis::Fixed,
            points: vec![params],
        }
    }

    /// Vary the majority size; the minority takes the remaining `seats`.
    ///
    /// A majority larger than the chamber yields an empty minority, which
    /// the engine rejects as a configuration error for that point.
    pub fn party_size(base: ParameterSet, seats: usize, majority_sizes: &[usize]) -> Self {
        let points = majority_sizes
            .iter()
            .map(|&size| ParameterSet {
                majority_size: size,
                minority_size: seats.saturating_sub(size),
                ..base.clone()
            })
            .collect();

        Self {
            axis: SweepAxis::MajoritySize,
            points,
        }
    }

    /// Vary the gap between party means, placing them at `±distance / 2`.
    pub fn median_distance(base: ParameterSet, distances: &[f64]) -> Self {
        let points = distances
            .iter()
            .map(|&distance| ParameterSet {
                majority_mean: distance / 2.0,
                minority_mean: -distance / 2.0,
                ..base.clone()
            })
            .collect();

        Self {
            axis: SweepAxis::MedianDistance,
            points,
        }
    }

    /// Vary both parties' standard deviation together.
    pub fn homogeneity(base: ParameterSet, std_devs: &[f64]) -> Self {
        let points = std_devs
            .iter()
            .map(|&sd| ParameterSet {
                majority_stddev: sd,
                minority_stddev: sd,
                ..base.clone()
            })
            .collect();

        Self {
            axis: SweepAxis::Homogeneity,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Evenly spaced values in `[start, stop)`.
///
/// Computed as `start + i * step` so long ranges do not accumulate error.
/// Empty when `step <= 0` or `start >= stop`.
///
/// # Example
/// ```
/// use legislative_bargaining_core_rs::batch::stepped_range;
///
/// assert_eq!(stepped_range(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn stepped_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || start.partial_cmp(&stop) != Some(Ordering::Less) {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count)
        .map(|i| start + i as f64 * step)
        .filter(|x| *x < stop)
        .collect()
}

/// Batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Bills per grid point
    pub repetitions: usize,

    /// Seed of repetition 0; repetition `r` uses `base_seed + r`
    pub base_seed: u64,

    /// Worker threads (`None` = available hardware parallelism)
    pub workers: Option<usize>,

    pub engine: EngineConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            repetitions: 100,
            base_seed: 0,
            workers: None,
            engine: EngineConfig::default(),
        }
    }
}

/// A grid point or single run that produced no outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub point_index: usize,

    /// `None` when the whole point was rejected before running
    pub repetition: Option<usize>,

    pub fingerprint: String,

    pub error: SimulationError,
}

/// Outcomes of one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointResult {
    pub point_index: usize,
    pub parameters: ParameterSet,
    pub fingerprint: String,
    pub outcomes: Vec<BillOutcome>,
}

impl PointResult {
    /// Mean number of votes to passage, `None` if nothing passed.
    pub fn mean_rounds(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            return None;
        }
        let total: f64 = self.outcomes.iter().map(|o| f64::from(o.rounds)).sum();
        Some(total / self.outcomes.len() as f64)
    }
}

/// Everything a sweep produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    points: Vec<PointResult>,
    failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn points(&self) -> &[PointResult] {
        &self.points
    }

    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// All outcomes in (grid point, repetition) order.
    pub fn outcomes(&self) -> Vec<&BillOutcome> {
        self.points.iter().flat_map(|p| p.outcomes.iter()).collect()
    }

    /// Table rows with a 1-based run index across the whole sweep.
    pub fn rows(&self) -> Vec<OutcomeRow> {
        self.points
            .iter()
            .flat_map(|p| p.outcomes.iter().map(move |o| (p.fingerprint.as_str(), o)))
            .enumerate()
            .map(|(i, (fingerprint, outcome))| outcome.to_row(i + 1, fingerprint))
            .collect()
    }

    /// Write one JSON object per row.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<(), BatchError> {
        for row in self.rows() {
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Fans bills out over a worker pool.
pub struct BatchDriver {
    config: BatchConfig,
    pool: rayon::ThreadPool,
}

impl BatchDriver {
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        if config.repetitions == 0 {
            return Err(BatchError::InvalidConfig(
                "repetitions must be > 0".to_string(),
            ));
        }

        let workers = match config.workers {
            Some(0) => {
                return Err(BatchError::InvalidConfig(
                    "workers must be > 0".to_string(),
                ))
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every grid point `repetitions` times.
    ///
    /// A rejected point or a non-convergent run is recorded as a
    /// [`BatchFailure`]; the sweep always continues.
    pub fn run(&self, grid: &SweepGrid) -> BatchReport {
        let mut report = BatchReport::default();
        let mut jobs = Vec::new();

        for (point_index, params) in grid.points.iter().enumerate() {
            let fingerprint = params.fingerprint();
            let validated = params
                .validate()
                .and_then(|_| self.config.engine.validate());

            if let Err(error) = validated {
                warn!(point_index, %error, "grid point rejected");
                report.failures.push(BatchFailure {
                    point_index,
                    repetition: None,
                    fingerprint,
                    error,
                });
                continue;
            }

            report.points.push(PointResult {
                point_index,
                parameters: params.clone(),
                fingerprint,
                outcomes: Vec::new(),
            });
            let slot = report.points.len() - 1;
            jobs.extend((0..self.config.repetitions).map(|rep| (slot, rep)));
        }

        info!(
            points = grid.len(),
            runs = jobs.len(),
            workers = self.worker_count(),
            "starting sweep"
        );

        let engine = &self.config.engine;
        let base_seed = self.config.base_seed;
        let points = &report.points;
        let results: Vec<(usize, usize, Result<BillOutcome, SimulationError>)> =
            self.pool.install(|| {
                jobs.into_par_iter()
                    .map(|(slot, rep)| {
                        let seed = base_seed.wrapping_add(rep as u64);
                        (slot, rep, run_bill(&points[slot].parameters, engine, seed))
                    })
                    .collect()
            });

        for (slot, rep, result) in results {
            match result {
                Ok(outcome) => report.points[slot].outcomes.push(outcome),
                Err(error) => {
                    let point = &report.points[slot];
                    warn!(point_index = point.point_index, rep, %error, "run failed");
                    report.failures.push(BatchFailure {
                        point_index: point.point_index,
                        repetition: Some(rep),
                        fingerprint: point.fingerprint.clone(),
                        error,
                    });
                }
            }
        }

        for point in &report.points {
            info!(
                point_index = point.point_index,
                runs = point.outcomes.len(),
                mean_rounds = point.mean_rounds().unwrap_or(f64::NAN),
                "grid point complete"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_size_grid_fills_chamber() {
        let grid = SweepGrid::party_size(ParameterSet::default(), 101, &[51, 75, 99]);
        assert_eq!(grid.axis, SweepAxis::MajoritySize);
        for point in &grid.points {
            assert_eq!(point.chamber_size(), 101);
        }
        assert_eq!(grid.points[2].minority_size, 2);
    }

    #[test]
    fn test_distance_grid_symmetric() {
        let grid = SweepGrid::median_distance(ParameterSet::default(), &[0.0, 2.0]);
        assert_eq!(grid.points[1].majority_mean, 1.0);
        assert_eq!(grid.points[1].minority_mean, -1.0);
        assert_eq!(grid.points[1].median_distance(), 2.0);
    }

    #[test]
    fn test_stepped_range_edges() {
        assert!(stepped_range(1.0, 1.0, 0.1).is_empty());
        assert!(stepped_range(0.0, 1.0, 0.0).is_empty());
        assert_eq!(stepped_range(0.01, 1.0, 0.02).len(), 50);
        assert_eq!(stepped_range(0.0, 2.05, 0.05).len(), 41);
    }

    #[test]
    fn test_stepped_range_nan_inputs() {
        assert!(stepped_range(0.0, 1.0, f64::NAN).is_empty());
        assert!(stepped_range(f64::NAN, 1.0, 0.1).is_empty());
        assert!(stepped_range(0.0, f64::NAN, 0.1).is_empty());
        assert!(stepped_range(0.0, 1.0, -0.1).is_empty());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = BatchDriver::new(BatchConfig {
            workers: Some(0),
            ..BatchConfig::default()
        });
        assert!(matches!(result, Err(BatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let result = BatchDriver::new(BatchConfig {
            repetitions: 0,
            ..BatchConfig::default()
        });
        assert!(matches!(result, Err(BatchError::InvalidConfig(_))));
    }
}
