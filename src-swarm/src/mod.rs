//! Population based black-box optimizers in pure Rust using ndarray
//!
//! Four swarm heuristics sharing one skeleton: a fixed population of
//! candidates is moved by stochastic update rules for a fixed number of
//! iterations while the best position found is tracked.
//!
//! - Particle Swarm Optimization ([`pso`]): inertia + cognitive + social velocity blend
//! - Artificial Bee Colony ([`abc`]): employed/onlooker roles with forced scouting
//! - Ant Colony Optimization ([`aco`]): pheromone field over discretized coordinates
//!   with a derivative-free local search
//! - Bat Algorithm ([`bat`]): frequency tuned velocity, loudness and pulse rate
//!
//! Every optimizer owns an explicit `StdRng` seeded from its configuration, so a
//! fixed seed reproduces a run bit for bit. Box bounds are used to draw the
//! initial population; only the bee colony's scout step draws inside the box
//! again later, all other moves may leave it.
//!
//! ```
//! use ndarray::Array1;
//! use swarmopt::{particle_swarm, PsoConfigBuilder};
//!
//! let sphere = |x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>();
//! let config = PsoConfigBuilder::new().seed(7).popsize(30).maxiter(100).w(0.7).c1(1.5).c2(1.5).build();
//! let report = particle_swarm(&sphere, &[(-5.0, 5.0); 2], config).unwrap();
//! assert_eq!(report.x.len(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub mod error;
mod init_random;
pub mod local_search;
pub mod parallel_eval;
pub mod recorder;
pub mod run_recorded;

pub mod abc;
pub mod aco;
pub mod bat;
pub mod pso;

pub use abc::{AbcConfig, AbcConfigBuilder, Bee, BeeColony, OnlookerSelection, bee_colony};
pub use aco::{AcoConfig, AcoConfigBuilder, Ant, AntColony, PheromoneField, ant_colony};
pub use bat::{Bat, BatAlgorithm, BatConfig, BatConfigBuilder, Cloud, bat_algorithm};
pub use error::{Result, SwarmError};
pub use local_search::{LocalResult, LocalSearch, NelderMead, NoLocalSearch, default_local_search};
pub use parallel_eval::ParallelConfig;
pub use pso::{Particle, ParticleSwarm, PsoConfig, PsoConfigBuilder, Swarm, particle_swarm};
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use run_recorded::run_recorded;

#[cfg(feature = "nlopt")]
pub use local_search::NloptLocal;

/// Index and value of the smallest entry; the first one wins ties.
pub(crate) fn argmin<I>(values: I) -> Option<(usize, f64)>
where
	I: IntoIterator<Item = f64>,
{
	let mut best: Option<(usize, f64)> = None;
	for (i, val) in values.into_iter().enumerate() {
		match best {
			Some((_, best_v)) if val >= best_v || val.is_nan() => {}
			Some(_) => best = Some((i, val)),
			None => best = Some((i, val)),
		}
	}
	best
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(s) => StdRng::seed_from_u64(s),
		None => {
			let mut thread_rng = rand::rng();
			StdRng::from_rng(&mut thread_rng)
		}
	}
}

/// Check `lower`/`upper` describe a non-empty box and return its dimensionality.
pub(crate) fn validate_bounds(lower: &Array1<f64>, upper: &Array1<f64>) -> Result<usize> {
	if lower.len() != upper.len() {
		return Err(SwarmError::BoundsMismatch { lower: lower.len(), upper: upper.len() });
	}
	if lower.is_empty() {
		return Err(SwarmError::ZeroDimension);
	}
	for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
		if !(hi >= lo) || !lo.is_finite() || !hi.is_finite() {
			return Err(SwarmError::InvertedBound { index, lower: lo, upper: hi });
		}
	}
	Ok(lower.len())
}

/// Split `(lower, upper)` pairs into two arrays.
pub fn bounds_to_arrays(bounds: &[(f64, f64)]) -> Result<(Array1<f64>, Array1<f64>)> {
	let lower: Array1<f64> = bounds.iter().map(|b| b.0).collect();
	let upper: Array1<f64> = bounds.iter().map(|b| b.1).collect();
	validate_bounds(&lower, &upper)?;
	Ok((lower, upper))
}

pub(crate) fn require_population(size: usize, what: &'static str) -> Result<()> {
	if size == 0 { Err(SwarmError::EmptyPopulation { what }) } else { Ok(()) }
}

pub(crate) fn require_finite(value: f64, name: &'static str) -> Result<()> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(SwarmError::InvalidParameter { name, reason: format!("must be finite, got {}", value) })
	}
}

/// Objective wrapper counting evaluations
pub(crate) struct Objective<'a, F> {
	func: &'a F,
	pub(crate) nfev: usize,
}

impl<'a, F> Objective<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	pub(crate) fn new(func: &'a F) -> Self {
		Self { func, nfev: 0 }
	}

	pub(crate) fn eval(&mut self, x: &Array1<f64>) -> f64 {
		self.nfev += 1;
		(self.func)(x)
	}
}

/// Information passed to the callback after each iteration
#[derive(Debug, Clone)]
pub struct SwarmIntermediate {
	/// Incumbent position
	pub x: Array1<f64>,
	/// Incumbent cost, as ranked by the algorithm
	pub fun: f64,
	pub iter: usize,
}

/// Action returned by callback
pub enum CallbackAction {
	Continue,
	Stop,
}

/// Per-iteration callback, may stop the run early
pub type Callback = Box<dyn FnMut(&SwarmIntermediate) -> CallbackAction>;

pub(crate) fn notify(callback: &mut Option<Callback>, x: &Array1<f64>, fun: f64, iter: usize) -> CallbackAction {
	match callback.as_mut() {
		Some(cb) => cb(&SwarmIntermediate { x: x.clone(), fun, iter }),
		None => CallbackAction::Continue,
	}
}

pub(crate) const STOPPED_BY_CALLBACK: &str = "Optimization stopped by callback";

/// Result of an optimizer run
#[derive(Clone, Serialize, Deserialize)]
pub struct SwarmReport {
	/// Best position found, always of the problem's dimensionality
	pub x: Array1<f64>,
	/// Cost paired with `x`. For the ant colony this is the colony's
	/// negated score `-f(x)`, for the other algorithms `f(x)`.
	pub fun: f64,
	pub success: bool,
	pub message: String,
	/// Iterations run after initialisation
	pub nit: usize,
	/// Objective evaluations, local search included
	pub nfev: usize,
}

impl fmt::Debug for SwarmReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SwarmReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("success", &self.success)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.finish()
	}
}

/// The four heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
	ParticleSwarm,
	BeeColony,
	AntColony,
	BatAlgorithm,
}

impl FromStr for Algorithm {
	type Err = String;
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let t = s.to_lowercase();
		match t.as_str() {
			"pso" | "particle-swarm" | "particle_swarm" | "swarm" => Ok(Algorithm::ParticleSwarm),
			"abc" | "bee-colony" | "bee_colony" | "bees" => Ok(Algorithm::BeeColony),
			"aco" | "ant-colony" | "ant_colony" | "ants" => Ok(Algorithm::AntColony),
			"ba" | "bat" | "bat-algorithm" | "bat_algorithm" | "bats" => Ok(Algorithm::BatAlgorithm),
			_ => Err(format!("unknown algorithm: {}", s)),
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Algorithm::ParticleSwarm => "pso",
			Algorithm::BeeColony => "abc",
			Algorithm::AntColony => "aco",
			Algorithm::BatAlgorithm => "bat",
		};
		f.write_str(name)
	}
}

impl Algorithm {
	/// Configuration with the algorithm's default hyperparameters
	pub fn default_config(self) -> OptimizerConfig {
		match self {
			Algorithm::ParticleSwarm => OptimizerConfig::ParticleSwarm(PsoConfig::default()),
			Algorithm::BeeColony => OptimizerConfig::BeeColony(AbcConfig::default()),
			Algorithm::AntColony => OptimizerConfig::AntColony(AcoConfig::default()),
			Algorithm::BatAlgorithm => OptimizerConfig::BatAlgorithm(BatConfig::default()),
		}
	}
}

/// Configuration of any of the four optimizers
pub enum OptimizerConfig {
	ParticleSwarm(PsoConfig),
	BeeColony(AbcConfig),
	AntColony(AcoConfig),
	BatAlgorithm(BatConfig),
}

impl OptimizerConfig {
	pub fn algorithm(&self) -> Algorithm {
		match self {
			OptimizerConfig::ParticleSwarm(_) => Algorithm::ParticleSwarm,
			OptimizerConfig::BeeColony(_) => Algorithm::BeeColony,
			OptimizerConfig::AntColony(_) => Algorithm::AntColony,
			OptimizerConfig::BatAlgorithm(_) => Algorithm::BatAlgorithm,
		}
	}

	/// Replace the per-iteration callback
	pub fn set_callback(&mut self, callback: Callback) {
		match self {
			OptimizerConfig::ParticleSwarm(c) => c.callback = Some(callback),
			OptimizerConfig::BeeColony(c) => c.callback = Some(callback),
			OptimizerConfig::AntColony(c) => c.callback = Some(callback),
			OptimizerConfig::BatAlgorithm(c) => c.callback = Some(callback),
		}
	}

	pub fn set_seed(&mut self, seed: u64) {
		match self {
			OptimizerConfig::ParticleSwarm(c) => c.seed = Some(seed),
			OptimizerConfig::BeeColony(c) => c.seed = Some(seed),
			OptimizerConfig::AntColony(c) => c.seed = Some(seed),
			OptimizerConfig::BatAlgorithm(c) => c.seed = Some(seed),
		}
	}
}

impl From<PsoConfig> for OptimizerConfig {
	fn from(c: PsoConfig) -> Self {
		OptimizerConfig::ParticleSwarm(c)
	}
}

impl From<AbcConfig> for OptimizerConfig {
	fn from(c: AbcConfig) -> Self {
		OptimizerConfig::BeeColony(c)
	}
}

impl From<AcoConfig> for OptimizerConfig {
	fn from(c: AcoConfig) -> Self {
		OptimizerConfig::AntColony(c)
	}
}

impl From<BatConfig> for OptimizerConfig {
	fn from(c: BatConfig) -> Self {
		OptimizerConfig::BatAlgorithm(c)
	}
}

/// Run whichever optimizer `config` selects over the box `bounds`.
pub fn optimize<F>(func: &F, bounds: &[(f64, f64)], config: OptimizerConfig) -> Result<SwarmReport>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	match config {
		OptimizerConfig::ParticleSwarm(c) => particle_swarm(func, bounds, c),
		OptimizerConfig::BeeColony(c) => bee_colony(func, bounds, c),
		OptimizerConfig::AntColony(c) => ant_colony(func, bounds, c),
		OptimizerConfig::BatAlgorithm(c) => bat_algorithm(func, bounds, c),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_argmin_first_wins_ties() {
		assert_eq!(argmin(vec![3.0, 1.0, 1.0, 2.0]), Some((1, 1.0)));
		assert_eq!(argmin(vec![f64::NAN, 1.0]), Some((1, 1.0)));
		assert_eq!(argmin(Vec::<f64>::new()), None);
	}

	#[test]
	fn test_parse_algorithm_variants() {
		assert_eq!("PSO".parse::<Algorithm>().unwrap(), Algorithm::ParticleSwarm);
		assert_eq!("bee_colony".parse::<Algorithm>().unwrap(), Algorithm::BeeColony);
		assert_eq!("ants".parse::<Algorithm>().unwrap(), Algorithm::AntColony);
		assert_eq!("ba".parse::<Algorithm>().unwrap(), Algorithm::BatAlgorithm);
		assert!("simplex".parse::<Algorithm>().is_err());
		for algo in [Algorithm::ParticleSwarm, Algorithm::BeeColony, Algorithm::AntColony, Algorithm::BatAlgorithm] {
			assert_eq!(algo.to_string().parse::<Algorithm>().unwrap(), algo);
			assert_eq!(algo.default_config().algorithm(), algo);
		}
	}

	#[test]
	fn test_bounds_validation() {
		assert!(bounds_to_arrays(&[(-1.0, 1.0), (0.0, 2.0)]).is_ok());
		assert!(matches!(bounds_to_arrays(&[]), Err(SwarmError::ZeroDimension)));
		assert!(matches!(
			bounds_to_arrays(&[(0.0, 1.0), (2.0, 1.0)]),
			Err(SwarmError::InvertedBound { index: 1, .. })
		));
		assert!(matches!(bounds_to_arrays(&[(f64::NAN, 1.0)]), Err(SwarmError::InvertedBound { .. })));
		let lower = Array1::from(vec![0.0]);
		let upper = Array1::from(vec![1.0, 2.0]);
		assert!(matches!(validate_bounds(&lower, &upper), Err(SwarmError::BoundsMismatch { lower: 1, upper: 2 })));
	}
}
