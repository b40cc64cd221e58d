//! Artificial Bee Colony
//!
//! Two fixed groups share one [`Bee`] record. Employed bees refine their own
//! position and are forced to scout a fresh random position after `limit`
//! failed attempts. Onlookers copy an employed bee chosen by a weighted draw
//! and try one neighbourhood move from the copy.
//!
//! The scout step is the only move that draws inside the bounds again, every
//! neighbourhood move may leave the box.

use std::f64::consts::PI;

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;

use crate::init_random::uniform_point;
use crate::{
	Callback, CallbackAction, Objective, Result, STOPPED_BY_CALLBACK, SwarmError, SwarmReport, bounds_to_arrays,
	make_rng, notify, require_finite, require_population, validate_bounds,
};

/// Employed or onlooker bee
#[derive(Debug, Clone)]
pub struct Bee {
	pub position: Array1<f64>,
	pub cost: f64,
	/// Consecutive failed improvement attempts, employed role only
	pub tries: usize,
}

impl Bee {
	pub fn new(position: Array1<f64>, cost: f64) -> Self {
		Self { position, cost, tries: 0 }
	}

	pub fn fitness(&self) -> f64 {
		fitness(self.cost)
	}
}

/// Positive selection weight derived from a cost: `1/(1+cost)` for
/// non-negative costs, `1+|cost|` otherwise.
pub fn fitness(cost: f64) -> f64 {
	if cost >= 0.0 { 1.0 / (1.0 + cost) } else { 1.0 + cost.abs() }
}

/// Weighting used when onlookers pick an employed bee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnlookerSelection {
	/// Proportional to the raw cost; fails on negative costs or a zero total
	#[default]
	Cost,
	/// Proportional to [`fitness`]
	Fitness,
}

/// Normalised selection probabilities over the employed bees.
pub fn selection_probabilities(employed: &[Bee], selection: OnlookerSelection) -> Result<Vec<f64>> {
	let weights: Vec<f64> = match selection {
		OnlookerSelection::Cost => employed.iter().map(|b| b.cost).collect(),
		OnlookerSelection::Fitness => employed.iter().map(Bee::fitness).collect(),
	};
	if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| **w < 0.0) {
		return Err(SwarmError::NegativeWeight { context: "onlooker selection", index, weight });
	}
	let total: f64 = weights.iter().sum();
	if !(total > 0.0 && total.is_finite()) {
		return Err(SwarmError::DegenerateDistribution { context: "onlooker selection", sum: total });
	}
	Ok(weights.iter().map(|w| w / total).collect())
}

/// Single draw against the cumulative distribution.
fn roulette<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
	let choice_point = rng.random::<f64>();
	let mut running = 0.0;
	for (i, p) in probabilities.iter().enumerate() {
		running += p;
		if running > choice_point {
			return i;
		}
	}
	// rounding can leave the cumulative sum just under the draw
	probabilities.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}

/// Uniform index in `0..len` skipping `exclude`, unless it is the only choice.
fn other_index<R: Rng + ?Sized>(len: usize, exclude: Option<usize>, rng: &mut R) -> usize {
	match exclude {
		Some(k) if len > 1 => {
			let i = rng.random_range(0..len - 1);
			if i >= k { i + 1 } else { i }
		}
		_ => rng.random_range(0..len),
	}
}

/// Proposal `x + phi * (x[j] - other[j])` shifting every coordinate by the same amount.
fn neighbour<R: Rng + ?Sized>(
	position: &Array1<f64>,
	employed: &[Bee],
	exclude: Option<usize>,
	a: f64,
	rng: &mut R,
) -> Array1<f64> {
	let i = other_index(employed.len(), exclude, rng);
	let j = rng.random_range(0..position.len());
	let phi = rng.random_range(-a..a);
	let step = phi * (position[j] - employed[i].position[j]);
	position.mapv(|v| v + step)
}

/// Outcome of one employed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmployedMove {
	Improved,
	Stalled,
	Scouted,
}

/// Employed role: neighbourhood attempt while `tries < limit`, otherwise
/// reset the counter and scout a uniform point in the box.
#[allow(clippy::too_many_arguments)]
pub(crate) fn employed_step<C, R>(
	employed: &mut [Bee],
	index: usize,
	limit: usize,
	a: f64,
	lower: &Array1<f64>,
	upper: &Array1<f64>,
	cost_of: &mut C,
	rng: &mut R,
) -> EmployedMove
where
	C: FnMut(&Array1<f64>) -> f64,
	R: Rng + ?Sized,
{
	if employed[index].tries < limit {
		let candidate = neighbour(&employed[index].position, employed, Some(index), a, rng);
		let cost = cost_of(&candidate);
		let bee = &mut employed[index];
		if cost < bee.cost {
			bee.position = candidate;
			bee.cost = cost;
			EmployedMove::Improved
		} else {
			bee.tries += 1;
			EmployedMove::Stalled
		}
	} else {
		let position = uniform_point(lower, upper, rng);
		let cost = cost_of(&position);
		let bee = &mut employed[index];
		bee.tries = 0;
		bee.position = position;
		bee.cost = cost;
		EmployedMove::Scouted
	}
}

/// Onlooker role: weighted pick of an employed bee, copy it, then one
/// neighbourhood attempt from the copy. Returns whether the copy improved.
pub(crate) fn onlooker_step<C, R>(
	onlooker: &mut Bee,
	employed: &[Bee],
	a: f64,
	selection: OnlookerSelection,
	cost_of: &mut C,
	rng: &mut R,
) -> Result<bool>
where
	C: FnMut(&Array1<f64>) -> f64,
	R: Rng + ?Sized,
{
	let probabilities = selection_probabilities(employed, selection)?;
	let k = roulette(&probabilities, rng);
	onlooker.position = employed[k].position.clone();
	onlooker.cost = employed[k].cost;

	let candidate = neighbour(&onlooker.position, employed, Some(k), a, rng);
	let cost = cost_of(&candidate);
	if cost < onlooker.cost {
		onlooker.position = candidate;
		onlooker.cost = cost;
		Ok(true)
	} else {
		Ok(false)
	}
}

/// Bee colony configuration
pub struct AbcConfig {
	pub maxiter: usize,
	pub employed: usize,
	pub onlookers: usize,
	/// Failed attempts before an employed bee scouts
	pub limit: usize,
	/// Half-width of the neighbourhood factor `phi ~ U(-a, a)`
	pub a: f64,
	pub selection: OnlookerSelection,
	pub seed: Option<u64>,
	pub disp: bool,
	pub callback: Option<Callback>,
}

impl Default for AbcConfig {
	fn default() -> Self {
		Self {
			maxiter: 50,
			employed: 30,
			onlookers: 15,
			limit: 15,
			a: PI,
			selection: OnlookerSelection::Cost,
			seed: None,
			disp: false,
			callback: None,
		}
	}
}

/// Fluent builder for `AbcConfig`
pub struct AbcConfigBuilder {
	cfg: AbcConfig,
}

impl Default for AbcConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AbcConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: AbcConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn employed(mut self, v: usize) -> Self {
		self.cfg.employed = v;
		self
	}
	pub fn onlookers(mut self, v: usize) -> Self {
		self.cfg.onlookers = v;
		self
	}
	pub fn limit(mut self, v: usize) -> Self {
		self.cfg.limit = v;
		self
	}
	pub fn a(mut self, v: f64) -> Self {
		self.cfg.a = v;
		self
	}
	pub fn selection(mut self, v: OnlookerSelection) -> Self {
		self.cfg.selection = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn disp(mut self, v: bool) -> Self {
		self.cfg.disp = v;
		self
	}
	pub fn callback(mut self, cb: Callback) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn build(self) -> AbcConfig {
		self.cfg
	}
}

/// Bee colony optimizer bound to one objective
pub struct BeeColony<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	objective: Objective<'a, F>,
	lower: Array1<f64>,
	upper: Array1<f64>,
	employed: Vec<Bee>,
	onlookers: Vec<Bee>,
	config: AbcConfig,
	rng: StdRng,
}

impl<'a, F> BeeColony<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	/// Draw the employed group, then the onlooker group, each bee uniform in the box.
	pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>, config: AbcConfig) -> Result<Self> {
		validate_bounds(&lower, &upper)?;
		require_population(config.employed, "employed bees")?;
		require_population(config.onlookers, "onlooker bees")?;
		require_finite(config.a, "a")?;
		if config.a <= 0.0 {
			return Err(SwarmError::InvalidParameter { name: "a", reason: format!("must be > 0, got {}", config.a) });
		}

		let mut rng = make_rng(config.seed);
		let mut objective = Objective::new(func);
		let mut draw = |n: usize, rng: &mut StdRng| -> Vec<Bee> {
			(0..n)
				.map(|_| {
					let position = uniform_point(&lower, &upper, rng);
					let cost = objective.eval(&position);
					Bee::new(position, cost)
				})
				.collect()
		};
		let employed = draw(config.employed, &mut rng);
		let onlookers = draw(config.onlookers, &mut rng);

		Ok(Self { objective, lower, upper, employed, onlookers, config, rng })
	}

	pub fn employed(&self) -> &[Bee] {
		&self.employed
	}

	pub fn onlookers(&self) -> &[Bee] {
		&self.onlookers
	}

	/// Bootstrap round of onlookers, then `maxiter` rounds of employed moves
	/// followed by onlooker moves.
	pub fn solve(&mut self) -> Result<SwarmReport> {
		let mut callback = self.config.callback.take();
		let result = self.run(&mut callback);
		self.config.callback = callback;
		result
	}

	fn run(&mut self, callback: &mut Option<Callback>) -> Result<SwarmReport> {
		let maxiter = self.config.maxiter;
		if self.config.disp {
			log::info!(
				"ABC init: {} employed, {} onlookers, limit={}, a={:.4}, selection={:?}",
				self.employed.len(),
				self.onlookers.len(),
				self.config.limit,
				self.config.a,
				self.config.selection
			);
		}

		self.onlooker_phase()?;
		let (mut best_x, mut best_f) = self.best_of_union();
		if self.config.disp {
			log::info!("ABC iter {:4}  best_f={:.6e}", 0, best_f);
		}

		let mut nit = 0;
		let mut message = format!("Maximum number of iterations reached: {}", maxiter);
		for iter in 1..=maxiter {
			nit = iter;
			let scouts = self.employed_phase();
			if scouts > 0 {
				log::debug!("ABC iter {}: {} employed bees scouted", iter, scouts);
			}
			self.onlooker_phase()?;

			let (x, f) = self.best_of_union();
			if f < best_f {
				best_x = x;
				best_f = f;
			}
			if self.config.disp && (iter <= 5 || iter % 10 == 0) {
				log::info!("ABC iter {:4}  best_f={:.6e}", iter, best_f);
			}
			if let CallbackAction::Stop = notify(callback, &best_x, best_f, iter) {
				message = STOPPED_BY_CALLBACK.to_string();
				break;
			}
		}

		if self.config.disp {
			log::info!("ABC finished: {}", message);
		}
		Ok(SwarmReport { x: best_x, fun: best_f, success: true, message, nit, nfev: self.objective.nfev })
	}

	/// Every employed bee moves once; returns the number of scouts.
	fn employed_phase(&mut self) -> usize {
		let (limit, a) = (self.config.limit, self.config.a);
		let objective = &mut self.objective;
		let mut cost_of = |x: &Array1<f64>| objective.eval(x);
		let mut scouts = 0;
		for index in 0..self.employed.len() {
			let step = employed_step(
				&mut self.employed,
				index,
				limit,
				a,
				&self.lower,
				&self.upper,
				&mut cost_of,
				&mut self.rng,
			);
			if step == EmployedMove::Scouted {
				scouts += 1;
			}
		}
		scouts
	}

	fn onlooker_phase(&mut self) -> Result<()> {
		let (a, selection) = (self.config.a, self.config.selection);
		let objective = &mut self.objective;
		let mut cost_of = |x: &Array1<f64>| objective.eval(x);
		for onlooker in self.onlookers.iter_mut() {
			onlooker_step(onlooker, &self.employed, a, selection, &mut cost_of, &mut self.rng)?;
		}
		Ok(())
	}

	/// Lowest cost over employed then onlookers, first found wins ties.
	fn best_of_union(&self) -> (Array1<f64>, f64) {
		let mut best = &self.employed[0];
		for bee in self.employed.iter().chain(self.onlookers.iter()) {
			if bee.cost < best.cost {
				best = bee;
			}
		}
		(best.position.clone(), best.cost)
	}
}

/// Convenience function mirroring `particle_swarm`
pub fn bee_colony<F>(func: &F, bounds: &[(f64, f64)], config: AbcConfig) -> Result<SwarmReport>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let (lower, upper) = bounds_to_arrays(bounds)?;
	BeeColony::new(func, lower, upper, config)?.solve()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	fn bees(costs: &[f64]) -> Vec<Bee> {
		costs.iter().enumerate().map(|(i, &c)| Bee::new(Array1::from(vec![i as f64, 0.0]), c)).collect()
	}

	#[test]
	fn test_fitness_is_positive() {
		assert_eq!(fitness(0.0), 1.0);
		assert_eq!(fitness(1.0), 0.5);
		assert_eq!(fitness(-3.0), 4.0);
		for c in [-1e6, -1.0, 0.0, 1e-9, 10.0, 1e9] {
			assert!(fitness(c) > 0.0);
		}
	}

	#[test]
	fn test_cost_selection_probabilities() {
		let p = selection_probabilities(&bees(&[1.0, 3.0]), OnlookerSelection::Cost).unwrap();
		assert!((p[0] - 0.25).abs() < 1e-12);
		assert!((p[1] - 0.75).abs() < 1e-12);
	}

	#[test]
	fn test_cost_selection_rejects_degenerate_weights() {
		assert!(matches!(
			selection_probabilities(&bees(&[0.0, 0.0]), OnlookerSelection::Cost),
			Err(SwarmError::DegenerateDistribution { .. })
		));
		assert!(matches!(
			selection_probabilities(&bees(&[1.0, -0.5]), OnlookerSelection::Cost),
			Err(SwarmError::NegativeWeight { index: 1, .. })
		));
		let p = selection_probabilities(&bees(&[0.0, -0.5]), OnlookerSelection::Fitness).unwrap();
		assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_roulette_follows_weights() {
		let mut rng = StdRng::seed_from_u64(5);
		let probabilities = [0.0, 1.0, 0.0];
		for _ in 0..100 {
			assert_eq!(roulette(&probabilities, &mut rng), 1);
		}
	}

	#[test]
	fn test_other_index_excludes_self() {
		let mut rng = StdRng::seed_from_u64(9);
		for _ in 0..200 {
			assert_ne!(other_index(4, Some(2), &mut rng), 2);
		}
		assert_eq!(other_index(1, Some(0), &mut rng), 0);
	}

	#[test]
	fn test_scout_after_limit_failures() {
		let lower = Array1::from(vec![-1.0, -1.0]);
		let upper = Array1::from(vec![1.0, 1.0]);
		let mut rng = StdRng::seed_from_u64(1);
		let mut employed = vec![Bee::new(Array1::from(vec![0.5, 0.5]), 0.0), Bee::new(Array1::from(vec![0.1, 0.2]), 0.0)];
		// constant objective: no move can strictly improve
		let mut cost_of = |_: &Array1<f64>| 0.0;
		let limit = 3;
		for expected_tries in 1..=limit {
			let step = employed_step(&mut employed, 0, limit, PI, &lower, &upper, &mut cost_of, &mut rng);
			assert_eq!(step, EmployedMove::Stalled);
			assert_eq!(employed[0].tries, expected_tries);
		}
		let step = employed_step(&mut employed, 0, limit, PI, &lower, &upper, &mut cost_of, &mut rng);
		assert_eq!(step, EmployedMove::Scouted);
		assert_eq!(employed[0].tries, 0);
		assert!(employed[0].position.iter().all(|&v| (-1.0..=1.0).contains(&v)));
	}

	#[test]
	fn test_onlooker_copies_and_never_worsens() {
		let mut rng = StdRng::seed_from_u64(2);
		let employed = bees(&[4.0, 1.0, 2.0]);
		let mut onlooker = Bee::new(Array1::from(vec![9.0, 9.0]), 100.0);
		let mut cost_of = |x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>();
		onlooker_step(&mut onlooker, &employed, 1.0, OnlookerSelection::Cost, &mut cost_of, &mut rng).unwrap();
		assert!(employed.iter().any(|b| onlooker.cost <= b.cost));
		assert!(onlooker.cost < 100.0);
	}
}
