//! Ant Colony Optimization over a discretized continuous domain
//!
//! Each dimension owns a fixed pool of sampled values carrying pheromone.
//! An ant picks one value per dimension, either greedily (highest pheromone)
//! or by a pheromone biased scan, then the picked values are refined by a
//! [`LocalSearch`] and written back into the pool. The best ant deposits
//! `1/error` on its points before every point evaporates.
//!
//! Ants are ranked by the score `-f(x)` and the colony keeps the lowest
//! strictly negative score, i.e. the ant with the largest positive
//! objective. A cycle whose best score is exactly zero ends the run at once.
//! Refined values may leave the sampling interval.

use std::collections::VecDeque;

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;

use crate::local_search::{LocalSearch, default_local_search};
use crate::parallel_eval::{ParallelConfig, configure_threads, map_in_order};
use crate::{
	Callback, CallbackAction, Result, STOPPED_BY_CALLBACK, SwarmError, SwarmReport, bounds_to_arrays, make_rng,
	notify, require_population, validate_bounds,
};

/// Pheromone given to every point at construction
pub const INITIAL_PHEROMONE: f64 = 0.5;

/// Sampled coordinate value with its pheromone weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
	pub value: f64,
	pub pheromone: f64,
}

/// Handle on a point of the field: dimension and index in that dimension's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
	pub dim: usize,
	pub index: usize,
}

/// Per-dimension pools of points shared by all ants
#[derive(Debug, Clone)]
pub struct PheromoneField {
	dims: Vec<Vec<Point>>,
}

impl PheromoneField {
	/// `discrete_points` values per dimension, uniform in that dimension's interval.
	pub fn new<R: Rng + ?Sized>(
		discrete_points: usize,
		lower: &Array1<f64>,
		upper: &Array1<f64>,
		rng: &mut R,
	) -> Self {
		let dims = lower
			.iter()
			.zip(upper.iter())
			.map(|(&lo, &hi)| {
				(0..discrete_points)
					.map(|_| Point { value: lo + rng.random::<f64>() * (hi - lo), pheromone: INITIAL_PHEROMONE })
					.collect()
			})
			.collect();
		Self { dims }
	}

	pub fn dimensions(&self) -> usize {
		self.dims.len()
	}

	pub fn points(&self, dim: usize) -> &[Point] {
		&self.dims[dim]
	}

	pub fn value(&self, p: PointRef) -> f64 {
		self.dims[p.dim][p.index].value
	}

	pub fn set_value(&mut self, p: PointRef, value: f64) {
		self.dims[p.dim][p.index].value = value;
	}

	pub fn total_pheromone(&self, dim: usize) -> f64 {
		self.dims[dim].iter().map(|p| p.pheromone).sum()
	}

	/// Highest pheromone point of `dim`, first one on ties; `None` when no
	/// point carries a positive weight.
	pub fn best_point(&self, dim: usize) -> Option<PointRef> {
		let mut best = None;
		let mut best_pheromone = 0.0;
		for (index, point) in self.dims[dim].iter().enumerate() {
			if point.pheromone > best_pheromone {
				best_pheromone = point.pheromone;
				best = Some(PointRef { dim, index });
			}
		}
		best
	}

	/// Add `1/error` to every point of `location`.
	pub fn deposit(&mut self, location: &[PointRef], error: f64) -> Result<()> {
		if !(error > 0.0) {
			return Err(SwarmError::NonPositiveDeposit(error));
		}
		for &p in location {
			self.dims[p.dim][p.index].pheromone += 1.0 / error;
		}
		Ok(())
	}

	/// Scale every weight by `1 - rate`.
	pub fn evaporate(&mut self, rate: f64) {
		for point in self.dims.iter_mut().flatten() {
			point.pheromone *= 1.0 - rate;
		}
	}
}

/// Bounded FIFO of visited points, oldest evicted first
#[derive(Debug, Clone)]
pub struct AntMemory {
	visited: VecDeque<PointRef>,
	capacity: usize,
}

impl AntMemory {
	pub fn new(capacity: usize) -> Self {
		Self { visited: VecDeque::with_capacity(capacity + 1), capacity }
	}

	/// Remember `point` unless a remembered point currently holds the same
	/// value. Values are read from the field at call time since local search
	/// rewrites them.
	pub fn remember(&mut self, point: PointRef, field: &PheromoneField) -> bool {
		let value = field.value(point);
		if self.visited.iter().any(|&p| field.value(p) == value) {
			return false;
		}
		self.visited.push_back(point);
		if self.visited.len() > self.capacity {
			self.visited.pop_front();
		}
		true
	}

	pub fn len(&self) -> usize {
		self.visited.len()
	}

	pub fn is_empty(&self) -> bool {
		self.visited.is_empty()
	}
}

/// Ant: memory plus the points it currently occupies, at most one per dimension
#[derive(Debug, Clone)]
pub struct Ant {
	pub memory: AntMemory,
	location: Vec<PointRef>,
}

impl Ant {
	pub fn new(memory_limit: usize) -> Self {
		Self { memory: AntMemory::new(memory_limit), location: Vec::with_capacity(memory_limit) }
	}

	pub fn clear_location(&mut self) {
		self.location.clear();
	}

	pub fn assign_point(&mut self, p: PointRef) {
		self.location.push(p);
	}

	pub fn location(&self) -> &[PointRef] {
		&self.location
	}

	/// True when every dimension got a point this cycle
	pub fn is_complete(&self, dimensions: usize) -> bool {
		self.location.len() == dimensions
	}

	/// Current values of the occupied points
	pub fn coordinates(&self, field: &PheromoneField) -> Array1<f64> {
		self.location.iter().map(|&p| field.value(p)).collect()
	}

	/// Write `values` into the occupied points of the shared field.
	pub fn update_location(&self, values: &Array1<f64>, field: &mut PheromoneField) {
		for (&p, &v) in self.location.iter().zip(values.iter()) {
			field.set_value(p, v);
		}
	}
}

/// Ant colony configuration
pub struct AcoConfig {
	/// Cycles after the bootstrap cycle
	pub maxiter: usize,
	pub ants: usize,
	/// Sampled values per dimension, at least 2 unless `q == 1`
	pub discrete_points: usize,
	/// Probability of the greedy construction
	pub q: f64,
	/// Evaporation rate `p`, weights are scaled by `1 - p`
	pub evaporation_rate: f64,
	/// Defaults to [`default_local_search`]
	pub local_search: Box<dyn LocalSearch>,
	pub parallel: ParallelConfig,
	pub seed: Option<u64>,
	pub disp: bool,
	pub callback: Option<Callback>,
}

impl Default for AcoConfig {
	fn default() -> Self {
		Self {
			maxiter: 10,
			ants: 20,
			discrete_points: 200,
			q: 0.5,
			evaporation_rate: 0.9,
			local_search: default_local_search(),
			parallel: ParallelConfig::default(),
			seed: None,
			disp: false,
			callback: None,
		}
	}
}

/// Fluent builder for `AcoConfig`
pub struct AcoConfigBuilder {
	cfg: AcoConfig,
}

impl Default for AcoConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AcoConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: AcoConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn ants(mut self, v: usize) -> Self {
		self.cfg.ants = v;
		self
	}
	pub fn discrete_points(mut self, v: usize) -> Self {
		self.cfg.discrete_points = v;
		self
	}
	pub fn q(mut self, v: f64) -> Self {
		self.cfg.q = v;
		self
	}
	pub fn evaporation_rate(mut self, v: f64) -> Self {
		self.cfg.evaporation_rate = v;
		self
	}
	pub fn local_search<L: LocalSearch + 'static>(mut self, search: L) -> Self {
		self.cfg.local_search = Box::new(search);
		self
	}
	pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
		self.cfg.parallel = parallel;
		self
	}
	pub fn enable_parallel(mut self, enable: bool) -> Self {
		self.cfg.parallel.enabled = enable;
		self
	}
	pub fn parallel_threads(mut self, num_threads: usize) -> Self {
		self.cfg.parallel.num_threads = Some(num_threads);
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
	pub fn build(self) -> AcoConfig {
		self.cfg
	}
}

/// Ant colony optimizer bound to one objective
pub struct AntColony<'a, F>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	func: &'a F,
	nfev: usize,
	field: PheromoneField,
	ants: Vec<Ant>,
	config: AcoConfig,
	rng: StdRng,
}

impl<'a, F> AntColony<'a, F>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	/// Sample the pheromone field; ants start with empty memories of capacity D.
	pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>, config: AcoConfig) -> Result<Self> {
		let n = validate_bounds(&lower, &upper)?;
		require_population(config.ants, "ants")?;
		require_population(config.discrete_points, "discrete points")?;
		if !(0.0..=1.0).contains(&config.q) {
			return Err(SwarmError::InvalidParameter {
				name: "q",
				reason: format!("must lie in [0, 1], got {}", config.q),
			});
		}
		// a lone point always holds the whole pheromone share and never passes the scan
		if config.discrete_points < 2 && config.q < 1.0 {
			return Err(SwarmError::InvalidParameter {
				name: "discrete_points",
				reason: format!("exploration needs at least 2 points per dimension, got {}", config.discrete_points),
			});
		}
		if !(config.evaporation_rate > 0.0 && config.evaporation_rate < 1.0) {
			return Err(SwarmError::InvalidParameter {
				name: "evaporation_rate",
				reason: format!("must lie in (0, 1), got {}", config.evaporation_rate),
			});
		}

		let mut rng = make_rng(config.seed);
		let field = PheromoneField::new(config.discrete_points, &lower, &upper, &mut rng);
		let ants = (0..config.ants).map(|_| Ant::new(n)).collect();
		Ok(Self { func, nfev: 0, field, ants, config, rng })
	}

	pub fn field(&self) -> &PheromoneField {
		&self.field
	}

	pub fn ants(&self) -> &[Ant] {
		&self.ants
	}

	pub fn nfev(&self) -> usize {
		self.nfev
	}

	/// Every ant rebuilds its location. With probability `q` it takes the
	/// highest pheromone point of each dimension; otherwise it scans each
	/// dimension's pool and takes the first point that passes
	/// `U > pheromone/total` and is new to its memory. A dimension where no
	/// point passes stays unassigned for this cycle.
	pub fn probabilistic_construction(&mut self) -> Result<()> {
		let n = self.field.dimensions();
		let q = self.config.q;
		for ant in self.ants.iter_mut() {
			ant.clear_location();
			if self.rng.random::<f64>() > 1.0 - q {
				for dim in 0..n {
					let best = self.field.best_point(dim).ok_or(SwarmError::DegenerateDistribution {
						context: "ant exploitation",
						sum: self.field.total_pheromone(dim),
					})?;
					let _ = ant.memory.remember(best, &self.field);
					ant.assign_point(best);
				}
			} else {
				for dim in 0..n {
					let total = self.field.total_pheromone(dim);
					if !(total > 0.0 && total.is_finite()) {
						return Err(SwarmError::DegenerateDistribution { context: "ant exploration", sum: total });
					}
					for (index, point) in self.field.points(dim).iter().enumerate() {
						if self.rng.random::<f64>() > point.pheromone / total {
							let candidate = PointRef { dim, index };
							if ant.memory.remember(candidate, &self.field) {
								ant.assign_point(candidate);
								break;
							}
						}
					}
				}
			}
		}
		Ok(())
	}

	/// Refine every complete ant and write the result back into the field.
	///
	/// Sequential mode refines ant by ant, so an ant sharing points with an
	/// earlier one starts from the already rewritten values. Parallel mode
	/// starts every search from the values as they were before the phase and
	/// writes back in ant order.
	pub fn local_search(&mut self) {
		let n = self.field.dimensions();
		let func = self.func;
		let objective = |x: &Array1<f64>| func(x);
		let search = self.config.local_search.as_ref();

		if self.config.parallel.enabled {
			let starts: Vec<Option<Array1<f64>>> = self
				.ants
				.iter()
				.map(|ant| ant.is_complete(n).then(|| ant.coordinates(&self.field)))
				.collect();
			let results = map_in_order(
				&starts,
				|start| start.as_ref().map(|x0| search.minimize(&objective, x0)),
				&self.config.parallel,
			);
			for (ant, result) in self.ants.iter().zip(results) {
				if let Some(r) = result {
					self.nfev += r.nfev;
					ant.update_location(&r.x, &mut self.field);
				}
			}
		} else {
			for ant in &self.ants {
				if !ant.is_complete(n) {
					continue;
				}
				let x0 = ant.coordinates(&self.field);
				let r = search.minimize(&objective, &x0);
				self.nfev += r.nfev;
				ant.update_location(&r.x, &mut self.field);
			}
		}
	}

	/// Index and score of the ant with the lowest strictly negative
	/// `-f(location)`. The first complete ant with score 0 is returned when
	/// no ant scores below zero.
	pub fn get_best_ant(&mut self) -> Result<(usize, f64)> {
		let n = self.field.dimensions();
		let first = self.ants.iter().position(|a| a.is_complete(n)).ok_or(SwarmError::NoCompleteAnt)?;
		let locations: Vec<Option<Array1<f64>>> =
			self.ants.iter().map(|ant| ant.is_complete(n).then(|| ant.coordinates(&self.field))).collect();
		let func = self.func;
		let costs = map_in_order(&locations, |loc| loc.as_ref().map(|x| func(x)), &self.config.parallel);
		self.nfev += costs.iter().flatten().count();

		let mut best = first;
		let mut best_score = 0.0;
		for (i, cost) in costs.iter().enumerate() {
			if let Some(f) = cost {
				let score = -f;
				if score < best_score {
					best_score = score;
					best = i;
				}
			}
		}
		Ok((best, best_score))
	}

	/// Deposit `1/error` on the points of ant `ant`, then evaporate the whole field.
	pub fn update_pheromone(&mut self, ant: usize, error: f64) -> Result<()> {
		let Some(winner) = self.ants.get(ant) else {
			return Err(SwarmError::InvalidParameter {
				name: "ant",
				reason: format!("index {} out of range for {} ants", ant, self.ants.len()),
			});
		};
		self.field.deposit(winner.location(), error)?;
		self.field.evaporate(self.config.evaporation_rate);
		Ok(())
	}

	fn cycle(&mut self) -> Result<(usize, f64)> {
		self.probabilistic_construction()?;
		self.local_search();
		self.get_best_ant()
	}

	fn solution_found(&self, ant: usize, nit: usize) -> SwarmReport {
		log::info!("ACO solution found at iteration {}", nit);
		SwarmReport {
			x: self.ants[ant].coordinates(&self.field),
			fun: 0.0,
			success: true,
			message: "Solution found: exact zero score".to_string(),
			nit,
			nfev: self.nfev,
		}
	}

	/// One bootstrap cycle then `maxiter` cycles of construction, local
	/// search, scoring and pheromone update.
	pub fn solve(&mut self) -> Result<SwarmReport> {
		let mut callback = self.config.callback.take();
		let result = self.run(&mut callback);
		self.config.callback = callback;
		result
	}

	fn run(&mut self, callback: &mut Option<Callback>) -> Result<SwarmReport> {
		configure_threads(&self.config.parallel);
		let maxiter = self.config.maxiter;
		if self.config.disp {
			log::info!(
				"ACO init: {} ants, {} points x {} dimensions, q={}, p={}, parallel={}",
				self.ants.len(),
				self.config.discrete_points,
				self.field.dimensions(),
				self.config.q,
				self.config.evaporation_rate,
				self.config.parallel.enabled
			);
		}

		let (ant, mut best_score) = self.cycle()?;
		if best_score == 0.0 {
			return Ok(self.solution_found(ant, 0));
		}
		self.update_pheromone(ant, -best_score)?;
		// snapshot: later cycles rewrite the field values
		let mut best_x = self.ants[ant].coordinates(&self.field);

		let mut nit = 0;
		let mut message = format!("Maximum number of iterations reached: {}", maxiter);
		for iter in 1..=maxiter {
			nit = iter;
			let (ant, score) = self.cycle()?;
			if score == 0.0 {
				return Ok(self.solution_found(ant, iter));
			}
			let x = self.ants[ant].coordinates(&self.field);
			self.update_pheromone(ant, -score)?;
			if self.config.disp && (iter - 1) % 25 == 0 {
				log::info!("ACO iter {:4}  cost={:.6e}", iter, -score);
			}
			if score < best_score {
				best_score = score;
				best_x = x;
			}
			if let CallbackAction::Stop = notify(callback, &best_x, best_score, iter) {
				message = STOPPED_BY_CALLBACK.to_string();
				break;
			}
		}

		if self.config.disp {
			log::info!("ACO finished: {}", message);
		}
		Ok(SwarmReport { x: best_x, fun: best_score, success: true, message, nit, nfev: self.nfev })
	}
}

/// Convenience function mirroring `particle_swarm`
pub fn ant_colony<F>(func: &F, bounds: &[(f64, f64)], config: AcoConfig) -> Result<SwarmReport>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	let (lower, upper) = bounds_to_arrays(bounds)?;
	AntColony::new(func, lower, upper, config)?.solve()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::local_search::{LocalResult, NoLocalSearch};
	use rand::SeedableRng;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Identity search counting how often it is started
	struct CountingSearch(Arc<AtomicUsize>);

	impl LocalSearch for CountingSearch {
		fn minimize(&self, _func: &(dyn Fn(&Array1<f64>) -> f64 + Sync), x0: &Array1<f64>) -> LocalResult {
			self.0.fetch_add(1, Ordering::SeqCst);
			LocalResult { x: x0.clone(), fun: None, nfev: 0 }
		}
	}

	fn small_field() -> PheromoneField {
		let mut rng = StdRng::seed_from_u64(4);
		PheromoneField::new(5, &Array1::from(vec![-1.0, 0.0]), &Array1::from(vec![1.0, 2.0]), &mut rng)
	}

	#[test]
	fn test_field_sampling() {
		let field = small_field();
		assert_eq!(field.dimensions(), 2);
		for dim in 0..2 {
			assert_eq!(field.points(dim).len(), 5);
			assert!((field.total_pheromone(dim) - 2.5).abs() < 1e-12);
		}
		assert!(field.points(1).iter().all(|p| (0.0..=2.0).contains(&p.value)));
	}

	#[test]
	fn test_best_point_first_max_and_degenerate() {
		let mut field = small_field();
		assert_eq!(field.best_point(0), Some(PointRef { dim: 0, index: 0 }));
		field.dims[0][3].pheromone = 2.0;
		assert_eq!(field.best_point(0), Some(PointRef { dim: 0, index: 3 }));
		for p in field.dims[1].iter_mut() {
			p.pheromone = 0.0;
		}
		assert_eq!(field.best_point(1), None);
	}

	#[test]
	fn test_deposit_then_evaporate() {
		let mut field = small_field();
		let loc = [PointRef { dim: 0, index: 1 }, PointRef { dim: 1, index: 2 }];
		field.deposit(&loc, 0.5).unwrap();
		field.evaporate(0.9);
		assert!((field.points(0)[1].pheromone - 2.5 * 0.1).abs() < 1e-12);
		assert!((field.points(0)[0].pheromone - 0.05).abs() < 1e-12);
		assert!(matches!(field.deposit(&loc, 0.0), Err(SwarmError::NonPositiveDeposit(_))));
		assert!(matches!(field.deposit(&loc, -1.0), Err(SwarmError::NonPositiveDeposit(_))));
	}

	#[test]
	fn test_memory_rejects_equal_values_and_evicts_oldest() {
		let mut field = small_field();
		let mut memory = AntMemory::new(2);
		let a = PointRef { dim: 0, index: 0 };
		let b = PointRef { dim: 0, index: 1 };
		let c = PointRef { dim: 0, index: 2 };
		assert!(memory.remember(a, &field));
		assert!(!memory.remember(a, &field));
		field.set_value(b, field.value(a));
		assert!(!memory.remember(b, &field));
		assert!(memory.remember(c, &field));
		field.set_value(b, 123.0);
		assert!(memory.remember(b, &field));
		assert_eq!(memory.len(), 2);
		// `a` was evicted
		assert!(memory.remember(a, &field));
	}

	#[test]
	fn test_local_search_writes_back_into_field() {
		let sphere = |x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>();
		let config = AcoConfigBuilder::new().seed(3).ants(4).discrete_points(10).q(1.0).build();
		let lower = Array1::from(vec![1.0, 1.0]);
		let upper = Array1::from(vec![2.0, 2.0]);
		let mut colony = AntColony::new(&sphere, lower, upper, config).unwrap();
		colony.probabilistic_construction().unwrap();
		let before = colony.ants()[0].coordinates(colony.field());
		colony.local_search();
		let after = colony.ants()[0].coordinates(colony.field());
		assert!(sphere(&after) < sphere(&before));
		assert!(colony.nfev() > 0);
	}

	#[test]
	fn test_update_pheromone_rejects_non_positive_error() {
		let f = |x: &Array1<f64>| x[0] + 10.0;
		let config = AcoConfigBuilder::new().seed(1).ants(2).discrete_points(4).local_search(NoLocalSearch).build();
		let mut colony = AntColony::new(&f, Array1::from(vec![0.0]), Array1::from(vec![1.0]), config).unwrap();
		assert!(matches!(colony.update_pheromone(0, 0.0), Err(SwarmError::NonPositiveDeposit(_))));
		assert!(colony.update_pheromone(7, 1.0).is_err());
		assert!(colony.update_pheromone(0, 1.0).is_ok());
	}

	#[test]
	fn test_best_ant_prefers_largest_objective() {
		let f = |x: &Array1<f64>| x[0] + 10.0;
		let config = AcoConfigBuilder::new().seed(5).ants(6).discrete_points(20).q(1.0).local_search(NoLocalSearch).build();
		let mut colony = AntColony::new(&f, Array1::from(vec![0.0]), Array1::from(vec![1.0]), config).unwrap();
		// greedy construction: every ant sits on the same first point
		colony.probabilistic_construction().unwrap();
		let (ant, score) = colony.get_best_ant().unwrap();
		assert_eq!(ant, 0);
		let expected = -(colony.field().points(0)[0].value + 10.0);
		assert!((score - expected).abs() < 1e-12);
	}

	#[test]
	fn test_single_point_requires_greedy_construction() {
		let f = |x: &Array1<f64>| x[0] + 1.0;
		let (lower, upper) = (Array1::from(vec![0.0, 0.0]), Array1::from(vec![1.0, 1.0]));
		let config = AcoConfigBuilder::new().discrete_points(1).q(0.0).build();
		let err = AntColony::new(&f, lower.clone(), upper.clone(), config).err();
		assert!(matches!(err, Some(SwarmError::InvalidParameter { name: "discrete_points", .. })));
		let config = AcoConfigBuilder::new().discrete_points(1).q(1.0).local_search(NoLocalSearch).build();
		assert!(AntColony::new(&f, lower, upper, config).is_ok());
	}

	#[test]
	fn test_exploration_takes_first_passing_new_point() {
		let f = |x: &Array1<f64>| x[0] + 10.0;
		let config = AcoConfigBuilder::new().seed(9).ants(1).discrete_points(4).q(0.0).local_search(NoLocalSearch).build();
		let mut colony = AntColony::new(&f, Array1::from(vec![0.0]), Array1::from(vec![1.0]), config).unwrap();
		// point 0 holds the whole share and can never pass `U > share`
		for (i, p) in colony.field.dims[0].iter_mut().enumerate() {
			p.pheromone = if i == 0 { 1.0 } else { 0.0 };
		}

		colony.probabilistic_construction().unwrap();
		assert_eq!(colony.ants()[0].location(), &[PointRef { dim: 0, index: 1 }]);
		// point 1 is now in memory, the scan moves on to point 2
		colony.probabilistic_construction().unwrap();
		assert_eq!(colony.ants()[0].location(), &[PointRef { dim: 0, index: 2 }]);
	}

	#[test]
	fn test_incomplete_ant_is_skipped() {
		let calls = Arc::new(AtomicUsize::new(0));
		let evals = AtomicUsize::new(0);
		let f = |x: &Array1<f64>| {
			evals.fetch_add(1, Ordering::SeqCst);
			x[0] + x[1] + 10.0
		};
		let config = AcoConfigBuilder::new()
			.seed(11)
			.ants(3)
			.discrete_points(5)
			.q(1.0)
			.local_search(CountingSearch(calls.clone()))
			.build();
		let mut colony = AntColony::new(&f, Array1::from(vec![0.0, 0.0]), Array1::from(vec![1.0, 1.0]), config).unwrap();
		colony.probabilistic_construction().unwrap();
		colony.ants[0].clear_location();
		colony.ants[0].assign_point(PointRef { dim: 0, index: 0 });
		assert!(!colony.ants()[0].is_complete(2));

		colony.local_search();
		assert_eq!(calls.load(Ordering::SeqCst), 2);

		let (ant, score) = colony.get_best_ant().unwrap();
		assert_eq!(evals.load(Ordering::SeqCst), 2);
		assert_eq!(colony.nfev(), 2);
		// ants 1 and 2 share the greedy points, the first one wins
		assert_eq!(ant, 1);
		assert!(score < 0.0);
	}

	#[test]
	fn test_no_complete_ant() {
		let f = |x: &Array1<f64>| x[0] + 10.0;
		let config = AcoConfigBuilder::new().seed(12).ants(3).discrete_points(5).q(1.0).local_search(NoLocalSearch).build();
		let mut colony = AntColony::new(&f, Array1::from(vec![0.0, 0.0]), Array1::from(vec![1.0, 1.0]), config).unwrap();
		colony.probabilistic_construction().unwrap();
		for ant in colony.ants.iter_mut() {
			ant.clear_location();
		}
		assert!(matches!(colony.get_best_ant(), Err(SwarmError::NoCompleteAnt)));
		assert_eq!(colony.nfev(), 0);
	}
}
