//! Particle Swarm Optimization
//!
//! Each particle keeps its position, velocity and personal best. Velocities
//! blend inertia, attraction to the personal best and attraction to the
//! swarm's best, with one scalar random factor per attraction term.
//! Positions are not clamped to the bounds after initialisation.

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;

use crate::init_random::{uniform_point, unit_vector};
use crate::{
	Callback, CallbackAction, Objective, Result, STOPPED_BY_CALLBACK, SwarmError, SwarmReport, argmin,
	bounds_to_arrays, make_rng, notify, require_finite, require_population, validate_bounds,
};

/// One member of the swarm
#[derive(Debug, Clone)]
pub struct Particle {
	pub position: Array1<f64>,
	pub cost: f64,
	pub best_position: Array1<f64>,
	pub best_cost: f64,
	pub velocity: Array1<f64>,
}

impl Particle {
	/// New particle whose personal best is its starting position
	pub fn new(position: Array1<f64>, cost: f64, velocity: Array1<f64>) -> Self {
		Self { best_position: position.clone(), best_cost: cost, position, cost, velocity }
	}

	/// `v <- w v + c1 r1 (pbest - x) + c2 r2 (gbest - x)`, `r1` drawn before `r2`
	pub fn update_velocity<R: Rng + ?Sized>(
		&mut self,
		c1: f64,
		c2: f64,
		w: f64,
		global_best: &Array1<f64>,
		rng: &mut R,
	) {
		let r1 = rng.random::<f64>();
		let r2 = rng.random::<f64>();
		let cognitive = (&self.best_position - &self.position) * (c1 * r1);
		let social = (global_best - &self.position) * (c2 * r2);
		self.velocity = &self.velocity * w + cognitive + social;
	}

	/// Move by the current velocity and re-evaluate; the personal best only
	/// changes on strict improvement.
	pub fn update_position<C>(&mut self, mut cost_of: C)
	where
		C: FnMut(&Array1<f64>) -> f64,
	{
		self.position = &self.position + &self.velocity;
		self.cost = cost_of(&self.position);
		if self.cost < self.best_cost {
			self.best_cost = self.cost;
			self.best_position = self.position.clone();
		}
	}
}

/// Collection of particles
#[derive(Debug, Clone)]
pub struct Swarm {
	pub particles: Vec<Particle>,
}

impl Swarm {
	/// Lowest personal best in the swarm; the first particle wins ties
	pub fn global_best(&self) -> Option<(&Array1<f64>, f64)> {
		let (i, cost) = argmin(self.particles.iter().map(|p| p.best_cost))?;
		Some((&self.particles[i].best_position, cost))
	}
}

/// Particle swarm configuration
pub struct PsoConfig {
	pub maxiter: usize,
	/// Number of particles
	pub popsize: usize,
	/// Inertia weight
	pub w: f64,
	/// Cognitive coefficient
	pub c1: f64,
	/// Social coefficient
	pub c2: f64,
	pub seed: Option<u64>,
	pub disp: bool,
	pub callback: Option<Callback>,
}

impl Default for PsoConfig {
	fn default() -> Self {
		Self { maxiter: 50, popsize: 20, w: 0.4, c1: 0.1, c2: 0.1, seed: None, disp: false, callback: None }
	}
}

/// Fluent builder for `PsoConfig`
pub struct PsoConfigBuilder {
	cfg: PsoConfig,
}

impl Default for PsoConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl PsoConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: PsoConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn w(mut self, v: f64) -> Self {
		self.cfg.w = v;
		self
	}
	pub fn c1(mut self, v: f64) -> Self {
		self.cfg.c1 = v;
		self
	}
	pub fn c2(mut self, v: f64) -> Self {
		self.cfg.c2 = v;
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
	pub fn build(self) -> PsoConfig {
		self.cfg
	}
}

/// Particle swarm optimizer bound to one objective
pub struct ParticleSwarm<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	objective: Objective<'a, F>,
	swarm: Swarm,
	config: PsoConfig,
	rng: StdRng,
}

impl<'a, F> ParticleSwarm<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	/// Draw and evaluate the swarm. Per particle, the position is drawn first,
	/// evaluated, then the initial velocity is drawn in [0, 1) per coordinate.
	pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>, config: PsoConfig) -> Result<Self> {
		let n = validate_bounds(&lower, &upper)?;
		require_population(config.popsize, "particles")?;
		require_finite(config.w, "w")?;
		require_finite(config.c1, "c1")?;
		require_finite(config.c2, "c2")?;

		let mut rng = make_rng(config.seed);
		let mut objective = Objective::new(func);
		let mut particles = Vec::with_capacity(config.popsize);
		for _ in 0..config.popsize {
			let position = uniform_point(&lower, &upper, &mut rng);
			let cost = objective.eval(&position);
			let velocity = unit_vector(n, &mut rng);
			particles.push(Particle::new(position, cost, velocity));
		}

		Ok(Self { objective, swarm: Swarm { particles }, config, rng })
	}

	pub fn swarm(&self) -> &Swarm {
		&self.swarm
	}

	/// Run `maxiter` iterations and report the swarm's best personal best.
	pub fn solve(&mut self) -> Result<SwarmReport> {
		let mut callback = self.config.callback.take();
		let result = self.run(&mut callback);
		self.config.callback = callback;
		result
	}

	fn run(&mut self, callback: &mut Option<Callback>) -> Result<SwarmReport> {
		let (w, c1, c2) = (self.config.w, self.config.c1, self.config.c2);
		let maxiter = self.config.maxiter;
		if self.config.disp {
			log::info!(
				"PSO init: {} particles, maxiter={}, w={}, c1={}, c2={}",
				self.swarm.particles.len(),
				maxiter,
				w,
				c1,
				c2
			);
		}

		let mut nit = 0;
		let mut message = format!("Maximum number of iterations reached: {}", maxiter);
		for iter in 1..=maxiter {
			nit = iter;
			for i in 0..self.swarm.particles.len() {
				let objective = &mut self.objective;
				self.swarm.particles[i].update_position(|x| objective.eval(x));
				// the swarm best is re-read per particle so later particles see earlier moves
				let global_best = self.global_best()?.0;
				self.swarm.particles[i].update_velocity(c1, c2, w, &global_best, &mut self.rng);
			}

			let (best_x, best_f) = self.global_best()?;
			if self.config.disp {
				log::info!("PSO iter {:4}  best_f={:.6e}", iter, best_f);
			}
			if let CallbackAction::Stop = notify(callback, &best_x, best_f, iter) {
				message = STOPPED_BY_CALLBACK.to_string();
				break;
			}
		}

		let (x, fun) = self.global_best()?;
		if self.config.disp {
			log::info!("PSO finished: {}", message);
		}
		Ok(SwarmReport { x, fun, success: true, message, nit, nfev: self.objective.nfev })
	}

	fn global_best(&self) -> Result<(Array1<f64>, f64)> {
		self.swarm
			.global_best()
			.map(|(x, f)| (x.clone(), f))
			.ok_or(SwarmError::EmptyPopulation { what: "particles" })
	}
}

/// Convenience function mirroring `bee_colony`, `ant_colony` and `bat_algorithm`
pub fn particle_swarm<F>(func: &F, bounds: &[(f64, f64)], config: PsoConfig) -> Result<SwarmReport>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let (lower, upper) = bounds_to_arrays(bounds)?;
	ParticleSwarm::new(func, lower, upper, config)?.solve()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	#[test]
	fn test_update_velocity_blend() {
		let mut p = Particle::new(Array1::from(vec![1.0, -1.0]), 2.0, Array1::from(vec![0.5, 0.5]));
		p.best_position = Array1::from(vec![2.0, 0.0]);
		let gbest = Array1::from(vec![0.0, 0.0]);

		let mut rng = StdRng::seed_from_u64(3);
		let mut reference = StdRng::seed_from_u64(3);
		let r1 = reference.random::<f64>();
		let r2 = reference.random::<f64>();

		p.update_velocity(0.3, 0.7, 0.9, &gbest, &mut rng);
		let expected_0 = 0.9 * 0.5 + 0.3 * r1 * (2.0 - 1.0) + 0.7 * r2 * (0.0 - 1.0);
		let expected_1 = 0.9 * 0.5 + 0.3 * r1 * (0.0 + 1.0) + 0.7 * r2 * (0.0 + 1.0);
		assert!((p.velocity[0] - expected_0).abs() < 1e-12);
		assert!((p.velocity[1] - expected_1).abs() < 1e-12);
	}

	#[test]
	fn test_personal_best_only_on_strict_improvement() {
		let mut p = Particle::new(Array1::from(vec![1.0]), 1.0, Array1::from(vec![1.0]));
		p.update_position(|_| 1.0);
		assert_eq!(p.position[0], 2.0);
		assert_eq!(p.best_position[0], 1.0);

		p.update_position(|_| 0.5);
		assert_eq!(p.best_position[0], 3.0);
		assert_eq!(p.best_cost, 0.5);
	}

	#[test]
	fn test_global_best_first_wins() {
		let a = Particle::new(Array1::from(vec![1.0]), 0.0, Array1::zeros(1));
		let b = Particle::new(Array1::from(vec![2.0]), 0.0, Array1::zeros(1));
		let swarm = Swarm { particles: vec![a, b] };
		let (x, f) = swarm.global_best().unwrap();
		assert_eq!(x[0], 1.0);
		assert_eq!(f, 0.0);
		assert!(Swarm { particles: vec![] }.global_best().is_none());
	}

	#[test]
	fn test_initial_velocity_in_unit_box() {
		let f = |x: &Array1<f64>| x.sum();
		let lower = Array1::from(vec![-3.0, -3.0, -3.0]);
		let upper = Array1::from(vec![3.0, 3.0, 3.0]);
		let config = PsoConfigBuilder::new().seed(11).popsize(8).build();
		let pso = ParticleSwarm::new(&f, lower, upper, config).unwrap();
		for p in &pso.swarm().particles {
			assert!(p.velocity.iter().all(|&v| (0.0..1.0).contains(&v)));
			assert_eq!(p.position, p.best_position);
		}
	}

	#[test]
	fn test_later_particle_sees_best_improved_in_same_sweep() {
		let f = |x: &Array1<f64>| (x[0] - 10.0).abs();
		let config = PsoConfigBuilder::new().seed(5).popsize(2).maxiter(1).w(0.0).c1(0.0).c2(1.0).build();
		let mut pso = ParticleSwarm::new(&f, Array1::from(vec![0.0]), Array1::from(vec![10.0]), config).unwrap();
		// particle 1 leads before the sweep; particle 0 jumps past it to 9
		pso.swarm.particles = vec![
			Particle::new(Array1::from(vec![0.0]), 10.0, Array1::from(vec![9.0])),
			Particle::new(Array1::from(vec![5.0]), 5.0, Array1::from(vec![0.0])),
		];
		let mut reference = pso.rng.clone();
		let _ = (reference.random::<f64>(), reference.random::<f64>());
		let _r1 = reference.random::<f64>();
		let r2 = reference.random::<f64>();

		let report = pso.solve().unwrap();
		assert_eq!(report.x[0], 9.0);
		assert_eq!(report.fun, 1.0);
		let particles = &pso.swarm().particles;
		assert_eq!(particles[0].velocity[0], 0.0);
		assert_eq!(particles[1].position[0], 5.0);
		assert!(r2 > 0.0);
		assert!((particles[1].velocity[0] - r2 * (9.0 - 5.0)).abs() < 1e-12);
	}
}

