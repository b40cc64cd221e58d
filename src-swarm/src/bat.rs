//! Bat Algorithm
//!
//! Bats move with a frequency tuned velocity pulled by the cloud's best
//! position, then take random flights whose length scales with the cloud's
//! average loudness. A bat that beats the iteration's best cost while its
//! loudness allows it becomes quieter and pulses more often, and the
//! iteration's best position is taken as the solution record.
//!
//! Positions are not clamped to the bounds after initialisation.

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;

use crate::init_random::uniform_point;
use crate::{
	Callback, CallbackAction, Objective, Result, STOPPED_BY_CALLBACK, SwarmError, SwarmReport, argmin,
	bounds_to_arrays, make_rng, notify, require_finite, require_population, validate_bounds,
};

/// One bat of the cloud
#[derive(Debug, Clone)]
pub struct Bat {
	pub position: Array1<f64>,
	pub velocity: Array1<f64>,
	pub cost: f64,
	pub frequency_min: f64,
	pub frequency_max: f64,
	pub frequency: f64,
	/// Starts at 1, decays geometrically on accepted moves
	pub loudness: f64,
	pub pulse_rate_initial: f64,
	pub pulse_rate: f64,
}

impl Bat {
	/// Frequency is drawn first, then one variate used for both the initial
	/// and the current pulse rate.
	pub fn new<R: Rng + ?Sized>(
		position: Array1<f64>,
		velocity: Array1<f64>,
		cost: f64,
		frequency_min: f64,
		frequency_max: f64,
		rng: &mut R,
	) -> Self {
		let frequency = frequency_min + (frequency_max - frequency_min) * rng.random::<f64>();
		let pulse_rate = rng.random::<f64>();
		Self {
			position,
			velocity,
			cost,
			frequency_min,
			frequency_max,
			frequency,
			loudness: 1.0,
			pulse_rate_initial: pulse_rate,
			pulse_rate,
		}
	}

	pub fn update_frequency<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		let beta = rng.random::<f64>();
		self.frequency = self.frequency_min + (self.frequency_max - self.frequency_min) * beta;
	}

	/// `v <- v + (x - gbest) * frequency`
	pub fn update_velocity(&mut self, global_best: &Array1<f64>) {
		self.velocity = &self.velocity + &((&self.position - global_best) * self.frequency);
	}

	pub fn update_position(&mut self) {
		self.position = &self.position + &self.velocity;
	}

	/// `x <- base + eps * average_loudness`, one scalar `eps` for all coordinates
	pub fn fly_randomly<R: Rng + ?Sized>(&mut self, average_loudness: f64, base: &Array1<f64>, rng: &mut R) {
		let step = rng.random::<f64>() * average_loudness;
		self.position = base.mapv(|b| b + step);
	}

	pub fn update_loudness(&mut self, alfa: f64) {
		self.loudness *= alfa;
	}

	/// `r <- r0 * (1 - exp(-gamma * t))`
	pub fn update_pulse_rate(&mut self, gamma: f64, t: usize) {
		self.pulse_rate = self.pulse_rate_initial * (1.0 - (-gamma * t as f64).exp());
	}
}

/// The population of bats
#[derive(Debug, Clone)]
pub struct Cloud {
	pub bats: Vec<Bat>,
}

impl Cloud {
	/// Position and cost of the lowest cost bat, first one on ties
	pub fn best(&self) -> Option<(&Array1<f64>, f64)> {
		let (i, cost) = argmin(self.bats.iter().map(|b| b.cost))?;
		Some((&self.bats[i].position, cost))
	}

	pub fn average_loudness(&self) -> f64 {
		if self.bats.is_empty() {
			return 0.0;
		}
		self.bats.iter().map(|b| b.loudness).sum::<f64>() / self.bats.len() as f64
	}
}

/// Bat algorithm configuration
pub struct BatConfig {
	pub maxiter: usize,
	/// Number of bats
	pub popsize: usize,
	/// Loudness decay factor, in (0, 1]
	pub alfa: f64,
	/// Pulse rate growth, > 0
	pub gamma: f64,
	pub frequency_min: f64,
	pub frequency_max: f64,
	pub seed: Option<u64>,
	pub disp: bool,
	pub callback: Option<Callback>,
}

impl Default for BatConfig {
	fn default() -> Self {
		Self {
			maxiter: 50,
			popsize: 20,
			alfa: 0.9,
			gamma: 0.9,
			frequency_min: 0.0,
			frequency_max: 100.0,
			seed: None,
			disp: false,
			callback: None,
		}
	}
}

/// Fluent builder for `BatConfig`
pub struct BatConfigBuilder {
	cfg: BatConfig,
}

impl Default for BatConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl BatConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: BatConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn alfa(mut self, v: f64) -> Self {
		self.cfg.alfa = v;
		self
	}
	pub fn gamma(mut self, v: f64) -> Self {
		self.cfg.gamma = v;
		self
	}
	pub fn frequency(mut self, min: f64, max: f64) -> Self {
		self.cfg.frequency_min = min;
		self.cfg.frequency_max = max;
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
	pub fn build(self) -> BatConfig {
		self.cfg
	}
}

/// Bat algorithm optimizer bound to one objective
pub struct BatAlgorithm<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	objective: Objective<'a, F>,
	cloud: Cloud,
	config: BatConfig,
	rng: StdRng,
}

impl<'a, F> BatAlgorithm<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	/// Per bat: position then velocity uniform in the box, then frequency and pulse rate.
	pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>, config: BatConfig) -> Result<Self> {
		validate_bounds(&lower, &upper)?;
		require_population(config.popsize, "bats")?;
		require_finite(config.gamma, "gamma")?;
		require_finite(config.frequency_min, "frequency_min")?;
		require_finite(config.frequency_max, "frequency_max")?;
		if !(config.alfa > 0.0 && config.alfa <= 1.0) {
			return Err(SwarmError::InvalidParameter {
				name: "alfa",
				reason: format!("must lie in (0, 1], got {}", config.alfa),
			});
		}
		if config.gamma <= 0.0 {
			return Err(SwarmError::InvalidParameter {
				name: "gamma",
				reason: format!("must be > 0, got {}", config.gamma),
			});
		}
		if config.frequency_max < config.frequency_min {
			return Err(SwarmError::InvalidParameter {
				name: "frequency_max",
				reason: format!("{} is below frequency_min {}", config.frequency_max, config.frequency_min),
			});
		}

		let mut rng = make_rng(config.seed);
		let mut objective = Objective::new(func);
		let mut bats = Vec::with_capacity(config.popsize);
		for _ in 0..config.popsize {
			let position = uniform_point(&lower, &upper, &mut rng);
			let velocity = uniform_point(&lower, &upper, &mut rng);
			let cost = objective.eval(&position);
			bats.push(Bat::new(position, velocity, cost, config.frequency_min, config.frequency_max, &mut rng));
		}

		Ok(Self { objective, cloud: Cloud { bats }, config, rng })
	}

	pub fn cloud(&self) -> &Cloud {
		&self.cloud
	}

	/// Run `maxiter` iterations and report the solution record.
	pub fn solve(&mut self) -> Result<SwarmReport> {
		let mut callback = self.config.callback.take();
		let result = self.run(&mut callback);
		self.config.callback = callback;
		result
	}

	fn run(&mut self, callback: &mut Option<Callback>) -> Result<SwarmReport> {
		let (alfa, gamma) = (self.config.alfa, self.config.gamma);
		let maxiter = self.config.maxiter;
		if self.config.disp {
			log::info!(
				"BA init: {} bats, maxiter={}, alfa={}, gamma={}, frequency=[{}, {}]",
				self.cloud.bats.len(),
				maxiter,
				alfa,
				gamma,
				self.config.frequency_min,
				self.config.frequency_max
			);
		}

		let (mut solution_x, mut solution_cost) = self.cloud_best()?;
		let mut nit = 0;
		let mut message = format!("Maximum number of iterations reached: {}", maxiter);
		for t in 1..=maxiter {
			nit = t;
			let (best_x, best_cost) = self.cloud_best()?;
			let average_loudness = self.cloud.average_loudness();
			let mut accepted = 0;
			for bat in self.cloud.bats.iter_mut() {
				let r = self.rng.random::<f64>();
				bat.update_frequency(&mut self.rng);
				bat.update_velocity(&best_x);
				bat.update_position();
				if r > bat.pulse_rate {
					bat.fly_randomly(average_loudness, &best_x, &mut self.rng);
				}
				let own = bat.position.clone();
				bat.fly_randomly(average_loudness, &own, &mut self.rng);
				bat.cost = self.objective.eval(&bat.position);

				if r < bat.loudness && bat.cost < best_cost {
					// the record only moves to a strictly better position
					if best_cost < solution_cost {
						solution_x = best_x.clone();
						solution_cost = best_cost;
					}
					bat.update_loudness(alfa);
					bat.update_pulse_rate(gamma, t);
					accepted += 1;
				}
			}

			if self.config.disp && (t <= 5 || t % 10 == 0) {
				log::info!("BA iter {:4}  best_f={:.6e}  accepted={}", t, solution_cost, accepted);
			}
			if let CallbackAction::Stop = notify(callback, &solution_x, solution_cost, t) {
				message = STOPPED_BY_CALLBACK.to_string();
				break;
			}
		}

		if self.config.disp {
			log::info!("BA finished: {}", message);
		}
		Ok(SwarmReport {
			x: solution_x,
			fun: solution_cost,
			success: true,
			message,
			nit,
			nfev: self.objective.nfev,
		})
	}

	fn cloud_best(&self) -> Result<(Array1<f64>, f64)> {
		self.cloud.best().map(|(x, f)| (x.clone(), f)).ok_or(SwarmError::EmptyPopulation { what: "bats" })
	}
}

/// Convenience function mirroring `particle_swarm`
pub fn bat_algorithm<F>(func: &F, bounds: &[(f64, f64)], config: BatConfig) -> Result<SwarmReport>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let (lower, upper) = bounds_to_arrays(bounds)?;
	BatAlgorithm::new(func, lower, upper, config)?.solve()
}
