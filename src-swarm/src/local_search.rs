//! Derivative-free local refinement
//!
//! The ant colony refines each ant's coordinates with a [`LocalSearch`]
//! before scoring. Implementations never look at bounds: the returned point
//! may sit outside the initialisation box.

use std::cell::Cell;

use ndarray::Array1;

/// Outcome of one local minimisation
#[derive(Debug, Clone)]
pub struct LocalResult {
	pub x: Array1<f64>,
	/// Objective at `x` when the search evaluated it
	pub fun: Option<f64>,
	pub nfev: usize,
}

/// Local minimiser started from a given point
pub trait LocalSearch: Send + Sync {
	fn minimize(&self, func: &(dyn Fn(&Array1<f64>) -> f64 + Sync), x0: &Array1<f64>) -> LocalResult;
}

/// Search used when none is configured: NLopt COBYLA when the `nlopt`
/// feature is on, [`NelderMead`] otherwise.
pub fn default_local_search() -> Box<dyn LocalSearch> {
	#[cfg(feature = "nlopt")]
	{
		Box::new(NloptLocal::default())
	}
	#[cfg(not(feature = "nlopt"))]
	{
		Box::new(NelderMead::default())
	}
}

/// Identity search: returns the start point untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalSearch;

impl LocalSearch for NoLocalSearch {
	fn minimize(&self, _func: &(dyn Fn(&Array1<f64>) -> f64 + Sync), x0: &Array1<f64>) -> LocalResult {
		LocalResult { x: x0.clone(), fun: None, nfev: 0 }
	}
}

/// Nelder–Mead downhill simplex with the usual coefficients
/// (reflection 1, expansion 2, contraction 1/2, shrink 1/2).
#[derive(Debug, Clone)]
pub struct NelderMead {
	/// Evaluation budget, `200 * n` when `None`
	pub maxeval: Option<usize>,
	/// Fixed edge of the initial simplex; `None` uses 5% of each coordinate
	/// (0.00025 for zero coordinates)
	pub initial_step: Option<f64>,
	/// Stop when every vertex is within `xatol` of the best one
	pub xatol: f64,
	/// and every vertex cost within `fatol` of the best cost
	pub fatol: f64,
}

impl Default for NelderMead {
	fn default() -> Self {
		Self { maxeval: None, initial_step: None, xatol: 1e-8, fatol: 1e-10 }
	}
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
	fn initial_simplex(&self, x0: &Array1<f64>) -> Vec<Array1<f64>> {
		let mut simplex = Vec::with_capacity(x0.len() + 1);
		simplex.push(x0.clone());
		for k in 0..x0.len() {
			let mut y = x0.clone();
			match self.initial_step {
				Some(step) => y[k] += step,
				None if y[k] != 0.0 => y[k] *= 1.05,
				None => y[k] = 0.00025,
			}
			simplex.push(y);
		}
		simplex
	}
}

impl LocalSearch for NelderMead {
	fn minimize(&self, func: &(dyn Fn(&Array1<f64>) -> f64 + Sync), x0: &Array1<f64>) -> LocalResult {
		let n = x0.len();
		if n == 0 {
			return LocalResult { x: x0.clone(), fun: None, nfev: 0 };
		}
		let maxeval = self.maxeval.unwrap_or(200 * n);
		let nfev = Cell::new(0usize);
		let eval = |x: &Array1<f64>| {
			nfev.set(nfev.get() + 1);
			func(x)
		};

		let mut vertices: Vec<(Array1<f64>, f64)> = self
			.initial_simplex(x0)
			.into_iter()
			.map(|x| {
				let f = eval(&x);
				(x, f)
			})
			.collect();

		loop {
			vertices.sort_by(|a, b| a.1.total_cmp(&b.1));

			let (best_x, best_f) = (&vertices[0].0, vertices[0].1);
			let f_spread = vertices[1..].iter().map(|v| (v.1 - best_f).abs()).fold(0.0, f64::max);
			let x_spread = vertices[1..]
				.iter()
				.map(|v| (&v.0 - best_x).mapv(f64::abs).fold(0.0, |m: f64, &d| m.max(d)))
				.fold(0.0, f64::max);
			if (x_spread <= self.xatol && f_spread <= self.fatol) || nfev.get() >= maxeval {
				break;
			}

			let centroid = vertices[..n].iter().fold(Array1::<f64>::zeros(n), |acc, v| acc + &v.0) / n as f64;
			let (worst_x, worst_f) = (vertices[n].0.clone(), vertices[n].1);
			let second_worst_f = vertices[n - 1].1;

			let xr = &centroid + &((&centroid - &worst_x) * REFLECTION);
			let fr = eval(&xr);
			if fr < best_f {
				let xe = &centroid + &((&xr - &centroid) * EXPANSION);
				let fe = eval(&xe);
				vertices[n] = if fe < fr { (xe, fe) } else { (xr, fr) };
				continue;
			}
			if fr < second_worst_f {
				vertices[n] = (xr, fr);
				continue;
			}

			let contracted = if fr < worst_f {
				let xc = &centroid + &((&xr - &centroid) * CONTRACTION);
				let fc = eval(&xc);
				(fc <= fr).then_some((xc, fc))
			} else {
				let xcc = &centroid + &((&worst_x - &centroid) * CONTRACTION);
				let fcc = eval(&xcc);
				(fcc < worst_f).then_some((xcc, fcc))
			};
			match contracted {
				Some(vertex) => vertices[n] = vertex,
				None => {
					let anchor = vertices[0].0.clone();
					for vertex in vertices.iter_mut().skip(1) {
						let x = &anchor + &((&vertex.0 - &anchor) * SHRINK);
						let f = eval(&x);
						*vertex = (x, f);
					}
				}
			}
		}

		let (x, fun) = vertices.swap_remove(0);
		LocalResult { x, fun: Some(fun), nfev: nfev.get() }
	}
}

#[cfg(feature = "nlopt")]
pub use self::nlopt_local::NloptLocal;

#[cfg(feature = "nlopt")]
mod nlopt_local {
	use std::cell::Cell;

	use ndarray::Array1;
	use nlopt::{Algorithm as NlAlgorithm, Nlopt, Target as NlTarget};

	use super::{LocalResult, LocalSearch};

	/// Local search delegated to NLopt
	#[derive(Debug, Clone)]
	pub struct NloptLocal {
		/// "cobyla", "neldermead" or "sbplx"
		pub algo: String,
		/// Evaluation budget, `200 * n` when `None`
		pub maxeval: Option<usize>,
		pub initial_step: f64,
	}

	impl Default for NloptLocal {
		fn default() -> Self {
			Self { algo: "cobyla".to_string(), maxeval: None, initial_step: 0.5 }
		}
	}

	fn parse_local_algo(name: &str) -> NlAlgorithm {
		match name.to_lowercase().as_str() {
			"neldermead" => NlAlgorithm::Neldermead,
			"sbplx" => NlAlgorithm::Sbplx,
			"cobyla" => NlAlgorithm::Cobyla,
			_ => NlAlgorithm::Cobyla,
		}
	}

	struct LocalData<'c> {
		func: &'c (dyn Fn(&Array1<f64>) -> f64 + Sync),
		nfev: &'c Cell<usize>,
	}

	fn nlopt_obj_wrapper(x: &[f64], _grad: Option<&mut [f64]>, data: &mut LocalData) -> f64 {
		data.nfev.set(data.nfev.get() + 1);
		(data.func)(&Array1::from(x.to_vec()))
	}

	impl LocalSearch for NloptLocal {
		fn minimize(&self, func: &(dyn Fn(&Array1<f64>) -> f64 + Sync), x0: &Array1<f64>) -> LocalResult {
			let nfev = Cell::new(0usize);
			let data = LocalData { func, nfev: &nfev };
			let mut opt = Nlopt::new(parse_local_algo(&self.algo), x0.len(), nlopt_obj_wrapper, NlTarget::Minimize, data);
			let _ = opt.set_initial_step1(self.initial_step);
			let _ = opt.set_maxeval(self.maxeval.unwrap_or(200 * x0.len()) as u32);
			let _ = opt.set_ftol_rel(1e-9);
			let _ = opt.set_xtol_rel(1e-8);
			let mut x = x0.to_vec();
			let fun = match opt.optimize(&mut x) {
				Ok((_status, val)) => val,
				Err((_e, val)) => val,
			};
			LocalResult { x: Array1::from(x), fun: Some(fun), nfev: nfev.get() }
		}
	}
}
