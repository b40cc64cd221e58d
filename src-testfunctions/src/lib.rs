//! Benchmark objectives for the swarmopt test suite
//!
//! A small collection of classic test functions together with the metadata
//! (bounds, known minima) the integration tests use to set up runs.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use swarmopt_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds_vec("sphere", (-5.0, 5.0));
//! assert_eq!(bounds.len(), 2);
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Metadata for a test function
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
	/// Function name
	pub name: String,
	/// Bounds for each dimension (min, max) in the default dimensionality
	pub bounds: Vec<(f64, f64)>,
	/// Global minima locations and values
	pub global_minima: Vec<(Vec<f64>, f64)>,
	/// Whether the function is multimodal
	pub multimodal: bool,
	/// Dimensions the function is usually run in
	pub dimensions: Vec<usize>,
	/// The function itself
	pub function: fn(&Array1<f64>) -> f64,
}

fn entry(
	name: &str,
	bounds: Vec<(f64, f64)>,
	global_minima: Vec<(Vec<f64>, f64)>,
	multimodal: bool,
	dimensions: Vec<usize>,
	function: fn(&Array1<f64>) -> f64,
) -> (String, FunctionMetadata) {
	(
		name.to_string(),
		FunctionMetadata {
			name: name.to_string(),
			bounds,
			global_minima,
			multimodal,
			dimensions,
			function,
		},
	)
}

/// Metadata for every function in the crate, keyed by name
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
	HashMap::from([
		entry("sphere", vec![(-5.12, 5.12); 2], vec![(vec![0.0, 0.0], 0.0)], false, vec![2, 3, 5], sphere),
		entry("quadratic", vec![(-5.0, 5.0); 2], vec![(vec![1.0, 1.0], 0.0)], false, vec![2, 5], quadratic),
		entry(
			"lifted_sphere",
			vec![(-5.0, 5.0); 2],
			vec![(vec![0.0, 0.0], 1.0)],
			false,
			vec![2, 3],
			lifted_sphere,
		),
		entry(
			"sunken_sphere",
			vec![(-5.0, 5.0); 2],
			vec![(vec![0.0, 0.0], -10.0)],
			false,
			vec![2, 3],
			sunken_sphere,
		),
		entry("rosenbrock", vec![(-5.0, 10.0); 2], vec![(vec![1.0, 1.0], 0.0)], false, vec![2, 5], rosenbrock),
		entry("booth", vec![(-10.0, 10.0); 2], vec![(vec![1.0, 3.0], 0.0)], false, vec![2], booth),
		entry("matyas", vec![(-10.0, 10.0); 2], vec![(vec![0.0, 0.0], 0.0)], false, vec![2], matyas),
		entry("rastrigin", vec![(-5.12, 5.12); 2], vec![(vec![0.0, 0.0], 0.0)], true, vec![2, 5], rastrigin),
		entry("ackley", vec![(-32.768, 32.768); 2], vec![(vec![0.0, 0.0], 0.0)], true, vec![2, 5], ackley),
		entry(
			"himmelblau",
			vec![(-5.0, 5.0); 2],
			vec![
				(vec![3.0, 2.0], 0.0),
				(vec![-2.805118, 3.131312], 0.0),
				(vec![-3.779310, -3.283186], 0.0),
				(vec![3.584428, -1.848126], 0.0),
			],
			true,
			vec![2],
			himmelblau,
		),
		entry("step", vec![(-100.0, 100.0); 2], vec![(vec![0.0, 0.0], 0.0)], true, vec![2, 5], step),
	])
}

/// Bounds for a function from its metadata, `None` if unknown
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
	get_function_metadata().get(function_name).map(|meta| meta.bounds.clone())
}

/// Bounds for a function, falling back to `default_bounds` in 2D
pub fn get_function_bounds_vec(function_name: &str, default_bounds: (f64, f64)) -> Vec<(f64, f64)> {
	get_function_bounds(function_name).unwrap_or_else(|| vec![default_bounds; 2])
}

/// Same interval repeated `n` times
pub fn uniform_bounds(n: usize, lower: f64, upper: f64) -> Vec<(f64, f64)> {
	vec![(lower, upper); n]
}
