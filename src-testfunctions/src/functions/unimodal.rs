//! Unimodal benchmark objectives
//!
//! One global minimum each; used to check that the swarms actually descend.

use ndarray::Array1;

/// Sphere function
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn sphere(x: &Array1<f64>) -> f64 {
	x.iter().map(|&xi| xi * xi).sum()
}

/// Shifted quadratic bowl centred on (1, 1, ..., 1)
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
pub fn quadratic(x: &Array1<f64>) -> f64 {
	x.iter().map(|&xi| (xi - 1.0).powi(2)).sum()
}

/// Sphere lifted by a constant; strictly positive everywhere
/// Global minimum: f(x) = 1 at x = (0, 0, ..., 0)
pub fn lifted_sphere(x: &Array1<f64>) -> f64 {
	1.0 + sphere(x)
}

/// Sphere sunk below zero; negative near the optimum
/// Global minimum: f(x) = -10 at x = (0, 0, ..., 0)
pub fn sunken_sphere(x: &Array1<f64>) -> f64 {
	sphere(x) - 10.0
}

/// Rosenbrock function, N-dimensional
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
	x.windows(2)
		.into_iter()
		.map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
		.sum()
}

/// Booth function, 2D
/// Global minimum: f(x) = 0 at x = (1, 3)
/// Bounds: x_i in [-10, 10]
pub fn booth(x: &Array1<f64>) -> f64 {
	(x[0] + 2.0 * x[1] - 7.0).powi(2) + (2.0 * x[0] + x[1] - 5.0).powi(2)
}

/// Matyas function, 2D
/// Global minimum: f(x) = 0 at x = (0, 0)
/// Bounds: x_i in [-10, 10]
pub fn matyas(x: &Array1<f64>) -> f64 {
	0.26 * (x[0] * x[0] + x[1] * x[1]) - 0.48 * x[0] * x[1]
}
