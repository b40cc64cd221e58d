//! Multimodal benchmark objectives
//!
//! Many local minima; these stress the exploration side of the swarms.

use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Rastrigin function, N-dimensional
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
	let n = x.len() as f64;
	10.0 * n + x.iter().map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos()).sum::<f64>()
}

/// Ackley function, N-dimensional
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
	let n = x.len() as f64;
	let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
	let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
	-20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Himmelblau function, 2D, four global minima
/// Global minimum: f(x) = 0 at (3, 2), (-2.805118, 3.131312),
/// (-3.779310, -3.283186), (3.584428, -1.848126)
/// Bounds: x_i in [-5, 5]
pub fn himmelblau(x: &Array1<f64>) -> f64 {
	(x[0] * x[0] + x[1] - 11.0).powi(2) + (x[0] + x[1] * x[1] - 7.0).powi(2)
}

/// Step function, discontinuous plateaus
/// Global minimum: f(x) = 0 for x_i in [-0.5, 0.5)
/// Bounds: x_i in [-100, 100]
pub fn step(x: &Array1<f64>) -> f64 {
	x.iter().map(|&xi| (xi + 0.5).floor().powi(2)).sum()
}
