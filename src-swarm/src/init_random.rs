use ndarray::Array1;
use rand::Rng;

/// Draw one point uniformly in the box `[lower, upper]`, one variate per coordinate.
pub(crate) fn uniform_point<R: Rng + ?Sized>(
	lower: &Array1<f64>,
	upper: &Array1<f64>,
	rng: &mut R,
) -> Array1<f64> {
	lower.iter().zip(upper.iter()).map(|(&lo, &hi)| lo + rng.random::<f64>() * (hi - lo)).collect()
}

/// Vector of `n` variates in [0, 1).
pub(crate) fn unit_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
	(0..n).map(|_| rng.random::<f64>()).collect()
}
