//! Error type shared by every optimizer in the crate

/// Failures reported by optimizer construction and runs
#[derive(Debug, thiserror::Error)]
pub enum SwarmError {
	#[error("population `{what}` must not be empty")]
	EmptyPopulation { what: &'static str },

	#[error("problem dimensionality must be at least 1")]
	ZeroDimension,

	#[error("lower/upper size mismatch: {lower} lower bounds vs {upper} upper bounds")]
	BoundsMismatch { lower: usize, upper: usize },

	#[error("bound[{index}] has upper {upper} < lower {lower}")]
	InvertedBound { index: usize, lower: f64, upper: f64 },

	#[error("invalid parameter `{name}`: {reason}")]
	InvalidParameter { name: &'static str, reason: String },

	#[error("{context}: weights sum to {sum}, a positive total is required")]
	DegenerateDistribution { context: &'static str, sum: f64 },

	#[error("{context}: weight {weight} at index {index} is negative")]
	NegativeWeight { context: &'static str, index: usize, weight: f64 },

	#[error("pheromone deposit requires a positive error, got {0}")]
	NonPositiveDeposit(f64),

	#[error("no ant holds a complete location")]
	NoCompleteAnt,

	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("csv error: {0}")]
	Csv(#[from] csv::Error),

	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SwarmError>;
