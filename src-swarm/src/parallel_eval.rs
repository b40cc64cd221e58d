//! Optional rayon fan-out for work that consumes no random draws

use rayon::prelude::*;

/// Parallel evaluation switch
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
	/// Evaluate on the rayon pool instead of the calling thread
	pub enabled: bool,
	/// Size of the global rayon pool; only the first request in a process takes effect
	pub num_threads: Option<usize>,
}

pub(crate) fn configure_threads(config: &ParallelConfig) {
	if let Some(n) = config.num_threads {
		// the global pool can only be built once
		let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
	}
}

/// Map `f` over `items`, results in input order in both modes.
pub(crate) fn map_in_order<T, U, G>(items: &[T], f: G, config: &ParallelConfig) -> Vec<U>
where
	T: Sync,
	U: Send,
	G: Fn(&T) -> U + Sync,
{
	if config.enabled {
		items.par_iter().map(|t| f(t)).collect()
	} else {
		items.iter().map(|t| f(t)).collect()
	}
}
