//! Recording wrapper around [`optimize`] for benchmarks and tests

use std::fs::{File, create_dir_all};
use std::io::BufWriter;

use ndarray::Array1;

use crate::recorder::OptimizationRecorder;
use crate::{OptimizerConfig, Result, SwarmReport, optimize};

/// Run any optimizer with per-iteration recording.
///
/// Writes `<output_dir>/<function_name>.csv` (one row per iteration) and
/// `<output_dir>/<function_name>.json` (the final report). The recorder
/// replaces any callback already set on `config`. Returns the report and the
/// CSV path.
pub fn run_recorded<F>(
	function_name: &str,
	func: &F,
	bounds: &[(f64, f64)],
	mut config: OptimizerConfig,
	output_dir: &str,
) -> Result<(SwarmReport, String)>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	create_dir_all(output_dir)?;

	let recorder = OptimizationRecorder::new(function_name);
	config.set_callback(recorder.create_callback());
	let algorithm = config.algorithm();

	let report = optimize(func, bounds, config)?;
	log::debug!(
		"{} on {}: fun={:.6e} after {} iterations, {} evaluations",
		algorithm,
		function_name,
		report.fun,
		report.nit,
		report.nfev
	);

	let csv_path = recorder.save_to_csv(output_dir)?;
	let json_path = format!("{}/{}.json", output_dir, function_name);
	serde_json::to_writer_pretty(BufWriter::new(File::create(&json_path)?), &report)?;

	Ok((report, csv_path))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::PsoConfigBuilder;

	#[test]
	fn test_run_recorded_basic() {
		let quadratic = |x: &Array1<f64>| -> f64 { x.iter().map(|&xi| xi * xi).sum() };
		let dir = tempfile::tempdir().unwrap();
		let output_dir = dir.path().to_str().unwrap();
		let config = PsoConfigBuilder::new().seed(42).maxiter(20).popsize(10).build();

		let (report, csv_path) =
			run_recorded("test_quadratic", &quadratic, &[(-5.0, 5.0), (-5.0, 5.0)], config.into(), output_dir)
				.unwrap();
		assert!(std::path::Path::new(&csv_path).exists());
		let rows = std::fs::read_to_string(&csv_path).unwrap().lines().count();
		assert_eq!(rows, report.nit + 1);

		let json = std::fs::read_to_string(format!("{}/test_quadratic.json", output_dir)).unwrap();
		let parsed: SwarmReport = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed.nfev, report.nfev);
		assert_eq!(parsed.x.len(), 2);
	}
}
