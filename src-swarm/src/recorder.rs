use std::fs::create_dir_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{Callback, CallbackAction, Result, SwarmIntermediate};

/// Records the incumbent reported to the per-iteration callback
#[derive(Debug)]
pub struct OptimizationRecorder {
	/// Used as the CSV file stem
	function_name: String,
	records: Arc<Mutex<Vec<OptimizationRecord>>>,
	best_value: Arc<Mutex<Option<f64>>>,
}

/// Incumbent after one iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRecord {
	pub iteration: usize,
	pub x: Vec<f64>,
	pub best_result: f64,
	/// Strictly below every earlier `best_result`
	pub is_improvement: bool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
	m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OptimizationRecorder {
	pub fn new(function_name: impl Into<String>) -> Self {
		Self {
			function_name: function_name.into(),
			records: Arc::new(Mutex::new(Vec::new())),
			best_value: Arc::new(Mutex::new(None)),
		}
	}

	pub fn function_name(&self) -> &str {
		&self.function_name
	}

	/// Callback appending one record per iteration; never stops the run.
	pub fn create_callback(&self) -> Callback {
		let records = self.records.clone();
		let best_value = self.best_value.clone();

		Box::new(move |intermediate: &SwarmIntermediate| -> CallbackAction {
			let is_improvement = {
				let mut best_guard = lock(&best_value);
				let improved = best_guard.is_none_or(|best| intermediate.fun < best);
				if improved {
					*best_guard = Some(intermediate.fun);
				}
				improved
			};

			lock(&records).push(OptimizationRecord {
				iteration: intermediate.iter,
				x: intermediate.x.to_vec(),
				best_result: intermediate.fun,
				is_improvement,
			});
			CallbackAction::Continue
		})
	}

	/// Write `<output_dir>/<function_name>.csv` with columns
	/// `iteration,x0..x{n-1},best_result,is_improvement`; returns its path.
	pub fn save_to_csv(&self, output_dir: &str) -> Result<String> {
		create_dir_all(output_dir)?;
		let filename = format!("{}/{}.csv", output_dir, self.function_name);
		let mut writer = csv::Writer::from_path(&filename)?;

		let records = lock(&self.records);
		if let Some(first) = records.first() {
			let mut header = vec!["iteration".to_string()];
			header.extend((0..first.x.len()).map(|i| format!("x{}", i)));
			header.push("best_result".to_string());
			header.push("is_improvement".to_string());
			writer.write_record(&header)?;
		}
		for record in records.iter() {
			let mut row = vec![record.iteration.to_string()];
			row.extend(record.x.iter().map(|xi| format!("{:.16}", xi)));
			row.push(format!("{:.16}", record.best_result));
			row.push(record.is_improvement.to_string());
			writer.write_record(&row)?;
		}
		writer.flush()?;
		Ok(filename)
	}

	pub fn get_records(&self) -> Vec<OptimizationRecord> {
		lock(&self.records).clone()
	}

	pub fn num_iterations(&self) -> usize {
		lock(&self.records).len()
	}

	pub fn clear(&self) {
		lock(&self.records).clear();
		*lock(&self.best_value) = None;
	}

	/// Last recorded incumbent
	pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
		lock(&self.records).last().map(|r| (r.x.clone(), r.best_result))
	}

	/// True when `best_result` never increases from one record to the next
	pub fn is_monotone(&self) -> bool {
		lock(&self.records).windows(2).all(|w| w[1].best_result <= w[0].best_result)
	}
}
