use swarmopt::{BatAlgorithm, BatConfigBuilder, bat_algorithm, bounds_to_arrays};
use swarmopt_testfunctions::{sphere, uniform_bounds};

#[test]
fn test_bat_sphere_2d_record() {
	let b2 = uniform_bounds(2, -1.5, 1.5);
	let (lower, upper) = bounds_to_arrays(&b2).unwrap();
	let ba = BatAlgorithm::new(&sphere, lower, upper, BatConfigBuilder::new().seed(60).popsize(30).build()).unwrap();
	let (_, start_cost) = ba.cloud().best().unwrap();

	let report = bat_algorithm(&sphere, &b2, BatConfigBuilder::new().seed(60).popsize(30).build()).unwrap();
	assert_eq!(report.x.len(), 2);
	assert!(report.fun <= start_cost, "fun={} start={}", report.fun, start_cost);
	assert!((sphere(&report.x) - report.fun).abs() < 1e-12);
	assert_eq!(report.nit, 50);
	assert_eq!(report.nfev, 30 + 30 * 50);
}

#[test]
fn test_bat_sphere_3d_narrow_frequency() {
	let b3 = uniform_bounds(3, -1.0, 1.0);
	let c3 = BatConfigBuilder::new().seed(61).popsize(30).frequency(0.0, 2.0).build();
	let report = bat_algorithm(&sphere, &b3, c3).unwrap();
	assert_eq!(report.x.len(), 3);
	assert!(report.fun.is_finite());
	assert!((sphere(&report.x) - report.fun).abs() < 1e-12);
	assert_eq!(report.nfev, 30 + 30 * 50);
}
