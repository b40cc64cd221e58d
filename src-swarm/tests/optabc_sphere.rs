use swarmopt::{AbcConfigBuilder, OnlookerSelection, bee_colony};
use swarmopt_testfunctions::{quadratic, sphere, uniform_bounds};

#[test]
fn test_abc_sphere_2d() {
	let b2 = uniform_bounds(2, -2.0, 2.0);
	let c2 = AbcConfigBuilder::new().seed(40).build();
	let report = bee_colony(&sphere, &b2, c2).unwrap();
	assert_eq!(report.x.len(), 2);
	assert!(report.fun < 1.0, "fun={}", report.fun);
	assert!((sphere(&report.x) - report.fun).abs() < 1e-12);
	assert_eq!(report.nit, 50);
}

#[test]
fn test_abc_sphere_3d() {
	let b3 = uniform_bounds(3, -1.0, 1.0);
	let c3 = AbcConfigBuilder::new().seed(41).maxiter(100).build();
	let report = bee_colony(&sphere, &b3, c3).unwrap();
	assert_eq!(report.x.len(), 3);
	assert!(report.fun < 1.0, "fun={}", report.fun);
}

#[test]
fn test_abc_fitness_selection() {
	let b2 = uniform_bounds(2, -3.0, 3.0);
	let c2 = AbcConfigBuilder::new().seed(42).selection(OnlookerSelection::Fitness).limit(5).build();
	let report = bee_colony(&quadratic, &b2, c2).unwrap();
	assert!(report.fun.is_finite());
	assert!((quadratic(&report.x) - report.fun).abs() < 1e-12);
	// bees drawn at construction, then one onlooker round before the loop
	assert!(report.nfev >= 30 + 15 + 15);
}
