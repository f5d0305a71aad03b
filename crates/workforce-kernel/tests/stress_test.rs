use workforce_kernel::test_harness::{run_simulator, SimulatorConfig, TestHarness};

#[test]
fn test_simulator_over_several_seeds() {
    for seed in 0..5 {
        let report = run_simulator(SimulatorConfig {
            seed,
            total_operations: 500,
            ..Default::default()
        });
        assert!(report.passed(), "{}", report.generate_text());
        assert!(report.stats.failed_operations > 0, "invalid commands were generated");
        assert!(report.events_logged > 0);
    }
}

#[test]
fn test_simulator_is_deterministic_per_seed() {
    let run = || {
        run_simulator(SimulatorConfig {
            seed: 99,
            total_operations: 200,
            ..Default::default()
        })
    };
    let (a, b) = (run(), run());
    assert_eq!(a.stats.successful_operations, b.stats.successful_operations);
    assert_eq!(a.stats.operations_by_type, b.stats.operations_by_type);
}

#[test]
fn test_stress_large_org() {
    let report = TestHarness::run_stress_test(2_000, 300);
    assert!(report.success, "{report:?}");
    assert_eq!(report.violations, 0);
    assert!(report.final_employees >= 2_000);
}
