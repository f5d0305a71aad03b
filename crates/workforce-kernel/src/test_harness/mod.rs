// Test harness module
// Randomized command streams and stress runs over the workforce kernel

pub mod simulator;

pub use simulator::*;

/// Test harness for running stress tests
pub struct TestHarness;

impl TestHarness {
    /// Run a stress test over a synthetic org of `employees` people.
    pub fn run_stress_test(employees: usize, iterations: usize) -> StressTestReport {
        tracing::info!(employees, iterations, "running stress test");

        let config = SimulatorConfig {
            seed: 12345,
            total_operations: iterations as u64,
            synthetic_employees: Some(employees),
            stop_on_first_violation: false,
            ..Default::default()
        };

        let report = run_simulator(config);

        StressTestReport {
            employees,
            iterations,
            final_employees: report.final_employee_count,
            rejected_commands: report.stats.failed_operations,
            violations: report.violations.len(),
            success: report.passed(),
        }
    }
}

/// Report from a stress test
#[derive(Debug, Clone, serde::Serialize)]
pub struct StressTestReport {
    pub employees: usize,
    pub iterations: usize,
    pub final_employees: usize,
    pub rejected_commands: u64,
    pub violations: usize,
    pub success: bool,
}
