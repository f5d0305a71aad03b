pub mod assets;
pub mod config;
pub mod hierarchy;
pub mod logging;
pub mod payroll;
pub mod seed;
pub mod session;
pub mod store;
pub mod summary;
pub mod test_harness;
pub mod types;
pub mod workflow;

pub mod api;
pub mod error;
pub mod handle;

pub use api::*;
pub use config::WorkforceConfig;
pub use error::*;
pub use handle::*;
pub use types::*;

/// Re-export test harness for external use
pub use test_harness::{run_simulator, SimulatorConfig, TestHarness};
