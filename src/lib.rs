//! # Login load test
//!
//! Ramping load tests for the login endpoint of an authentication service, built on
//! [Goose](https://docs.rs/goose/).
//!
//! Each Goose user repeatedly posts the same JSON credentials to the login path and
//! checks for a `200 OK`. How many users run at any moment follows a ramp profile:
//!
//! | Profile | Stages | Target users |
//! |---|---|---|
//! | `daily` | 2m, 3m, 3m, 2m | 100, 300, 100, 0 |
//! | `stress` | 10s, 30s, 10s | 1000, 1000, 0 |
//!
//! Scheduling users, the HTTP client and metrics are all Goose's; this crate
//! provides the profiles, the request, the check and a summary of the check.
//!
//! ## Running
//!
//! ```bash
//! $ cargo run --release -- --profile stress --host http://localhost:8080
//! ```
//!
//! Goose runtime options follow a `--` separator:
//!
//! ```bash
//! $ cargo run --release -- --profile daily -- -v --report-file report.html
//! ```
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use login_loadtest::{LoadTestConfig, LoadTestError, RampProfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LoadTestError> {
//!     let config = LoadTestConfig {
//!         profile: "10,30s;10,1m;0,10s".parse::<RampProfile>()?,
//!         ..Default::default()
//!     };
//!     let outcome = login_loadtest::run(&config).await?;
//!     println!("{}", outcome.checks);
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod config;
mod error;
pub mod login;
pub mod profile;
pub mod report;

use goose::metrics::GooseMetrics;
use goose::prelude::*;

pub use crate::config::{LoadTestConfig, LoadTestOptions};
pub use crate::error::LoadTestError;
pub use crate::login::{LoginRequest, RegisterRequest};
pub use crate::profile::{ProfileKind, RampProfile, RampStage};
pub use crate::report::CheckSummary;

/// Name of the Goose scenario every user runs.
pub const SCENARIO_NAME: &str = "LoginUser";

/// The result of a completed load test.
#[derive(Debug)]
pub struct LoadTestOutcome {
    /// Everything Goose measured.
    pub metrics: GooseMetrics,
    /// The login check tally.
    pub checks: CheckSummary,
}

/// Assemble the Goose attack for `config` without starting it.
pub fn build_attack(config: &LoadTestConfig) -> Result<GooseAttack, LoadTestError> {
    let login = login::login_transaction(&config.login_path, &config.login)?;
    let mut attack = GooseAttack::initialize_with_config(config.goose_configuration()?)?
        .register_scenario(scenario!(SCENARIO_NAME).register_transaction(login));

    if let Some((path, register)) = &config.register {
        attack = attack.test_start(login::register_transaction(path, register)?);
    }

    Ok(attack)
}

/// Run the load test to completion.
///
/// Failed checks do not make this return an error, they are counted in
/// [`LoadTestOutcome::checks`].
pub async fn run(config: &LoadTestConfig) -> Result<LoadTestOutcome, LoadTestError> {
    let metrics = build_attack(config)?.execute().await?;
    let checks = CheckSummary::from_metrics(&metrics, &config.login_path);
    // Goose's logger is installed by now, unless an embedder set up their own.
    info!("{}", checks);

    Ok(LoadTestOutcome { metrics, checks })
}
