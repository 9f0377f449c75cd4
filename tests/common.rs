use gumdrop::Options;
use httpmock::MockServer;

use login_loadtest::{LoadTestConfig, LoadTestOptions, LoadTestOutcome};

/// Two users started over one second, held for one more second, then stopped.
#[allow(dead_code)]
pub const SHORT_RAMP: &str = "2,1s;2,1s;0,0";

// Not all functions are used by all tests, so we enable allow(dead_code) to avoid
// compiler warnings during testing.

/// The following options are configured by default, if not set to a custom value:
///  --host <mock-server>
///  --stages SHORT_RAMP
#[allow(dead_code)]
pub fn build_configuration(server: &MockServer, custom: Vec<&str>) -> LoadTestConfig {
    let mut configuration: Vec<&str> = vec![];
    // Declare server_url here no matter what, so its lifetime is sufficient when needed.
    let server_url = server.base_url();

    // Goose options are placed after `--`, so load test options go first.
    let (ours, goose) = match custom.iter().position(|arg| *arg == "--") {
        Some(separator) => custom.split_at(separator),
        None => (custom.as_slice(), &[][..]),
    };
    configuration.extend_from_slice(ours);

    // Default to using mock server if not otherwise configured.
    if !configuration.contains(&"--host") {
        configuration.extend_from_slice(&["--host", &server_url]);
    }

    // Default to a short ramp if not otherwise configured.
    if !configuration.contains(&"--stages") {
        configuration.extend_from_slice(&["--stages", SHORT_RAMP]);
    }

    configuration.extend_from_slice(goose);

    let options = LoadTestOptions::parse_args_default(&configuration)
        .expect("failed to parse options and generate a configuration");
    LoadTestConfig::from_options(&options).expect("failed to validate configuration")
}

/// Run the actual load test, returning the outcome.
#[allow(dead_code)]
pub async fn run_load_test(configuration: &LoadTestConfig) -> LoadTestOutcome {
    login_loadtest::run(configuration)
        .await
        .expect("load test failed to complete")
}
