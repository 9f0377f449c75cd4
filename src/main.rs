use gumdrop::Options;
use strum::IntoEnumIterator;

use login_loadtest::profile::format_timespan;
use login_loadtest::{LoadTestConfig, LoadTestError, LoadTestOptions, ProfileKind, RampProfile};

#[tokio::main]
async fn main() -> Result<(), LoadTestError> {
    // Prints usage and exits on --help or invalid options.
    let options = LoadTestOptions::parse_args_default_or_exit();

    if options.list {
        for kind in ProfileKind::iter() {
            print_profile(&kind.profile())?;
        }
        return Ok(());
    }

    let config = LoadTestConfig::from_options(&options)?;
    println!(
        "Login load test: POST {}{}",
        config.host.trim_end_matches('/'),
        config.login_path
    );
    print_profile(&config.profile)?;

    let outcome = login_loadtest::run(&config).await?;
    println!("\n{}", outcome.checks);

    Ok(())
}

fn print_profile(profile: &RampProfile) -> Result<(), LoadTestError> {
    println!(
        "{}: {} (peak {} users over {})",
        profile.name,
        profile.to_test_plan()?,
        profile.peak(),
        format_timespan(profile.total_duration().as_secs())
    );
    for stage in &profile.stages {
        println!("  {}", stage);
    }
    Ok(())
}
