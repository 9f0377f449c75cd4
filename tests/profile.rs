use std::str::FromStr;
use std::time::Duration;

use login_loadtest::{LoadTestError, ProfileKind, RampProfile, RampStage};

fn minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes * 60)
}

fn seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

// Test the daily profile reaches each stage target on time.
#[test]
fn test_daily_profile_targets() {
    let daily = ProfileKind::Daily.profile();
    assert_eq!(daily.target_at(minutes(2)), 100);
    assert_eq!(daily.target_at(minutes(5)), 300);
    assert_eq!(daily.target_at(minutes(8)), 100);
    assert_eq!(daily.target_at(minutes(10)), 0);

    // Halfway through each transition.
    assert_eq!(daily.target_at(seconds(210)), 200);
    assert_eq!(daily.target_at(seconds(390)), 200);
    assert_eq!(daily.target_at(minutes(9)), 50);
}

// Test the stress profile reaches each stage target on time.
#[test]
fn test_stress_profile_targets() {
    let stress = ProfileKind::Stress.profile();
    assert_eq!(stress.target_at(seconds(10)), 1000);
    assert_eq!(stress.target_at(seconds(40)), 1000);
    assert_eq!(stress.target_at(seconds(50)), 0);
    assert_eq!(stress.peak(), 1000);
    assert_eq!(stress.total_users(), 1000);
}

// Test the profiles handed to Goose.
#[test]
fn test_goose_test_plans() {
    assert_eq!(
        RampProfile::daily().to_test_plan().unwrap(),
        "100,2m;300,3m;100,3m;0,2m"
    );
    assert_eq!(
        RampProfile::stress().to_test_plan().unwrap(),
        "1000,10s;1000,30s;0,10s"
    );
}

// Test valid custom profile parsing with various formats.
#[test]
fn test_valid_profile_parsing() {
    // Simple single stage
    let profile = RampProfile::from_str("10,30s").unwrap();
    assert_eq!(profile.stages, vec![RampStage::new(seconds(30), 10)]);
    assert_eq!(profile.name, "custom");

    // Multiple stages with semicolon separator
    let profile = RampProfile::from_str("5,30s;10,1m;0,10s").unwrap();
    assert_eq!(
        profile.stages,
        vec![
            RampStage::new(seconds(30), 5),
            RampStage::new(minutes(1), 10),
            RampStage::new(seconds(10), 0),
        ]
    );

    // Complex time formats
    let profile = RampProfile::from_str("10,1h30m10s").unwrap();
    assert_eq!(profile.stages[0].duration, seconds(5_410));

    // Integer seconds without suffix
    let profile = RampProfile::from_str("15,45").unwrap();
    assert_eq!(profile.stages[0].duration, seconds(45));

    // Hours and minutes
    let profile = RampProfile::from_str("20,1h20m").unwrap();
    assert_eq!(profile.stages[0].duration, seconds(4_800));
}

// Test whitespace handling.
#[test]
fn test_profile_whitespace_handling() {
    let profile = RampProfile::from_str(" 5 , 30s ; 10 , 1m ; 0 , 10s ").unwrap();
    assert_eq!(profile.to_test_plan().unwrap(), "5,30s;10,1m;0,10s");

    let profile = RampProfile::from_str("\t5,30s;\n10,1m").unwrap();
    assert_eq!(profile.to_test_plan().unwrap(), "5,30s;10,1m");
}

// Test invalid custom profile formats.
#[test]
fn test_invalid_profile_formats() {
    for invalid in [
        // Missing comma
        "10 30s",
        // Missing time unit in complex format
        "10,1h30",
        // Invalid characters
        "10,30x",
        // Negative numbers
        "-10,30s",
        // Extra comma
        "10,,30s",
        // Empty string
        "",
        // Just a semicolon
        ";",
        // Wrong unit order
        "10,30m1h",
        // Missing users
        ",30s",
        // Missing time
        "10,",
        // Trailing separator
        "10,30s;",
    ] {
        match RampProfile::from_str(invalid) {
            Err(LoadTestError::InvalidProfile { .. }) => {}
            other => panic!("'{}' parsed as {:?}", invalid, other),
        }
    }
}

// Test total_users calculation.
#[test]
fn test_total_users_calculation() {
    let profile = RampProfile::from_str("5,30s;10,1m;15,30s").unwrap();
    assert_eq!(profile.total_users(), 15);

    // Users stopped on the way down are started again on the way up.
    let profile = RampProfile::from_str("0,0;10,30s;5,30s;15,30s;0,10s").unwrap();
    assert_eq!(profile.total_users(), 20);

    assert_eq!(RampProfile::daily().total_users(), 300);
}
