//! Ramp profiles.
//!
//! A ramp profile is an ordered series of stages, each moving the target number of
//! concurrent Goose users linearly from the previous stage's target to its own over
//! the stage duration. The first stage ramps up from zero users.
//!
//! Goose describes the same thing as a test plan, `"{users},{timespan};..."`, so
//! profiles are handed to Goose through [`RampProfile::to_test_plan`] and custom
//! profiles are read back in that same format.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

use crate::LoadTestError;

lazy_static! {
    // One stage: "{users},{timespan}", white space is ignored. A timespan is either
    // integer seconds or any of hours, minutes and seconds in that order.
    static ref STAGE: Regex = Regex::new(
        r"^\s*(?P<users>\d+)\s*,\s*(?:(?P<plain>\d+)|(?:(?P<hours>\d+)h)?(?:(?P<minutes>\d+)m)?(?:(?P<seconds>\d+)s)?)\s*$"
    )
    .expect("stage regex must compile");
}

/// The built-in ramp profiles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Sustained daily traffic with a peak: 100, 300, 100 then 0 users over 10 minutes.
    #[default]
    Daily,
    /// Burst capacity: 1000 users within 10 seconds, held for 30 seconds.
    Stress,
}

impl ProfileKind {
    /// Build the ramp profile this kind names.
    pub fn profile(self) -> RampProfile {
        match self {
            ProfileKind::Daily => RampProfile::daily(),
            ProfileKind::Stress => RampProfile::stress(),
        }
    }
}

/// A single ramp stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampStage {
    /// How long the transition to `target` takes.
    pub duration: Duration,
    /// Concurrent users at the end of the stage.
    pub target: usize,
}

impl RampStage {
    pub fn new(duration: Duration, target: usize) -> Self {
        RampStage { duration, target }
    }
}

impl fmt::Display for RampStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} users over {}",
            self.target,
            format_timespan(self.duration.as_secs())
        )
    }
}

/// A named, ordered list of ramp stages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampProfile {
    pub name: String,
    pub stages: Vec<RampStage>,
}

impl RampProfile {
    pub fn new(name: &str, stages: Vec<RampStage>) -> Self {
        RampProfile {
            name: name.to_string(),
            stages,
        }
    }

    /// Daily/soak traffic: 0→100 over 2m, 100→300 over 3m, 300→100 over 3m, 100→0 over 2m.
    pub fn daily() -> Self {
        RampProfile::new(
            "daily",
            vec![
                RampStage::new(Duration::from_secs(2 * 60), 100),
                RampStage::new(Duration::from_secs(3 * 60), 300),
                RampStage::new(Duration::from_secs(3 * 60), 100),
                RampStage::new(Duration::from_secs(2 * 60), 0),
            ],
        )
    }

    /// Stress/spike traffic: 0→1000 over 10s, hold 1000 for 30s, 1000→0 over 10s.
    pub fn stress() -> Self {
        RampProfile::new(
            "stress",
            vec![
                RampStage::new(Duration::from_secs(10), 1000),
                RampStage::new(Duration::from_secs(30), 1000),
                RampStage::new(Duration::from_secs(10), 0),
            ],
        )
    }

    /// Target concurrency `elapsed` into the run.
    ///
    /// Inside a stage the target is interpolated linearly (and rounded) between the
    /// previous stage's target and this one. Past the final stage the final target
    /// holds, as Goose keeps that many users running until the load test is stopped.
    pub fn target_at(&self, elapsed: Duration) -> usize {
        let mut previous: usize = 0;
        let mut started = Duration::ZERO;
        for stage in &self.stages {
            let ends = started + stage.duration;
            if elapsed < ends {
                // A zero-length stage can never get here, `elapsed >= started` always.
                let progress =
                    (elapsed - started).as_secs_f64() / stage.duration.as_secs_f64();
                let target = previous as f64 + (stage.target as f64 - previous as f64) * progress;
                return target.round() as usize;
            }
            previous = stage.target;
            started = ends;
        }
        previous
    }

    /// Sum of all stage durations.
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }

    /// Highest target concurrency reached by the profile.
    pub fn peak(&self) -> usize {
        self.stages
            .iter()
            .map(|stage| stage.target)
            .max()
            .unwrap_or(0)
    }

    /// Total number of users Goose launches over the run: every increase adds users,
    /// decreases stop users that are never restarted.
    pub fn total_users(&self) -> usize {
        let mut total_users: usize = 0;
        let mut previous: usize = 0;
        for stage in &self.stages {
            if stage.target > previous {
                total_users += stage.target - previous;
            }
            previous = stage.target;
        }
        total_users
    }

    /// Render the profile as a Goose `--test-plan` value, ie `"100,2m;300,3m"`.
    ///
    /// Goose test plans have a granularity of one second, so sub-second stage
    /// durations are rejected.
    pub fn to_test_plan(&self) -> Result<String, LoadTestError> {
        if self.stages.is_empty() {
            return Err(LoadTestError::InvalidProfile {
                value: self.name.clone(),
                detail: "a ramp profile needs at least one stage".to_string(),
            });
        }
        let mut steps = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            if stage.duration.subsec_nanos() != 0 {
                return Err(LoadTestError::InvalidProfile {
                    value: format!("{:?}", stage.duration),
                    detail: "stage durations must be whole seconds".to_string(),
                });
            }
            steps.push(format!(
                "{},{}",
                stage.target,
                format_timespan(stage.duration.as_secs())
            ));
        }
        Ok(steps.join(";"))
    }
}

/// Parse a `"{users},{timespan};{users},{timespan}"` string into a custom profile.
///
/// Users are an integer. A timespan is either integer seconds or integers followed
/// by "h", "m" and "s" in that order: 20, 20s, 3m, 2h, 1h20m, 3h30m10s.
impl FromStr for RampProfile {
    type Err = LoadTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut stages = Vec::new();
        for line in s.split(';') {
            stages.push(parse_stage(line)?);
        }
        Ok(RampProfile::new("custom", stages))
    }
}

fn parse_stage(line: &str) -> Result<RampStage, LoadTestError> {
    let invalid = |detail: &str| LoadTestError::InvalidProfile {
        value: line.to_string(),
        detail: detail.to_string(),
    };

    let cap = STAGE
        .captures(line)
        .ok_or_else(|| invalid("expected \"{users},{timespan}\", ie \"100,2m\""))?;
    let number = |name: &str| -> Result<u64, LoadTestError> {
        match cap.name(name) {
            Some(value) => value
                .as_str()
                .parse::<u64>()
                .map_err(|_| invalid("number out of range")),
            None => Ok(0),
        }
    };

    let seconds = if cap.name("plain").is_some() {
        number("plain")?
    } else if ["hours", "minutes", "seconds"]
        .iter()
        .any(|name| cap.name(name).is_some())
    {
        number("hours")?
            .saturating_mul(3600)
            .saturating_add(number("minutes")?.saturating_mul(60))
            .saturating_add(number("seconds")?)
    } else {
        return Err(invalid("missing timespan"));
    };
    let target = cap["users"]
        .parse::<usize>()
        .map_err(|_| invalid("number out of range"))?;

    Ok(RampStage::new(Duration::from_secs(seconds), target))
}

/// Format whole seconds as the shortest Goose timespan: 120 is "2m", 5410 is "1h30m10s".
pub fn format_timespan(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    let mut timespan = String::new();
    if hours > 0 {
        timespan.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        timespan.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 {
        timespan.push_str(&format!("{}s", seconds));
    }
    timespan
}
