//! Command line options and the resolved load test configuration.
//!
//! Options are parsed with [`gumdrop`](https://docs.rs/gumdrop/), the same parser Goose
//! uses for its own [`GooseConfiguration`]. Anything after a `--` separator is handed
//! to Goose untouched, so every Goose runtime option (verbosity, log files, reports,
//! throttling) stays available.

use goose::config::GooseConfiguration;
use gumdrop::Options;
use url::Url;

use crate::login::{LoginRequest, RegisterRequest, DEFAULT_LOGIN_PATH};
use crate::profile::{ProfileKind, RampProfile};
use crate::LoadTestError;

/// Base URL of the authentication service when no `--host` is given.
pub const DEFAULT_HOST: &str = "http://localhost:8080";

// Goose options that define their own load shape or conflict with a test plan.
const RAMP_OPTIONS: &[&str] = &[
    "-u",
    "--users",
    "-r",
    "--hatch-rate",
    "-s",
    "--startup-time",
    "-t",
    "--run-time",
    "--test-plan",
    "-H",
    "--host",
    "--no-reset-metrics",
];

/// Runtime options available when launching the login load test.
#[derive(Options, Debug, Clone)]
#[options(
    help = r#"Ramping load test for the authentication service login endpoint.

Goose runtime options can be passed after a `--` separator, ie:
  login-loadtest --profile stress -- -v --report-file report.html"#
)]
pub struct LoadTestOptions {
    /// Displays this help
    #[options(short = "h")]
    pub help: bool,
    /// Lists built-in ramp profiles and exits
    #[options(short = "l")]
    pub list: bool,

    /// Selects a built-in ramp profile (daily, stress)
    #[options(short = "p", meta = "NAME", default = "daily")]
    pub profile: ProfileKind,
    /// Custom ramp, overrides --profile ("100,2m;300,3m;0,1m")
    #[options(no_short, meta = "STAGES")]
    pub stages: Option<String>,

    /// Defines host to load test
    #[options(short = "H", meta = "HOST", default = "http://localhost:8080")]
    pub host: String,
    /// Sets the login path
    #[options(no_short, meta = "PATH", default = "/auth/login")]
    pub path: String,
    /// Sets the login email
    #[options(short = "e", meta = "EMAIL", default = "test@test.com")]
    pub email: String,
    /// Sets the login password
    #[options(short = "w", meta = "PASSWORD", default = "test1234")]
    pub password: String,

    /// Registers the login account before the ramp starts
    #[options(no_short)]
    pub register: bool,
    /// Sets the registration path
    #[options(no_short, meta = "PATH", default = "/auth/register")]
    pub register_path: String,
    /// Sets the display name used when registering
    #[options(short = "n", meta = "NAME", default = "test")]
    pub name: String,

    /// Goose options, after `--`
    #[options(free)]
    pub goose_args: Vec<String>,
}

/// A fully validated login load test.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTestConfig {
    pub profile: RampProfile,
    pub host: String,
    pub login_path: String,
    pub login: LoginRequest,
    /// Registration to perform once before the ramp starts, and its path.
    pub register: Option<(String, RegisterRequest)>,
    pub goose_args: Vec<String>,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        LoadTestConfig {
            profile: RampProfile::daily(),
            host: DEFAULT_HOST.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            login: LoginRequest::default(),
            register: None,
            goose_args: Vec::new(),
        }
    }
}

impl LoadTestConfig {
    /// Validate parsed options.
    pub fn from_options(options: &LoadTestOptions) -> Result<Self, LoadTestError> {
        let profile = match options.stages.as_deref() {
            Some(stages) => stages.parse::<RampProfile>()?,
            None => options.profile.profile(),
        };
        // Fail now rather than when Goose parses the test plan.
        profile.to_test_plan()?;

        validate_host(&options.host)?;
        validate_path("--path", &options.path)?;

        let login = LoginRequest::new(&options.email, &options.password);
        let register = if options.register {
            validate_path("--register-path", &options.register_path)?;
            Some((
                options.register_path.clone(),
                RegisterRequest::for_login(&options.name, &login),
            ))
        } else {
            None
        };

        if let Some(arg) = options.goose_args.iter().find(|arg| is_ramp_option(arg)) {
            return Err(LoadTestError::InvalidOption {
                option: arg.clone(),
                value: arg.clone(),
                detail: "conflicts with the ramp set by --profile or --stages".to_string(),
            });
        }

        Ok(LoadTestConfig {
            profile,
            host: options.host.clone(),
            login_path: options.path.clone(),
            login,
            register,
            goose_args: options.goose_args.clone(),
        })
    }

    /// Build the Goose configuration: host and test plan, followed by any Goose
    /// options passed through.
    ///
    /// Goose never resets metrics while running a test plan, so checks made while
    /// ramping up count too.
    pub fn goose_configuration(&self) -> Result<GooseConfiguration, LoadTestError> {
        let test_plan = self.profile.to_test_plan()?;
        let mut args: Vec<&str> = vec![
            "--host",
            self.host.as_str(),
            "--test-plan",
            test_plan.as_str(),
        ];
        args.extend(self.goose_args.iter().map(String::as_str));

        Ok(GooseConfiguration::parse_args_default(&args)?)
    }
}

fn is_ramp_option(arg: &str) -> bool {
    // Options may carry their value inline, ie `--users=10` or `-u10`.
    let name = if arg.starts_with("--") {
        arg.split('=').next().unwrap_or(arg)
    } else {
        arg.get(..2).unwrap_or(arg)
    };
    RAMP_OPTIONS.contains(&name)
}

fn validate_host(host: &str) -> Result<(), LoadTestError> {
    match Url::parse(host) {
        Ok(url) if url.has_host() => Ok(()),
        Ok(_) => Err(LoadTestError::InvalidOption {
            option: "--host".to_string(),
            value: host.to_string(),
            detail: "host must include a hostname, ie http://localhost:8080".to_string(),
        }),
        Err(e) => Err(LoadTestError::InvalidOption {
            option: "--host".to_string(),
            value: host.to_string(),
            detail: e.to_string(),
        }),
    }
}

fn validate_path(option: &str, path: &str) -> Result<(), LoadTestError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(LoadTestError::InvalidOption {
            option: option.to_string(),
            value: path.to_string(),
            detail: "path must start with '/'".to_string(),
        })
    }
}
