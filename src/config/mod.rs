// src/config/mod.rs
//
// Environment-variable configuration, loaded and validated once at startup.
// The process refuses to start on any validation failure; the report lists
// every failing variable so operators fix them in one pass.

pub mod validators;

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_APPLICATION_DATA_DIR: &str = "/data";
pub const DEFAULT_ANNOUNCEMENT_URL: &str = "https://asdw.nbed.ca/news/alerts-dashboard/";
pub const DEFAULT_LOG_LEVEL: u8 = 20; // INFO
pub const DEFAULT_POLL_TIME: u64 = 300; // 5 minutes
pub const DEFAULT_HTTP_TIMEOUT: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("asdw-notifier/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_ANNOUNCEMENT_SELECTOR: &str = "article";
pub const DEFAULT_ANNOUNCEMENT_BODY_SELECTOR: &str = "p";
pub const DEFAULT_ANNOUNCEMENT_TIME_CLASS: &str = "text-left";

/// Python-logging-style numeric levels, kept as the external contract.
pub const VALID_LOG_LEVELS: [u64; 5] = [10, 20, 30, 40, 50];

#[derive(Debug, Clone)]
pub struct Config {
    pub application_data_dir: PathBuf,
    pub announcement_url: String,
    pub discord_webhook_urls: Vec<String>,
    pub log_level: u8,
    pub poll_time: u64,
    pub http_timeout: u64,
    pub user_agent: String,
    pub announcement_selector: String,
    pub announcement_body_selector: String,
    pub announcement_time_class: String,
}

impl Config {
    /// Default tracing filter directive for the configured numeric level.
    /// An explicit RUST_LOG still wins in `main`.
    pub fn log_filter(&self) -> &'static str {
        match self.log_level {
            10 => "debug",
            30 => "warn",
            40 | 50 => "error",
            _ => "info",
        }
    }
}

/// Aggregated startup failure: one line per invalid variable.
#[derive(Debug)]
pub struct ConfigValidationError {
    pub errors: Vec<String>,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration validation failed:")?;
        for err in &self.errors {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read every setting from the environment and validate all of them before
/// returning. Invalid values fall back to defaults only to let the remaining
/// checks run; any recorded error still fails the load.
pub fn load_config() -> Result<Config, ConfigValidationError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let application_data_dir = env_or("APPLICATION_DATA_DIR", DEFAULT_APPLICATION_DATA_DIR);
    let announcement_url = env_or("ASDW_ANNOUNCEMENT_URL", DEFAULT_ANNOUNCEMENT_URL);
    let webhook_urls_raw = std::env::var("DISCORD_WEBHOOK_URLS").ok();
    let log_level_raw = env_or("LOG_LEVEL", &DEFAULT_LOG_LEVEL.to_string());
    let poll_time_raw = env_or("POLL_TIME", &DEFAULT_POLL_TIME.to_string());
    let http_timeout_raw = env_or("HTTP_TIMEOUT", &DEFAULT_HTTP_TIMEOUT.to_string());
    let user_agent = env_or("USER_AGENT", DEFAULT_USER_AGENT);
    let announcement_selector = env_or("ANNOUNCEMENT_SELECTOR", DEFAULT_ANNOUNCEMENT_SELECTOR);
    let announcement_body_selector = env_or(
        "ANNOUNCEMENT_BODY_SELECTOR",
        DEFAULT_ANNOUNCEMENT_BODY_SELECTOR,
    );
    let announcement_time_class = env_or(
        "ANNOUNCEMENT_TIME_CLASS",
        DEFAULT_ANNOUNCEMENT_TIME_CLASS,
    );

    if let Some(e) = validators::validate_directory(&application_data_dir, "APPLICATION_DATA_DIR") {
        errors.push(e);
    }
    if let Some(e) = validators::validate_url(&announcement_url, "ASDW_ANNOUNCEMENT_URL") {
        errors.push(e);
    }

    let discord_webhook_urls = match webhook_urls_raw.as_deref() {
        None => {
            errors.push("DISCORD_WEBHOOK_URLS: Required environment variable is not set".into());
            Vec::new()
        }
        Some(raw) => match validators::validate_discord_webhook_urls(raw, "DISCORD_WEBHOOK_URLS") {
            Ok(urls) => urls,
            Err(e) => {
                errors.push(e);
                Vec::new()
            }
        },
    };

    let log_level = match validators::validate_int_range(
        &log_level_raw,
        "LOG_LEVEL",
        None,
        None,
        Some(&VALID_LOG_LEVELS),
    ) {
        Ok(v) => v as u8,
        Err(e) => {
            errors.push(e);
            DEFAULT_LOG_LEVEL
        }
    };

    let poll_time =
        match validators::validate_int_range(&poll_time_raw, "POLL_TIME", Some(1), None, None) {
            Ok(v) => {
                if v < 60 {
                    warnings.push(format!(
                        "POLL_TIME: {v} seconds is quite frequent. \
                         Consider using >= 60 seconds to avoid rate limiting."
                    ));
                }
                v
            }
            Err(e) => {
                errors.push(e);
                DEFAULT_POLL_TIME
            }
        };

    let http_timeout = match validators::validate_int_range(
        &http_timeout_raw,
        "HTTP_TIMEOUT",
        Some(1),
        Some(300),
        None,
    ) {
        Ok(v) => v,
        Err(e) => {
            errors.push(e);
            DEFAULT_HTTP_TIMEOUT
        }
    };

    if let Some(e) = validators::validate_selector(&announcement_selector, "ANNOUNCEMENT_SELECTOR")
    {
        errors.push(e);
    }
    if let Some(e) = validators::validate_selector(
        &announcement_body_selector,
        "ANNOUNCEMENT_BODY_SELECTOR",
    ) {
        errors.push(e);
    }
    if let Some(e) =
        validators::validate_class_name(&announcement_time_class, "ANNOUNCEMENT_TIME_CLASS")
    {
        errors.push(e);
    }

    if !errors.is_empty() {
        return Err(ConfigValidationError { errors });
    }

    // Logging is not configured yet at this point, so warnings go to stdout.
    for warning in warnings {
        println!("[CONFIG WARNING] {warning}");
    }

    Ok(Config {
        application_data_dir: PathBuf::from(application_data_dir),
        announcement_url,
        discord_webhook_urls,
        log_level,
        poll_time,
        http_timeout,
        user_agent,
        announcement_selector,
        announcement_body_selector,
        announcement_time_class,
    })
}
