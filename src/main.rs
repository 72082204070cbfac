//! asdw-notifier binary entrypoint.
//! Loads configuration, wires the cache, fetcher and webhook targets, then
//! runs the announcement poll loop until the process is terminated.

use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use asdw_notifier::cache::AnnouncementCache;
use asdw_notifier::config::{load_config, Config};
use asdw_notifier::extract::Selectors;
use asdw_notifier::fetch::Fetcher;
use asdw_notifier::notify::NotifierFanout;
use asdw_notifier::scheduler;

/// Supervisors restart a crashed container immediately; a short sleep before
/// a fatal exit keeps a misconfigured deployment from hot-looping.
const RESTART_THROTTLE: Duration = Duration::from_secs(60);

fn fail_with_throttle(message: &str) -> ExitCode {
    eprintln!("ERROR: {message}");
    eprintln!("Sleeping 60 seconds before exit to prevent rapid restart loop...");
    std::thread::sleep(RESTART_THROTTLE);
    ExitCode::FAILURE
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when variables come from the real
    // environment (Docker, systemd).
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return fail_with_throttle(&e.to_string()),
    };

    init_tracing(&config);

    if let Err(e) = std::fs::create_dir_all(&config.application_data_dir) {
        tracing::error!(
            error = ?e,
            dir = %config.application_data_dir.display(),
            "failed to create cache directory"
        );
        return fail_with_throttle(&format!("Cannot create cache directory: {e}"));
    }

    let selectors = match Selectors::parse(
        &config.announcement_selector,
        &config.announcement_body_selector,
        &config.announcement_time_class,
    ) {
        Ok(s) => s,
        Err(e) => return fail_with_throttle(&format!("Cannot build selectors: {e}")),
    };

    let fetcher = match Fetcher::new(
        &config.announcement_url,
        config.http_timeout,
        &config.user_agent,
    ) {
        Ok(f) => f,
        Err(e) => return fail_with_throttle(&format!("Cannot build HTTP client: {e}")),
    };

    let cache = AnnouncementCache::new(&config.application_data_dir);
    let notifiers = NotifierFanout::discord(&config.discord_webhook_urls, config.http_timeout);

    scheduler::run_poll_loop(
        fetcher,
        cache,
        selectors,
        notifiers,
        Duration::from_secs(config.poll_time),
    )
    .await;

    ExitCode::SUCCESS
}
