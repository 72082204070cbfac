// src/scheduler.rs
use std::time::Duration;

use crate::cache::AnnouncementCache;
use crate::extract::Selectors;
use crate::fetch::Fetcher;
use crate::notify::NotifierFanout;
use crate::pipeline;

/// Drive fetch→extract→filter→deliver cycles forever, sleeping `poll_time`
/// between cycles. Owns no business logic; cycle failures are logged inside
/// the pipeline and never break the loop.
pub async fn run_poll_loop(
    fetcher: Fetcher,
    cache: AnnouncementCache,
    selectors: Selectors,
    notifiers: NotifierFanout,
    poll_time: Duration,
) {
    tracing::info!(
        url = fetcher.url(),
        interval_secs = poll_time.as_secs(),
        "starting ASDW announcement poll loop"
    );
    loop {
        let outcome = pipeline::run_cycle(&fetcher, &cache, &selectors, &notifiers).await;
        tracing::debug!(
            extracted = outcome.extracted,
            already_seen = outcome.already_seen,
            queued = outcome.queued,
            sent = outcome.sent,
            failed_sends = outcome.failed_sends,
            "poll cycle finished"
        );
        tokio::time::sleep(poll_time).await;
    }
}
