// src/pipeline.rs
//
// One poll cycle: fetch the page conditionally, extract announcements, filter
// them against the cache, and fan the unseen ones out to every webhook target.
// Failure isolation is the whole point: a bad item, a failed cache write, or
// an unreachable target never blocks the rest of the cycle.

use std::time::UNIX_EPOCH;

use chrono::Utc;

use crate::cache::AnnouncementCache;
use crate::extract::{extract_announcements, Announcement, Selectors};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::fingerprint::fingerprint;
use crate::notify::NotifierFanout;

/// Counts from one cycle, returned for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub extracted: usize,
    pub already_seen: usize,
    pub queued: usize,
    pub cache_write_failures: usize,
    pub sent: usize,
    pub failed_sends: usize,
}

pub async fn run_cycle(
    fetcher: &Fetcher,
    cache: &AnnouncementCache,
    selectors: &Selectors,
    notifiers: &NotifierFanout,
) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();

    // Captured once per cycle: every item shares this date even if the wall
    // clock crosses midnight mid-extraction.
    let fetch_datetime = Utc::now().to_rfc3339();
    let fetch_date = &fetch_datetime[..10];

    let last_poll = match cache.last_modified_time() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = ?e, "failed to scan cache directory; assuming empty cache");
            UNIX_EPOCH
        }
    };

    let announcements = match fetcher.fetch(last_poll).await {
        Ok(FetchOutcome::Fresh(body)) => extract_announcements(&body, selectors),
        Ok(FetchOutcome::NotModified) => Vec::new(),
        Err(e) => {
            tracing::error!(error = ?e, "Error requesting URL");
            Vec::new()
        }
    };
    outcome.extracted = announcements.len();

    let mut queue: Vec<String> = Vec::new();
    for announcement in &announcements {
        let fp = fingerprint(&announcement.raw_text, fetch_date);
        if cache.exists(&fp) {
            tracing::debug!(fingerprint = &fp[..12], "ASDW announcement already sent");
            outcome.already_seen += 1;
            continue;
        }
        // Commit the dedup record before the send attempt: an announcement
        // with no durable record would be re-delivered on every cycle.
        match cache.write(&fp, &announcement.body_text, &fetch_datetime) {
            Ok(()) => queue.push(format_announcement(announcement)),
            Err(e) => {
                tracing::error!(error = ?e, "Failed to write cache file");
                tracing::warn!(
                    fingerprint = &fp[..12],
                    "Skipping announcement due to cache write failure"
                );
                outcome.cache_write_failures += 1;
            }
        }
    }
    outcome.queued = queue.len();

    if queue.is_empty() {
        tracing::info!("No new ASDW announcements!");
        return outcome;
    }

    let stats = notifiers.send_all(&queue).await;
    outcome.sent = stats.sent;
    outcome.failed_sends = stats.failed;
    outcome
}

/// Message body sent to each webhook target.
fn format_announcement(announcement: &Announcement) -> String {
    format!("{}\n{}", announcement.time_text, announcement.body_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_time_above_body() {
        let a = Announcement {
            time_text: "January 13, 2025 7:05 AM".into(),
            body_text: "Buses cancelled.\nSchools open.".into(),
            raw_text: "unused".into(),
        };
        assert_eq!(
            format_announcement(&a),
            "January 13, 2025 7:05 AM\nBuses cancelled.\nSchools open."
        );
    }
}
