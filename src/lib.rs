// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod fingerprint;
pub mod notify;
pub mod pipeline;
pub mod scheduler;

// ---- Re-exports for stable public API ----
pub use crate::cache::{AnnouncementCache, CacheEntry, CacheError};
pub use crate::config::{load_config, Config, ConfigValidationError};
pub use crate::extract::{extract_announcements, Announcement, Selectors};
pub use crate::fetch::{FetchError, FetchOutcome, Fetcher};
pub use crate::fingerprint::fingerprint;
pub use crate::notify::{DeliveryStats, Notifier, NotifierFanout};
pub use crate::pipeline::{run_cycle, CycleOutcome};
