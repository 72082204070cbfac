pub mod discord;

use anyhow::Result;

/// Outbound notification channel. Best-effort: the pipeline treats any error
/// as a per-(message, target) failure and keeps going.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, content: &str) -> Result<()>;
    /// Short identity for log context. Never the full webhook URL, which
    /// embeds the secret token.
    fn target(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub sent: usize,
    pub failed: usize,
}

/// Fan-out over every configured target: each queued message goes to each
/// target independently, with no partial-failure abort.
pub struct NotifierFanout {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierFanout {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Build one Discord notifier per configured webhook URL.
    pub fn discord(webhook_urls: &[String], timeout_secs: u64) -> Self {
        let notifiers = webhook_urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                Box::new(
                    discord::DiscordNotifier::new(url.clone(), format!("discord#{i}"))
                        .with_timeout(timeout_secs),
                ) as Box<dyn Notifier>
            })
            .collect();
        Self { notifiers }
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub async fn send_all(&self, queue: &[String]) -> DeliveryStats {
        let mut stats = DeliveryStats::default();
        for notifier in &self.notifiers {
            for content in queue {
                tracing::info!(
                    webhook = notifier.target(),
                    "Sending ASDW announcement notification"
                );
                match notifier.send(content).await {
                    Ok(()) => stats.sent += 1,
                    Err(e) => {
                        stats.failed += 1;
                        tracing::error!(
                            error = ?e,
                            webhook = notifier.target(),
                            "Failed to send Discord webhook notification"
                        );
                        let preview: String = content.chars().take(100).collect();
                        tracing::debug!("Failed announcement content: {preview}...");
                    }
                }
            }
        }
        stats
    }
}
