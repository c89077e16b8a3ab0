use crate::app::Shutdown;
use crate::channel::Channel;
use crate::domain::Entry;

/// Why publishing stopped before the end of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAbort {
    Interrupted,
    SessionLost(String),
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub published: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Entries left unattempted after a lost session.
    pub abandoned: usize,
    pub aborted: Option<PublishAbort>,
}

/// Submits entries one at a time to a single destination.
pub struct Publisher<'a> {
    channel: &'a dyn Channel,
    destination: &'a str,
    dry_run: bool,
}

impl<'a> Publisher<'a> {
    pub fn new(channel: &'a dyn Channel, destination: &'a str, dry_run: bool) -> Self {
        Self {
            channel,
            destination,
            dry_run,
        }
    }

    /// Publish `entries` in order. A rejected or failed item is logged and
    /// skipped. A lost session or an interrupt stops the loop; whatever was
    /// already submitted stays submitted.
    pub async fn publish(&self, entries: &[Entry], shutdown: &Shutdown) -> PublishReport {
        let mut report = PublishReport::default();

        for (index, entry) in entries.iter().enumerate() {
            if shutdown.is_triggered() {
                report.aborted = Some(PublishAbort::Interrupted);
                break;
            }

            if self.dry_run {
                tracing::info!("[dry run] Would post: {} ({})", entry.title, entry.link);
                report.published += 1;
                continue;
            }

            tracing::debug!("Posting: {}", entry.title);
            let result = tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    report.aborted = Some(PublishAbort::Interrupted);
                    break;
                }
                result = self.channel.submit(self.destination, &entry.title, &entry.link) => result,
            };

            match result {
                Ok(()) => {
                    tracing::info!("Posted: {} ({})", entry.title, entry.link);
                    report.published += 1;
                }
                Err(e) if e.is_session_lost() => {
                    report.abandoned = entries.len() - index - 1;
                    tracing::error!(
                        "Session lost while posting {}: {}. Abandoning {} remaining posts.",
                        entry.title,
                        e,
                        report.abandoned
                    );
                    report.failed += 1;
                    report.aborted = Some(PublishAbort::SessionLost(e.to_string()));
                    break;
                }
                Err(e) if e.is_rejection() => {
                    tracing::warn!("Reddit rejected {}: {}", entry.title, e);
                    report.rejected += 1;
                }
                Err(e) => {
                    tracing::error!("Something went wrong posting {}: {}", entry.title, e);
                    report.failed += 1;
                }
            }
        }

        if report.aborted == Some(PublishAbort::Interrupted) {
            tracing::info!("Caught interrupt while posting: quitting.");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelError;
    use crate::domain::FeedSource;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fails submissions whose link contains a marker; `slow` links hang.
    #[derive(Default)]
    struct ScriptedChannel {
        submitted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Channel for ScriptedChannel {
        async fn recent_links(&self, _: &str, _: usize) -> Result<Vec<String>, ChannelError> {
            Ok(Vec::new())
        }

        async fn submit(&self, _: &str, _: &str, link: &str) -> Result<(), ChannelError> {
            if link.contains("reject") {
                return Err(ChannelError::api("ALREADY_SUB", "already submitted"));
            }
            if link.contains("client") {
                return Err(ChannelError::Client("400 Bad Request".into()));
            }
            if link.contains("lost") {
                return Err(ChannelError::SessionLost("401 Unauthorized".into()));
            }
            if link.contains("slow") {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            self.submitted.lock().unwrap().push(link.to_string());
            Ok(())
        }
    }

    fn entry(link: &str) -> Entry {
        Entry {
            title: format!("Title for {}", link),
            link: link.into(),
            source: FeedSource::new("https://example.com/feed"),
        }
    }

    #[tokio::test]
    async fn test_rejections_do_not_stop_the_loop() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", false);
        let entries = vec![
            entry("http://a/1"),
            entry("http://a/reject"),
            entry("http://a/client"),
            entry("http://a/2"),
        ];

        let report = publisher.publish(&entries, &Shutdown::never()).await;

        assert_eq!(report.published, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.aborted, None);
        assert_eq!(
            *channel.submitted.lock().unwrap(),
            vec!["http://a/1".to_string(), "http://a/2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_session_loss_abandons_remaining() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", false);
        let entries = vec![entry("http://a/1"), entry("http://a/lost"), entry("http://a/2")];

        let report = publisher.publish(&entries, &Shutdown::never()).await;

        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.abandoned, 1);
        assert!(matches!(report.aborted, Some(PublishAbort::SessionLost(_))));
        assert_eq!(*channel.submitted.lock().unwrap(), vec!["http://a/1".to_string()]);
    }

    #[tokio::test]
    async fn test_dry_run_never_submits() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", true);
        let entries = vec![entry("http://a/1"), entry("http://a/2")];

        let report = publisher.publish(&entries, &Shutdown::never()).await;

        assert_eq!(report.published, 2);
        assert!(channel.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_before_loop() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", false);
        let (trigger, shutdown) = crate::app::shutdown::channel();
        trigger.trigger();

        let report = publisher.publish(&[entry("http://a/1")], &shutdown).await;

        assert_eq!(report.aborted, Some(PublishAbort::Interrupted));
        assert_eq!(report.published, 0);
        assert!(channel.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_loss_on_last_entry_abandons_nothing() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", false);
        let entries = vec![entry("http://a/1"), entry("http://a/lost")];

        let report = publisher.publish(&entries, &Shutdown::never()).await;

        assert_eq!(report.abandoned, 0);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_interrupt_during_submit() {
        let channel = ScriptedChannel::default();
        let publisher = Publisher::new(&channel, "rust", false);
        let (trigger, shutdown) = crate::app::shutdown::channel();
        let entries = vec![entry("http://a/1"), entry("http://a/slow"), entry("http://a/2")];

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.trigger();
        });

        let report = tokio::time::timeout(
            Duration::from_secs(2),
            publisher.publish(&entries, &shutdown),
        )
        .await
        .expect("publish should return promptly");

        assert_eq!(report.aborted, Some(PublishAbort::Interrupted));
        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(*channel.submitted.lock().unwrap(), vec!["http://a/1".to_string()]);
    }
}
