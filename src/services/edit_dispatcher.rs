//! Debounced, coalescing edit queue for status messages.
//!
//! The platform tolerates roughly one edit per message every couple of
//! seconds, while match events arrive far more often. Every submission for a
//! message replaces the pending payload; the first submission of a window
//! schedules a single flush task that sleeps for the debounce interval, pops
//! whatever payload is pending at that moment and issues one edit.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, warn};

use crate::{dto::embed::Embed, platform::MessagingPlatform};

#[derive(Debug, Clone)]
struct PendingEdit {
    channel_id: String,
    embed: Embed,
}

type PendingEdits = Arc<Mutex<HashMap<String, PendingEdit>>>;

/// Handle owning the pending-edit map and the platform used to flush it.
#[derive(Clone)]
pub struct EditDispatcher {
    platform: Arc<dyn MessagingPlatform>,
    pending: PendingEdits,
    debounce: Duration,
}

impl EditDispatcher {
    /// Create a dispatcher flushing through `platform` once per `debounce` window.
    pub fn new(platform: Arc<dyn MessagingPlatform>, debounce: Duration) -> Self {
        Self {
            platform,
            pending: Arc::new(Mutex::new(HashMap::new())),
            debounce,
        }
    }

    /// Queue `embed` as the next content of `message_id`.
    ///
    /// Returns true when this call opened a new coalescing window (and thus
    /// will cost one platform edit). Payloads with an empty field name or
    /// value are dropped and return false.
    pub async fn submit_edit(&self, message_id: &str, channel_id: &str, embed: Embed) -> bool {
        if !embed.has_valid_fields() {
            debug!(message_id, "dropping status edit with incomplete fields");
            return false;
        }

        let mut pending = self.pending.lock().await;
        let new_window = !pending.contains_key(message_id);
        if new_window {
            self.schedule_flush(message_id.to_string());
        }
        pending.insert(
            message_id.to_string(),
            PendingEdit {
                channel_id: channel_id.to_string(),
                embed,
            },
        );
        new_window
    }

    /// Forget any queued payload for `message_id`.
    ///
    /// A flush task already scheduled for it will find nothing and do nothing.
    pub async fn remove_pending(&self, message_id: &str) {
        self.pending.lock().await.remove(message_id);
    }

    /// Number of messages with a queued payload.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    fn schedule_flush(&self, message_id: String) {
        let pending = Arc::clone(&self.pending);
        let platform = Arc::clone(&self.platform);
        let debounce = self.debounce;

        tokio::spawn(async move {
            sleep(debounce).await;

            let Some(edit) = pending.lock().await.remove(&message_id) else {
                return;
            };

            if let Err(err) = platform
                .edit_message(&edit.channel_id, &message_id, &edit.embed)
                .await
            {
                warn!(
                    message_id = %message_id,
                    channel_id = %edit.channel_id,
                    error = %err,
                    "failed to edit status message"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::embed::EmbedField,
        platform::testing::{PlatformCall, RecordingPlatform},
    };

    const WINDOW: Duration = Duration::from_secs(2);

    fn embed(title: &str) -> Embed {
        Embed {
            title: Some(title.into()),
            fields: vec![EmbedField::new("Host", "<@1>")],
            ..Embed::default()
        }
    }

    fn dispatcher() -> (Arc<RecordingPlatform>, EditDispatcher) {
        let platform = Arc::new(RecordingPlatform::new());
        let dispatcher = EditDispatcher::new(platform.clone(), WINDOW);
        (platform, dispatcher)
    }

    async fn past_window() {
        sleep(WINDOW + Duration::from_millis(100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete_payload_is_rejected_without_platform_call() {
        let (platform, dispatcher) = dispatcher();
        let mut bad = embed("bad");
        bad.fields.push(EmbedField::new("Player", ""));

        assert!(!dispatcher.submit_edit("m1", "c1", bad).await);
        assert_eq!(dispatcher.pending_len().await, 0);

        past_window().await;
        assert!(platform.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_collapse_into_last_payload() {
        let (platform, dispatcher) = dispatcher();

        assert!(dispatcher.submit_edit("m1", "c1", embed("first")).await);
        assert!(!dispatcher.submit_edit("m1", "c1", embed("second")).await);
        assert!(!dispatcher.submit_edit("m1", "c1", embed("third")).await);

        past_window().await;

        let edits = platform.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, "m1");
        assert_eq!(edits[0].1.title.as_deref(), Some("third"));
        assert_eq!(dispatcher.pending_len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_sent_before_the_window_closes() {
        let (platform, dispatcher) = dispatcher();
        dispatcher.submit_edit("m1", "c1", embed("first")).await;

        sleep(WINDOW / 2).await;
        assert!(platform.calls().is_empty());

        past_window().await;
        assert_eq!(platform.edits().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_messages_get_independent_windows() {
        let (platform, dispatcher) = dispatcher();

        assert!(dispatcher.submit_edit("m1", "c1", embed("one")).await);
        assert!(dispatcher.submit_edit("m2", "c2", embed("two")).await);

        past_window().await;

        let mut edited: Vec<_> = platform
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Edit {
                    channel_id,
                    message_id,
                    ..
                } => Some((message_id, channel_id)),
                _ => None,
            })
            .collect();
        edited.sort();
        assert_eq!(
            edited,
            vec![("m1".into(), "c1".into()), ("m2".into(), "c2".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn a_new_window_opens_after_flush() {
        let (platform, dispatcher) = dispatcher();

        assert!(dispatcher.submit_edit("m1", "c1", embed("first")).await);
        past_window().await;
        assert!(dispatcher.submit_edit("m1", "c1", embed("second")).await);
        past_window().await;

        let titles: Vec<_> = platform
            .edits()
            .into_iter()
            .map(|(_, embed)| embed.title.unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn removed_pending_edit_is_never_sent() {
        let (platform, dispatcher) = dispatcher();

        dispatcher.submit_edit("m1", "c1", embed("doomed")).await;
        dispatcher.remove_pending("m1").await;
        past_window().await;

        assert!(platform.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submitters_share_one_window() {
        let (platform, dispatcher) = dispatcher();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher
                        .submit_edit("m1", "c1", embed(&format!("edit-{i}")))
                        .await
                })
            })
            .collect();

        let mut opened = 0;
        for handle in handles {
            if handle.await.unwrap() {
                opened += 1;
            }
        }
        assert_eq!(opened, 1);

        past_window().await;
        assert_eq!(platform.edits().len(), 1);
    }
}
