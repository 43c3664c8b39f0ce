use std::time::{Duration, SystemTime};

use tracing::warn;

use crate::platform::{MessagingPlatform, SentMessage};

/// Reference to the live status message bound to a match.
///
/// Empty identifiers mean "no message bound".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    /// Platform message identifier.
    pub message_id: String,
    /// Channel the message lives in.
    pub channel_id: String,
    /// Participant who asked for the message.
    pub leader_id: String,
    /// When the message was sent; drives staleness.
    pub created_at: Option<SystemTime>,
}

impl StatusMessage {
    /// Record built from a successful send.
    pub fn bound(leader_id: impl Into<String>, sent: SentMessage, created_at: SystemTime) -> Self {
        Self {
            message_id: sent.id,
            channel_id: sent.channel_id,
            leader_id: leader_id.into(),
            created_at: Some(created_at),
        }
    }

    /// True iff both identifiers are set.
    pub fn exists(&self) -> bool {
        !self.message_id.is_empty() && !self.channel_id.is_empty()
    }

    /// Age of the message at `now`; zero when unbound or when the clock went backwards.
    pub fn age_at(&self, now: SystemTime) -> Duration {
        self.created_at
            .and_then(|created| now.duration_since(created).ok())
            .unwrap_or_default()
    }

    /// The platform refuses edits on messages older than `horizon`.
    pub fn is_stale_at(&self, now: SystemTime, horizon: Duration) -> bool {
        self.exists() && self.age_at(now) > horizon
    }

    /// Best-effort removal of the message from the platform.
    ///
    /// Returns whether the platform confirmed the deletion; unbound records return false.
    pub async fn delete(&self, platform: &dyn MessagingPlatform) -> bool {
        if !self.exists() {
            return false;
        }

        match platform
            .delete_message(&self.channel_id, &self.message_id)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    message_id = %self.message_id,
                    channel_id = %self.channel_id,
                    error = %err,
                    "failed to delete status message"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_at(created_at: SystemTime) -> StatusMessage {
        StatusMessage::bound(
            "42",
            SentMessage {
                id: "m1".into(),
                channel_id: "c1".into(),
            },
            created_at,
        )
    }

    #[test]
    fn exists_requires_both_ids() {
        assert!(!StatusMessage::default().exists());
        let mut msg = bound_at(SystemTime::now());
        assert!(msg.exists());
        msg.channel_id.clear();
        assert!(!msg.exists());
    }

    #[test]
    fn staleness_uses_strict_horizon() {
        let now = SystemTime::now();
        let hour = Duration::from_secs(3600);

        assert!(!bound_at(now - hour).is_stale_at(now, hour));
        assert!(bound_at(now - hour - Duration::from_secs(1)).is_stale_at(now, hour));
        assert!(!bound_at(now - Duration::from_secs(60)).is_stale_at(now, hour));
    }

    #[test]
    fn unbound_record_is_never_stale() {
        let now = SystemTime::now();
        assert!(!StatusMessage::default().is_stale_at(now, Duration::ZERO));
    }
}
