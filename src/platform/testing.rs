//! In-memory platform double used by unit tests.

use std::{
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use tokio::time::sleep;

use super::{MessagingPlatform, PlatformError, PlatformResult, SentMessage};
use crate::dto::embed::{ActionRow, Embed};

/// One recorded platform request.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum PlatformCall {
    Send {
        channel_id: String,
        embed: Embed,
        components: Vec<ActionRow>,
    },
    Edit {
        channel_id: String,
        message_id: String,
        embed: Embed,
    },
    Delete {
        channel_id: String,
        message_id: String,
    },
}

/// Records every call and answers with configurable outcomes.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    next_id: AtomicU64,
    /// Fail every send.
    pub fail_send: AtomicBool,
    /// Fail every edit.
    pub fail_edit: AtomicBool,
    /// Fail every delete.
    pub fail_delete: AtomicBool,
    /// Delay before each response resolves, in milliseconds.
    pub latency_ms: AtomicU64,
}

impl RecordingPlatform {
    /// Platform that answers immediately and succeeds.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Self::default()
        }
    }

    /// Every call so far, in request order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Edits as `(message_id, embed)` pairs.
    pub fn edits(&self) -> Vec<(String, Embed)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Edit {
                    message_id, embed, ..
                } => Some((message_id, embed)),
                _ => None,
            })
            .collect()
    }

    /// Number of sends.
    pub fn sends(&self) -> usize {
        self.count(|call| matches!(call, PlatformCall::Send { .. }))
    }

    /// Number of deletes.
    pub fn deletes(&self) -> usize {
        self.count(|call| matches!(call, PlatformCall::Delete { .. }))
    }

    fn count(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn respond<T: Send + 'static>(
        &self,
        result: PlatformResult<T>,
    ) -> BoxFuture<'static, PlatformResult<T>> {
        let latency = Duration::from_millis(self.latency_ms.load(Ordering::SeqCst));
        async move {
            if !latency.is_zero() {
                sleep(latency).await;
            }
            result
        }
        .boxed()
    }

    fn failure(path: &str) -> PlatformError {
        PlatformError::RequestStatus {
            path: path.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl MessagingPlatform for RecordingPlatform {
    fn send_message(
        &self,
        channel_id: &str,
        embed: &Embed,
        components: &[ActionRow],
    ) -> BoxFuture<'static, PlatformResult<SentMessage>> {
        self.record(PlatformCall::Send {
            channel_id: channel_id.to_string(),
            embed: embed.clone(),
            components: components.to_vec(),
        });
        let result = if self.fail_send.load(Ordering::SeqCst) {
            Err(Self::failure("send"))
        } else {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            Ok(SentMessage {
                id: id.to_string(),
                channel_id: channel_id.to_string(),
            })
        };
        self.respond(result)
    }

    fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        embed: &Embed,
    ) -> BoxFuture<'static, PlatformResult<()>> {
        self.record(PlatformCall::Edit {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
            embed: embed.clone(),
        });
        let result = if self.fail_edit.load(Ordering::SeqCst) {
            Err(Self::failure("edit"))
        } else {
            Ok(())
        };
        self.respond(result)
    }

    fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> BoxFuture<'static, PlatformResult<()>> {
        self.record(PlatformCall::Delete {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
        });
        let result = if self.fail_delete.load(Ordering::SeqCst) {
            Err(Self::failure("delete"))
        } else {
            Ok(())
        };
        self.respond(result)
    }
}
