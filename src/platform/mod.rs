/// Discord REST implementation.
pub mod discord;
/// Platform error types.
pub mod error;
#[cfg(test)]
pub mod testing;

use futures::future::BoxFuture;

use crate::dto::embed::{ActionRow, Embed};

pub use self::error::{PlatformError, PlatformResult};

/// Identifiers of a message the platform accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Platform message id.
    pub id: String,
    /// Channel the message lives in.
    pub channel_id: String,
}

/// Abstraction over the chat platform's message primitives.
pub trait MessagingPlatform: Send + Sync {
    fn send_message(
        &self,
        channel_id: &str,
        embed: &Embed,
        components: &[ActionRow],
    ) -> BoxFuture<'static, PlatformResult<SentMessage>>;
    fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        embed: &Embed,
    ) -> BoxFuture<'static, PlatformResult<()>>;
    fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> BoxFuture<'static, PlatformResult<()>>;
}
