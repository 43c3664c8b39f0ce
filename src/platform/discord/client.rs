use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::DiscordConfig;
use crate::{
    dto::embed::{ActionRow, Embed},
    platform::{
        MessagingPlatform, SentMessage,
        error::{PlatformError, PlatformResult},
    },
};

/// Body of a create-message request.
#[derive(Serialize)]
struct CreateMessageBody<'a> {
    embeds: [&'a Embed; 1],
    components: &'a [ActionRow],
}

/// Body of an edit-message request; components are left untouched.
#[derive(Serialize)]
struct EditMessageBody<'a> {
    embeds: [&'a Embed; 1],
}

#[derive(Deserialize)]
struct MessageResponse {
    id: String,
    channel_id: String,
}

/// [`MessagingPlatform`] backed by the Discord REST API.
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    api_base: Arc<str>,
    authorization: Arc<str>,
}

impl DiscordClient {
    /// Build the HTTP client for the configured API root.
    pub fn new(config: DiscordConfig) -> PlatformResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("status-beacon/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| PlatformError::ClientBuilder { source })?;

        Ok(Self {
            client,
            api_base: Arc::from(config.api_base.trim_end_matches('/')),
            authorization: Arc::from(format!("Bot {}", config.token)),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.api_base, path);
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, self.authorization.as_ref())
    }
}

fn message_path(channel_id: &str, message_id: &str) -> String {
    format!("channels/{channel_id}/messages/{message_id}")
}

async fn send_checked(
    builder: reqwest::RequestBuilder,
    path: &str,
) -> PlatformResult<reqwest::Response> {
    let response = builder
        .send()
        .await
        .map_err(|source| PlatformError::RequestSend {
            path: path.to_string(),
            source,
        })?;

    match response.status() {
        status if status.is_success() => Ok(response),
        status => Err(PlatformError::RequestStatus {
            path: path.to_string(),
            status,
        }),
    }
}

impl MessagingPlatform for DiscordClient {
    fn send_message(
        &self,
        channel_id: &str,
        embed: &Embed,
        components: &[ActionRow],
    ) -> BoxFuture<'static, PlatformResult<SentMessage>> {
        let path = format!("channels/{channel_id}/messages");
        let builder = self.request(Method::POST, &path).json(&CreateMessageBody {
            embeds: [embed],
            components,
        });

        async move {
            let response = send_checked(builder, &path).await?;
            let message = response.json::<MessageResponse>().await.map_err(|source| {
                PlatformError::DecodeResponse {
                    path: path.clone(),
                    source,
                }
            })?;
            debug!(message_id = %message.id, channel_id = %message.channel_id, "message sent");
            Ok(SentMessage {
                id: message.id,
                channel_id: message.channel_id,
            })
        }
        .boxed()
    }

    fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        embed: &Embed,
    ) -> BoxFuture<'static, PlatformResult<()>> {
        let path = message_path(channel_id, message_id);
        let builder = self
            .request(Method::PATCH, &path)
            .json(&EditMessageBody { embeds: [embed] });

        async move {
            send_checked(builder, &path).await?;
            Ok(())
        }
        .boxed()
    }

    fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> BoxFuture<'static, PlatformResult<()>> {
        let path = message_path(channel_id, message_id);
        let builder = self.request(Method::DELETE, &path);

        async move {
            match send_checked(builder, &path).await {
                Ok(_) => Ok(()),
                // Already gone counts as deleted.
                Err(PlatformError::RequestStatus {
                    status: StatusCode::NOT_FOUND,
                    ..
                }) => Ok(()),
                Err(err) => Err(err),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode as HttpStatus},
        routing::{delete, post},
    };
    use tokio::net::TcpListener;

    use super::*;

    async fn fake_discord() -> DiscordClient {
        let app = Router::new()
            .route(
                "/channels/{channel_id}/messages",
                post(
                    |Path(channel_id): Path<String>, headers: HeaderMap| async move {
                        if headers.get("authorization").and_then(|v| v.to_str().ok())
                            != Some("Bot secret")
                        {
                            return Err(HttpStatus::UNAUTHORIZED);
                        }
                        Ok(Json(serde_json::json!({ "id": "555", "channel_id": channel_id })))
                    },
                ),
            )
            .route(
                "/channels/{channel_id}/messages/{message_id}",
                delete(|Path((_, message_id)): Path<(String, String)>| async move {
                    match message_id.as_str() {
                        "gone" => HttpStatus::NOT_FOUND,
                        "locked" => HttpStatus::FORBIDDEN,
                        _ => HttpStatus::NO_CONTENT,
                    }
                }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        DiscordClient::new(DiscordConfig::new("secret").with_api_base(format!("http://{addr}")))
            .unwrap()
    }

    #[tokio::test]
    async fn send_returns_platform_ids() {
        let client = fake_discord().await;
        let sent = client
            .send_message("42", &Embed::default(), &[])
            .await
            .unwrap();
        assert_eq!(
            sent,
            SentMessage {
                id: "555".into(),
                channel_id: "42".into()
            }
        );
    }

    #[tokio::test]
    async fn delete_of_missing_message_succeeds() {
        let client = fake_discord().await;
        assert!(client.delete_message("42", "gone").await.is_ok());
        assert!(client.delete_message("42", "1").await.is_ok());
        assert!(matches!(
            client.delete_message("42", "locked").await,
            Err(PlatformError::RequestStatus {
                status: StatusCode::FORBIDDEN,
                ..
            })
        ));
    }

    #[test]
    fn create_body_wraps_single_embed() {
        let embed = Embed {
            title: Some("Lobby".into()),
            ..Embed::default()
        };
        let rows = vec![ActionRow::new(Vec::new())];
        let json = serde_json::to_value(CreateMessageBody {
            embeds: [&embed],
            components: &rows,
        })
        .unwrap();
        assert_eq!(json["embeds"][0]["title"], "Lobby");
        assert_eq!(json["components"][0]["type"], 1);
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let client =
            DiscordClient::new(DiscordConfig::new("token").with_api_base("http://localhost/api/"))
                .unwrap();
        assert_eq!(client.api_base.as_ref(), "http://localhost/api");
        assert_eq!(client.authorization.as_ref(), "Bot token");
    }
}
