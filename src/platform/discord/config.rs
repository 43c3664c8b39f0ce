use crate::platform::error::{PlatformError, PlatformResult};

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Runtime configuration describing how to reach the Discord REST API.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// REST base url without a trailing slash.
    pub api_base: String,
    /// Bot token sent in the authorization header.
    pub token: String,
}

impl DiscordConfig {
    /// Construct a configuration for the public API with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at another API root (proxies, test doubles).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> PlatformResult<Self> {
        let token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| PlatformError::MissingEnvVar {
                var: "DISCORD_TOKEN",
            })?;

        let mut config = Self::new(token);
        if let Some(api_base) = std::env::var("DISCORD_API_BASE")
            .ok()
            .filter(|value| !value.is_empty())
        {
            config = config.with_api_base(api_base);
        }

        Ok(config)
    }
}
