mod client;
mod config;

pub use client::DiscordClient;
pub use config::DiscordConfig;
