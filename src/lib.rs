//! Library crate for status-beacon, exposing modules for the binary and tests.

/// Application configuration loaded at startup.
pub mod config;
/// Request, response and message payload types.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Messaging platform abstraction and the Discord client.
pub mod platform;
/// HTTP routes.
pub mod routes;
/// Rendering, syncing and match commands.
pub mod services;
/// Shared application and match state.
pub mod state;
