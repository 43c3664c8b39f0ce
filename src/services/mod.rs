/// Colour-selection controls attached to status messages.
pub mod components;
/// OpenAPI documentation generation.
pub mod documentation;
/// Debounced, coalescing edit queue.
pub mod edit_dispatcher;
/// Health check service.
pub mod health_service;
/// Player to participant resolution.
pub mod linker;
/// Message catalog and templating.
pub mod localization;
/// Match commands and telemetry ingestion.
pub mod match_service;
/// Platform request counters.
pub mod metrics;
/// Phase-driven status rendering.
pub mod renderer;
/// Status message lifecycle.
pub mod status_service;
