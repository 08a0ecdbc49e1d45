//! Render tunables: quality tiers and the JSON/env render config.

/// Named output quality tiers.
pub mod presets;
/// `RenderConfig` loading, env overrides and validation.
pub mod settings;
