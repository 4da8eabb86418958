//! Model registry with display metadata.
//!
//! A static table of the model identifiers this crate knows how to configure,
//! along with the metadata a frontend needs to render a model picker (display
//! name, provider logo, vision capability).

use serde::Serialize;

/// Display metadata for a supported model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// The model identifier sent to the provider (e.g., "xai/grok-4-fast-reasoning")
    pub id: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Path to the provider logo asset
    pub logo: &'static str,
    /// Whether the model accepts image input
    pub vision: bool,
}

/// The default model identifier used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "xai/grok-4-fast-reasoning";

/// All supported models, in registration order.
static MODELS: &[ModelInfo] = &[ModelInfo {
    id: "xai/grok-4-fast-reasoning",
    name: "Grok-4 Fast Reasoning",
    logo: "/providers/openai.webp",
    vision: false,
}];

/// Returns every supported model.
#[must_use]
pub fn available_models() -> &'static [ModelInfo] {
    MODELS
}

/// Looks up a model by identifier.
#[must_use]
pub fn model_info(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Returns true if the identifier is registered.
#[must_use]
pub fn is_supported_model(id: &str) -> bool {
    model_info(id).is_some()
}

/// Returns true if the identifier names a gateway model.
///
/// Gateway identifiers have the form `provider/model-name`; the AI gateway
/// resolves them itself, so no direct client is constructed for them.
#[must_use]
pub fn is_gateway_model(id: &str) -> bool {
    id.contains('/')
}
