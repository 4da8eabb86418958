//! # prompt-fit: Context-Budget Management for LLM Prompts
//!
//! Configures access to a large-language-model provider and keeps prompts
//! within the provider's context-length budget.
//!
//! ## Architecture
//!
//! - **Model Registry**: supported model identifiers with display metadata
//! - **Client Factory**: callable model handles bound to an API key
//! - **Prompt Trimmer**: shrinks oversized prompts to a token budget via
//!   recursive text-splitting, with a hard floor guaranteeing termination
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use prompt_fit::prelude::*;
//!
//! let config = ProviderConfig::from_env()?;
//! let route = model_for_usage(DEFAULT_MODEL, &config)?;
//!
//! let trimmer = PromptTrimmer::o200k()?;
//! let prompt = trimmer.trim(&oversized_context);
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod tokenizer;
pub mod trim;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{create_model, model_for_usage, ModelHandle, ModelRoute, ProviderConfig};
    pub use crate::error::{ModelError, ModelErrorKind};
    pub use crate::models::{
        available_models, is_gateway_model, model_info, ModelInfo, DEFAULT_MODEL,
    };
    pub use crate::tokenizer::{TiktokenCounter, TokenCounter};
    pub use crate::trim::{CharacterChunker, PromptTrimmer, TextChunker, TrimConfig};
}
