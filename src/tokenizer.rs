//! Token counting abstraction.
//!
//! Defines the `TokenCounter` trait which abstracts over tokenizer
//! implementations, plus the production `tiktoken` implementation. Counters
//! are constructed explicitly and injected so tests can substitute
//! deterministic fakes; there is no global encoder instance.

use crate::error::ModelError;
use std::fmt;
use tiktoken_rs::{o200k_base, CoreBPE};

/// Trait for counting tokens in text.
///
/// Implementations must be deterministic: the same text always yields the
/// same count. They must also be safe to share across threads for
/// concurrent read-only encoding.
pub trait TokenCounter: Send + Sync {
    /// Returns the number of tokens the text encodes to.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Token counter backed by tiktoken's `o200k_base` encoding.
///
/// This is the encoding used by the models this crate registers; token
/// counts are exact for those models, not estimates.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Creates a counter with the `o200k_base` encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding vocabulary cannot be loaded.
    pub fn o200k() -> Result<Self, ModelError> {
        let bpe = o200k_base().map_err(|e| ModelError::tokenizer_init(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"o200k_base")
            .finish()
    }
}
