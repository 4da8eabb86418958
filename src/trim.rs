//! Prompt trimming to a context-token budget.
//!
//! This module shrinks oversized prompts until they fit a model's context
//! window, using as few destructive cuts as possible:
//!
//! - Token counting via an injected [`TokenCounter`]
//! - Overflow estimation from a characters-per-token heuristic
//! - Character-aware splitting via a [`TextChunker`]
//! - A hard character floor guaranteeing termination
//!
//! ## Example
//!
//! ```rust,ignore
//! use prompt_fit::trim::PromptTrimmer;
//!
//! let trimmer = PromptTrimmer::o200k()?;
//! let prompt = trimmer.trim(&huge_research_context);
//! ```

use crate::error::ModelError;
use crate::tokenizer::{TiktokenCounter, TokenCounter};
use std::fmt;
use std::sync::Arc;
use text_splitter::TextSplitter;

// =============================================================================
// Trim Config
// =============================================================================

/// Configuration for prompt trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimConfig {
    /// Maximum tokens a prompt may occupy.
    pub max_context_tokens: usize,

    /// The smallest output the trimmer will ever return, in characters.
    ///
    /// Shrinking never goes below this; pathological inputs are hard-cut
    /// to this length instead.
    pub min_chunk_chars: usize,

    /// Approximate characters per token, used to estimate how many
    /// characters an overflow is worth.
    ///
    /// This is a heuristic, not a conversion: real token boundaries vary
    /// with content. 3 is a reasonable average for mixed English and code.
    pub chars_per_token: usize,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: 120_000,
            min_chunk_chars: 140,
            chars_per_token: 3,
        }
    }
}

impl TrimConfig {
    /// Creates a config with the specified token budget.
    ///
    /// Uses default values for other settings.
    #[must_use]
    pub fn with_max_context_tokens(max_context_tokens: usize) -> Self {
        Self {
            max_context_tokens,
            ..Self::default()
        }
    }

    /// Sets the minimum output size in characters.
    #[must_use]
    pub fn with_min_chunk_chars(mut self, min_chunk_chars: usize) -> Self {
        self.min_chunk_chars = min_chunk_chars;
        self
    }

    /// Sets the characters-per-token heuristic.
    ///
    /// Clamped to at least 1; a zero ratio would stall the shrink loop.
    #[must_use]
    pub fn with_chars_per_token(mut self, chars_per_token: usize) -> Self {
        self.chars_per_token = chars_per_token.max(1);
        self
    }
}

// =============================================================================
// Text Chunker
// =============================================================================

/// Trait for splitting text and taking the leading chunk.
///
/// Only the first chunk is used by the trimmer. The first chunk's character
/// length is expected to be at most `chunk_size`, but this is not strictly
/// guaranteed by every splitter; the trimmer guards against non-progress.
pub trait TextChunker: Send + Sync {
    /// Splits `text` into chunks of at most `chunk_size` characters with no
    /// overlap and returns the first one, or `None` for empty input.
    fn first_chunk(&self, text: &str, chunk_size: usize) -> Option<String>;
}

/// Character-sized recursive splitter backed by the `text-splitter` crate.
///
/// Splits on semantic boundaries (paragraphs, sentences, words) where
/// possible, falling back to character boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterChunker;

impl TextChunker for CharacterChunker {
    fn first_chunk(&self, text: &str, chunk_size: usize) -> Option<String> {
        let splitter = TextSplitter::new(chunk_size);
        let first = splitter.chunks(text).next().map(str::to_string);
        first
    }
}

// =============================================================================
// Prompt Trimmer
// =============================================================================

/// Shrinks prompts to fit within a context-token budget.
///
/// The trimmer repeatedly measures the prompt and cuts it down until its
/// token count fits the budget, bottoming out at a fixed character floor.
/// It always produces a usable string; no error conditions are surfaced.
///
/// Each call is self-contained and stateless; a single trimmer can be
/// shared across threads.
#[derive(Clone)]
pub struct PromptTrimmer {
    tokenizer: Arc<dyn TokenCounter>,
    chunker: Arc<dyn TextChunker>,
    config: TrimConfig,
}

impl PromptTrimmer {
    /// Creates a trimmer with the given token counter and default config.
    #[must_use]
    pub fn new(tokenizer: Arc<dyn TokenCounter>) -> Self {
        Self {
            tokenizer,
            chunker: Arc::new(CharacterChunker),
            config: TrimConfig::default(),
        }
    }

    /// Creates a trimmer backed by tiktoken's `o200k_base` encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding vocabulary cannot be loaded.
    pub fn o200k() -> Result<Self, ModelError> {
        Ok(Self::new(Arc::new(TiktokenCounter::o200k()?)))
    }

    /// Sets the trim configuration.
    #[must_use]
    pub fn with_config(mut self, config: TrimConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the text chunker.
    #[must_use]
    pub fn with_chunker(mut self, chunker: Arc<dyn TextChunker>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &TrimConfig {
        &self.config
    }

    /// Trims the prompt to the configured token budget.
    #[must_use]
    pub fn trim(&self, prompt: &str) -> String {
        self.trim_to(prompt, self.config.max_context_tokens)
    }

    /// Trims the prompt to the given token budget.
    ///
    /// Returns the prompt unchanged if it is empty or already fits. The
    /// result's token count is within `max_tokens`, except when shrinking
    /// bottoms out: then the first `min_chunk_chars` characters are
    /// returned as a hard cutoff. A zero budget is not an error; it
    /// resolves to the floor.
    ///
    /// Each iteration either returns or strictly shortens the text, so the
    /// loop terminates for all finite inputs.
    #[must_use]
    pub fn trim_to(&self, prompt: &str, max_tokens: usize) -> String {
        let mut text = prompt.to_string();

        loop {
            if text.is_empty() {
                return text;
            }

            let tokens = self.tokenizer.count_tokens(&text);
            if tokens <= max_tokens {
                return text;
            }

            let char_len = text.chars().count();
            let overflow = tokens - max_tokens;
            // Clamp the ratio here as well as in the builder: the config
            // fields are public, and a zero ratio would leave chunk_size
            // equal to char_len, stalling the loop.
            let chars_per_token = self.config.chars_per_token.max(1);
            let chunk_size = char_len.saturating_sub(overflow * chars_per_token);

            if chunk_size < self.config.min_chunk_chars {
                tracing::debug!(
                    tokens,
                    max_tokens,
                    "overflow too large to split, hard-cutting to the floor"
                );
                return prefix_chars(&text, self.config.min_chunk_chars).to_string();
            }

            tracing::debug!(tokens, max_tokens, chunk_size, "prompt over budget, shrinking");

            let chunk = self
                .chunker
                .first_chunk(&text, chunk_size)
                .unwrap_or_default();

            // The splitter can fail to shrink the text when token and
            // character boundaries disagree; force progress with a hard cut.
            if chunk.chars().count() == char_len {
                text = prefix_chars(&text, chunk_size).to_string();
            } else {
                text = chunk;
            }
        }
    }
}

impl fmt::Debug for PromptTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptTrimmer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Returns the prefix of `text` that is at most `n` characters long,
/// respecting UTF-8 boundaries.
fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic counter: one token per `chars_per_token` characters,
    /// rounded up.
    struct UniformCounter {
        chars_per_token: usize,
    }

    impl TokenCounter for UniformCounter {
        fn count_tokens(&self, text: &str) -> usize {
            text.chars().count().div_ceil(self.chars_per_token)
        }
    }

    /// Chunker that never shrinks its input, simulating a splitter stuck on
    /// an unsplittable string.
    struct NoProgressChunker;

    impl TextChunker for NoProgressChunker {
        fn first_chunk(&self, text: &str, _chunk_size: usize) -> Option<String> {
            Some(text.to_string())
        }
    }

    fn trimmer_with(chars_per_token: usize) -> PromptTrimmer {
        PromptTrimmer::new(Arc::new(UniformCounter { chars_per_token }))
    }

    // -------------------------------------------------------------------------
    // Config Tests
    // -------------------------------------------------------------------------

    #[test]
    fn config_default() {
        let config = TrimConfig::default();
        assert_eq!(config.max_context_tokens, 120_000);
        assert_eq!(config.min_chunk_chars, 140);
        assert_eq!(config.chars_per_token, 3);
    }

    #[test]
    fn config_builder_chain() {
        let config = TrimConfig::with_max_context_tokens(4096)
            .with_min_chunk_chars(80)
            .with_chars_per_token(4);

        assert_eq!(config.max_context_tokens, 4096);
        assert_eq!(config.min_chunk_chars, 80);
        assert_eq!(config.chars_per_token, 4);
    }

    #[test]
    fn config_clamps_zero_chars_per_token() {
        let config = TrimConfig::default().with_chars_per_token(0);
        assert_eq!(config.chars_per_token, 1);
    }

    #[test]
    fn zero_ratio_struct_literal_config_still_terminates() {
        // The fields are public, so a zero ratio can bypass the builder
        // clamp; the loop must still make progress and bottom out
        let config = TrimConfig {
            chars_per_token: 0,
            ..TrimConfig::default()
        };
        let trimmer = trimmer_with(1).with_config(config);
        let prompt = "r".repeat(1000);

        let result = trimmer.trim_to(&prompt, 10);

        assert_eq!(result.chars().count(), 140);
    }

    // -------------------------------------------------------------------------
    // Early Return Tests
    // -------------------------------------------------------------------------

    #[test]
    fn empty_prompt_returns_empty() {
        let trimmer = trimmer_with(1);
        assert_eq!(trimmer.trim_to("", 1000), "");
        assert_eq!(trimmer.trim_to("", 0), "");
    }

    #[test]
    fn prompt_within_budget_is_unchanged() {
        let trimmer = trimmer_with(1);
        let prompt = "short prompt that easily fits";

        assert_eq!(trimmer.trim_to(prompt, 1000), prompt);
    }

    #[test]
    fn prompt_exactly_at_budget_is_unchanged() {
        // 50 chars at 1 char/token = exactly 50 tokens
        let trimmer = trimmer_with(1);
        let prompt = "a".repeat(50);

        assert_eq!(trimmer.trim_to(&prompt, 50), prompt);
    }

    // -------------------------------------------------------------------------
    // Shrink Loop Tests
    // -------------------------------------------------------------------------

    #[test]
    fn oversized_prompt_is_shrunk_within_budget() {
        // 6000 tokens against a 5000 budget: one split pass should land
        // within budget (chunk size 6000 - 1000*3 = 3000 chars = 3000 tokens)
        let trimmer = trimmer_with(1);
        let prompt = "word ".repeat(1200);
        assert_eq!(prompt.chars().count(), 6000);

        let result = trimmer.trim_to(&prompt, 5000);

        assert!(result.chars().count() < prompt.chars().count());
        assert!(trimmer.tokenizer.count_tokens(&result) <= 5000);
    }

    #[test]
    fn shrink_repeats_until_within_budget() {
        // A chunker that only sheds one character per pass forces the loop
        // to re-measure and cut repeatedly; each pass sees strictly shorter
        // text and the loop still lands exactly on the budget
        struct OneCharChunker;

        impl TextChunker for OneCharChunker {
            fn first_chunk(&self, text: &str, _chunk_size: usize) -> Option<String> {
                let char_len = text.chars().count();
                Some(prefix_chars(text, char_len.saturating_sub(1)).to_string())
            }
        }

        let trimmer = trimmer_with(1).with_chunker(Arc::new(OneCharChunker));
        let prompt = "p".repeat(210);

        let result = trimmer.trim_to(&prompt, 200);

        assert_eq!(result.chars().count(), 200);
    }

    #[test]
    fn result_is_a_prefix_of_the_input() {
        let trimmer = trimmer_with(1);
        let prompt = "alpha beta gamma delta ".repeat(300);

        let result = trimmer.trim_to(&prompt, 2000);

        assert!(prompt.starts_with(result.trim_end()));
    }

    // -------------------------------------------------------------------------
    // Floor Cutoff Tests
    // -------------------------------------------------------------------------

    #[test]
    fn massive_overflow_hard_cuts_to_floor() {
        // Overflow estimate exceeds the text length, so the chunk size
        // collapses below the floor and the first 140 chars come back
        let trimmer = trimmer_with(1);
        let prompt = "x".repeat(10_000);

        let result = trimmer.trim_to(&prompt, 10);

        assert_eq!(result.chars().count(), 140);
    }

    #[test]
    fn zero_budget_resolves_to_floor() {
        let trimmer = trimmer_with(1);
        let prompt = "y".repeat(1000);

        let result = trimmer.trim_to(&prompt, 0);

        assert_eq!(result.chars().count(), 140);
    }

    #[test]
    fn floor_respects_short_inputs() {
        // 100 chars is already below the 140-char floor; the hard cut
        // returns the whole text rather than padding it
        let trimmer = trimmer_with(1);
        let prompt = "z".repeat(100);

        let result = trimmer.trim_to(&prompt, 0);

        assert_eq!(result, prompt);
    }

    #[test]
    fn floor_is_tunable() {
        let trimmer =
            trimmer_with(1).with_config(TrimConfig::default().with_min_chunk_chars(40));
        let prompt = "q".repeat(1000);

        let result = trimmer.trim_to(&prompt, 0);

        assert_eq!(result.chars().count(), 40);
    }

    // -------------------------------------------------------------------------
    // Forced Progress Tests
    // -------------------------------------------------------------------------

    #[test]
    fn non_progress_splitter_triggers_hard_cut() {
        // chunk size 1000 - 100*1 = 900; the stuck chunker returns the full
        // text, so the trimmer cuts to exactly 900 chars, which then fits
        let trimmer = trimmer_with(1)
            .with_config(TrimConfig::default().with_chars_per_token(1))
            .with_chunker(Arc::new(NoProgressChunker));
        let prompt = "n".repeat(1000);

        let result = trimmer.trim_to(&prompt, 900);

        assert_eq!(result.chars().count(), 900);
    }

    #[test]
    fn non_progress_splitter_still_terminates_at_floor() {
        let trimmer = trimmer_with(1).with_chunker(Arc::new(NoProgressChunker));
        let prompt = "m".repeat(5000);

        let result = trimmer.trim_to(&prompt, 100);

        assert!(
            trimmer.tokenizer.count_tokens(&result) <= 100
                || result.chars().count() == trimmer.config().min_chunk_chars
        );
    }

    // -------------------------------------------------------------------------
    // Unicode Safety Tests
    // -------------------------------------------------------------------------

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let trimmer = trimmer_with(1);
        let prompt = "héllo wörld ünïcode ".repeat(500);

        // Must not panic on a byte-offset slice inside a multibyte char
        let result = trimmer.trim_to(&prompt, 50);

        assert!(!result.is_empty());
        assert!(result.chars().count() <= prompt.chars().count());
    }

    #[test]
    fn prefix_chars_handles_short_text() {
        assert_eq!(prefix_chars("abc", 10), "abc");
        assert_eq!(prefix_chars("abcdef", 3), "abc");
        assert_eq!(prefix_chars("", 5), "");
    }

    // -------------------------------------------------------------------------
    // Default Budget Tests
    // -------------------------------------------------------------------------

    #[test]
    fn trim_uses_configured_budget() {
        let trimmer =
            trimmer_with(1).with_config(TrimConfig::with_max_context_tokens(500));
        let prompt = "budget test ".repeat(200);

        let result = trimmer.trim(&prompt);

        assert!(trimmer.tokenizer.count_tokens(&result) <= 500);
    }

    // -------------------------------------------------------------------------
    // Character Chunker Tests
    // -------------------------------------------------------------------------

    #[test]
    fn character_chunker_first_chunk_respects_size() {
        let chunker = CharacterChunker;
        let text = "one two three four five six seven eight nine ten ".repeat(10);

        let chunk = chunker.first_chunk(&text, 100).unwrap();

        assert!(chunk.chars().count() <= 100);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn character_chunker_empty_input_has_no_chunks() {
        let chunker = CharacterChunker;
        assert!(chunker.first_chunk("", 100).is_none());
    }

    #[test]
    fn character_chunker_short_input_is_one_chunk() {
        let chunker = CharacterChunker;
        let chunk = chunker.first_chunk("tiny", 100).unwrap();
        assert_eq!(chunk, "tiny");
    }

    // -------------------------------------------------------------------------
    // Tiktoken Integration Tests
    // -------------------------------------------------------------------------

    #[test]
    fn o200k_trimmer_fits_real_tokens_to_budget() -> anyhow::Result<()> {
        let trimmer = PromptTrimmer::o200k()?;
        let prompt = "The quick brown fox jumps over the lazy dog. ".repeat(200);

        let result = trimmer.trim_to(&prompt, 50);
        let counter = TiktokenCounter::o200k()?;

        assert!(
            counter.count_tokens(&result) <= 50
                || result.chars().count() == trimmer.config().min_chunk_chars
        );
        assert!(result.chars().count() < prompt.chars().count());
        Ok(())
    }

    #[test]
    fn o200k_trimmer_leaves_small_prompts_alone() -> anyhow::Result<()> {
        let trimmer = PromptTrimmer::o200k()?;
        let prompt = "What is the capital of France?";

        assert_eq!(trimmer.trim(prompt), prompt);
        Ok(())
    }
}
