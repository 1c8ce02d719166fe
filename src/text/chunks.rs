//! Chunk Tokenizer - Split free-form text into text and hashtag chunks
//!
//! Used by rich text inputs and post bodies to colorize hashtags while the
//! user types. The tokenizer is a single linear scan and is total: every
//! string, including the empty string, has a chunking.
//!
//! # Rules
//!
//! - `#` followed by one or more word characters starts a hashtag
//! - the hashtag ends at the first character that cannot continue a word
//! - a `#` with no word character after it is literal text
//! - consecutive literal text is merged into one chunk
//! - the empty string has no chunks
//!
//! A word character is any Unicode alphanumeric or `_`, so `#café`, `#日本`
//! and `#1abc` are all hashtags.
//!
//! # Example
//!
//! ```
//! use social_client_core::text::{get_chunks, reassemble, Chunk};
//!
//! let chunks = get_chunks("hello #world test");
//! assert_eq!(chunks, vec![
//!     Chunk::text("hello "),
//!     Chunk::hashtag("world"),
//!     Chunk::text(" test"),
//! ]);
//! assert_eq!(reassemble(&chunks), "hello #world test");
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// TYPES
// =============================================================================

/// A tagged segment of input text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Chunk {
    /// Literal text, whitespace included.
    Text { text: String },
    /// Hashtag name without the leading `#`.
    Hashtag { text: String },
}

impl Chunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn hashtag(text: impl Into<String>) -> Self {
        Self::Hashtag { text: text.into() }
    }

    /// Chunk payload (hashtags without their `#`).
    pub fn content(&self) -> &str {
        match self {
            Self::Text { text } | Self::Hashtag { text } => text,
        }
    }

    pub fn is_hashtag(&self) -> bool {
        matches!(self, Self::Hashtag { .. })
    }

    /// The chunk exactly as it appeared in the source text.
    pub fn as_source(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Hashtag { text } => format!("#{text}"),
        }
    }
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Characters that may continue a hashtag.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Split `input` into ordered text and hashtag chunks.
pub fn get_chunks(input: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut text_start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '#' {
            continue;
        }

        let tag_start = i + c.len_utf8();
        let mut tag_end = tag_start;
        while let Some(&(j, next)) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            tag_end = j + next.len_utf8();
            chars.next();
        }

        // Bare `#`: stays part of the surrounding text
        if tag_end == tag_start {
            continue;
        }

        if text_start < i {
            chunks.push(Chunk::text(&input[text_start..i]));
        }
        chunks.push(Chunk::hashtag(&input[tag_start..tag_end]));
        text_start = tag_end;
    }

    if text_start < input.len() {
        chunks.push(Chunk::text(&input[text_start..]));
    }

    chunks
}

/// Rebuild the source text from its chunks.
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        if chunk.is_hashtag() {
            out.push('#');
        }
        out.push_str(chunk.content());
    }
    out
}

/// Distinct hashtag names in order of first appearance.
pub fn hashtags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for chunk in get_chunks(input) {
        if let Chunk::Hashtag { text } = chunk {
            if !tags.contains(&text) {
                tags.push(text);
            }
        }
    }
    tags
}

// =============================================================================
// TESTS
// =============================================================================
