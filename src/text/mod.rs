//! Text Module - Rich text handling for post bodies and inputs
//!
//! - **Chunks** - Hashtag tokenizer (text/hashtag chunk sequences)
//! - **Highlight** - Styled terminal rendering of chunk sequences

pub mod chunks;
pub mod highlight;

pub use chunks::*;
pub use highlight::{display_width, highlight, render_chunks, HighlightStyle};
