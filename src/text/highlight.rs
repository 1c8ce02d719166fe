//! Highlight - Styled terminal rendering of chunk sequences
//!
//! Renders hashtags in an accent color while leaving surrounding text
//! untouched. Output is ANSI-styled via crossterm, so it can be written
//! straight to a terminal.

use crossterm::style::{style, Color, Stylize};
use unicode_width::UnicodeWidthStr;

use super::chunks::{get_chunks, Chunk};

/// Colors and attributes used when rendering chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightStyle {
    pub hashtag: Color,
    /// Color for plain text; `None` keeps the terminal default.
    pub text: Option<Color>,
    pub bold_hashtags: bool,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            hashtag: Color::Rgb { r: 0x1d, g: 0x6a, b: 0xff },
            text: None,
            bold_hashtags: true,
        }
    }
}

/// Render chunks as an ANSI-styled string. Hashtags keep their `#`.
pub fn render_chunks(chunks: &[Chunk], highlight: &HighlightStyle) -> String {
    let mut out = String::new();
    for chunk in chunks {
        match chunk {
            Chunk::Hashtag { .. } => {
                let mut styled = style(chunk.as_source()).with(highlight.hashtag);
                if highlight.bold_hashtags {
                    styled = styled.bold();
                }
                out.push_str(&styled.to_string());
            }
            Chunk::Text { text } => match highlight.text {
                Some(color) => out.push_str(&style(text.as_str()).with(color).to_string()),
                None => out.push_str(text),
            },
        }
    }
    out
}

/// Tokenize and render in one step.
pub fn highlight(input: &str, highlight: &HighlightStyle) -> String {
    render_chunks(&get_chunks(input), highlight)
}

/// Terminal cell width of the unstyled text the chunks represent.
pub fn display_width(chunks: &[Chunk]) -> usize {
    chunks.iter().map(|c| c.as_source().width()).sum()
}
