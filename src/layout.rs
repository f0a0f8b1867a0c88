//! Greedy word wrapping and page grouping for on-screen captions.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use rusttype::{point, Font, Scale};
use serde::{Deserialize, Serialize};

use crate::error::{CaptionError, Result};

/// A blank line (possibly holding stray spaces) between two paragraphs.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("paragraph regex is valid"));

/// Measures the rendered width of a line of text, in pixels.
///
/// The caption core never renders anything itself; whoever draws the captions
/// supplies this.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Fixed advance per character. Used when no font file is at hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl MonospaceMeasure {
    /// Rough average advance of a proportional sans font at `font_size` px.
    pub fn for_font_size(font_size: f64) -> Self {
        Self {
            advance: font_size * 0.55,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

/// Width from real TrueType metrics.
pub struct FontMeasure {
    font: Font<'static>,
    scale: Scale,
}

impl FontMeasure {
    pub fn from_bytes(bytes: Vec<u8>, font_size: f32) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self {
            font,
            scale: Scale::uniform(font_size),
        })
    }

    pub fn from_file(path: &Path, font_size: f32) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        Self::from_bytes(bytes, font_size)
            .with_context(|| format!("{} is not a usable TrueType font", path.display()))
    }
}

impl TextMeasure for FontMeasure {
    fn width(&self, text: &str) -> f64 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0) as f64
    }
}

/// How narration text is laid out on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Maximum rendered line width in pixels.
    pub max_width: f64,

    /// Wrapped lines grouped onto one page.
    pub lines_per_page: usize,

    /// Start a new page at every blank-line paragraph break.
    pub break_on_paragraphs: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            // 80% of a 1080px wide vertical frame
            max_width: 864.0,
            lines_per_page: 2,
            break_on_paragraphs: true,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> Result<()> {
        if !self.max_width.is_finite() || self.max_width <= 0.0 {
            return Err(CaptionError::InvalidMaxWidth(self.max_width));
        }
        if self.lines_per_page == 0 {
            return Err(CaptionError::ZeroLinesPerPage);
        }
        Ok(())
    }
}

/// Number of whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Greedily fill lines word by word while they still fit `max_width`.
///
/// A word that is wider than `max_width` on its own gets a line to itself.
pub fn wrap_lines<M>(text: &str, max_width: f64, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split narration into page texts, each holding up to `lines_per_page`
/// wrapped lines joined by `\n`.
///
/// Blank input still yields one page (holding the input as-is) so that a
/// timeline always has something to show.
pub fn split_pages<M>(text: &str, layout: &PageLayout, measure: &M) -> Result<Vec<String>>
where
    M: TextMeasure + ?Sized,
{
    layout.validate()?;

    if text.trim().is_empty() {
        return Ok(vec![text.to_string()]);
    }

    let paragraphs: Vec<&str> = if layout.break_on_paragraphs {
        PARAGRAPH_BREAK.split(text).collect()
    } else {
        vec![text]
    };

    let mut pages = Vec::new();
    for paragraph in paragraphs {
        let lines = wrap_lines(paragraph, layout.max_width, measure);
        for group in lines.chunks(layout.lines_per_page) {
            pages.push(group.join("\n"));
        }
    }
    Ok(pages)
}
