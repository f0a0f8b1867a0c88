//! Narration text in, timed caption pages out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CaptionError, Result};
use crate::layout::{split_pages, word_count, PageLayout, TextMeasure};
use crate::timing::{resolve_anchors, LeadConfig, Reconciler, TimingSource};

/// One screen of caption text and its display window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Wrapped lines joined by `\n`.
    pub text: String,
    pub word_count: usize,
    /// Seconds from narration start.
    pub start: f64,
    pub duration: f64,
    /// How far ahead of `start` the page may already be shown.
    #[serde(default)]
    pub lead: f64,
}

impl Page {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn visible_start(&self) -> f64 {
        (self.start - self.lead).max(0.0)
    }
}

/// What the renderer receives for each page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip<'a> {
    pub text: &'a str,
    pub start: f64,
    pub duration: f64,
}

/// Ordered caption pages for one narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub audio_duration: f64,
    pub pages: Vec<Page>,
}

impl Timeline {
    pub fn total_duration(&self) -> f64 {
        self.pages.iter().map(|p| p.duration).sum()
    }

    /// Length of the finished video: the audio, or the captions if they
    /// could not be squeezed into it.
    pub fn video_duration(&self) -> f64 {
        self.audio_duration.max(self.total_duration())
    }

    pub fn clips(&self) -> impl Iterator<Item = Clip<'_>> {
        self.pages.iter().map(|p| Clip {
            text: &p.text,
            start: p.start,
            duration: p.duration,
        })
    }

    /// When each page is actually on screen once lead is applied.
    ///
    /// A page leaving early for its successor's lead keeps windows from
    /// overlapping.
    pub fn display_windows(&self) -> Vec<(f64, f64)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let end = match self.pages.get(i + 1) {
                    Some(next) => next.visible_start().max(page.visible_start()),
                    None => page.end(),
                };
                (page.visible_start(), end)
            })
            .collect()
    }

    /// All words of every page joined by single spaces.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|p| p.text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds caption timelines for a fixed layout and timing policy.
///
/// Holds no state between calls and can be shared across threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Segmenter {
    pub layout: PageLayout,
    pub reconciler: Reconciler,
    pub lead: LeadConfig,
}

impl Segmenter {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_lead(mut self, lead: LeadConfig) -> Self {
        self.lead = lead;
        self
    }

    pub fn with_reconciler(mut self, reconciler: Reconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub fn segment<M>(
        &self,
        text: &str,
        audio_duration: f64,
        timing: Option<&TimingSource>,
        measure: &M,
    ) -> Result<Timeline>
    where
        M: TextMeasure + ?Sized,
    {
        if !audio_duration.is_finite() || audio_duration <= 0.0 {
            return Err(CaptionError::InvalidAudioDuration(audio_duration));
        }
        self.reconciler.validate()?;
        self.lead.validate()?;

        let texts = split_pages(text, &self.layout, measure)?;
        let word_counts: Vec<usize> = texts.iter().map(|t| word_count(t)).collect();

        let anchors = match timing {
            Some(source) if !source.is_empty() => {
                resolve_anchors(source, &word_counts, audio_duration)
            }
            _ => vec![None; texts.len()],
        };
        let durations = self
            .reconciler
            .reconcile(&word_counts, &anchors, audio_duration);

        let count = texts.len();
        let mut start = 0.0;
        let mut pages = Vec::with_capacity(count);
        for (i, ((text, word_count), duration)) in
            texts.into_iter().zip(word_counts).zip(durations).enumerate()
        {
            let lead = self.lead.lead_for(i, count);
            debug!(page = i, start, duration, lead, words = word_count, "caption page");
            pages.push(Page {
                text,
                word_count,
                start,
                duration,
                lead,
            });
            start += duration;
        }

        info!(
            pages = pages.len(),
            audio_duration,
            anchored = anchors.iter().filter(|a| a.is_some()).count(),
            "built caption timeline"
        );
        Ok(Timeline {
            audio_duration,
            pages,
        })
    }
}

/// One-shot form of [`Segmenter::segment`].
pub fn build_timeline<M>(
    text: &str,
    audio_duration: f64,
    layout: &PageLayout,
    timing: Option<&TimingSource>,
    measure: &M,
) -> Result<Timeline>
where
    M: TextMeasure + ?Sized,
{
    Segmenter::new(layout.clone()).segment(text, audio_duration, timing, measure)
}
