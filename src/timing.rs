//! Caption timing: word-proportional estimates, timing marks from speech
//! synthesis or alignment, and reconciliation of the two.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CaptionError, Result};

/// No page is ever shorter than this, in seconds.
pub const DURATION_FLOOR: f64 = 0.05;

/// A page may start this much before its mark without being corrected.
pub const EARLY_TOLERANCE: f64 = 0.03;

/// Upper bound for any lead value.
pub const MAX_LEAD: f64 = 0.5;

const EPSILON: f64 = 1e-9;

/// A provisional display window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start: f64,
    pub duration: f64,
}

/// What a mark's `index` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkUnit {
    /// Index of a page, e.g. an SSML `<mark>` placed before each page.
    #[default]
    Page,
    /// Index of a word in the whole narration, e.g. word-level timestamps.
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingMark {
    pub index: usize,
    #[serde(alias = "timeSeconds")]
    pub time_secs: f64,
}

/// Authoritative timestamps for narrated audio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSource {
    #[serde(default)]
    pub unit: MarkUnit,
    pub marks: Vec<TimingMark>,
}

impl TimingSource {
    pub fn pages(marks: Vec<TimingMark>) -> Self {
        Self {
            unit: MarkUnit::Page,
            marks,
        }
    }

    pub fn words(marks: Vec<TimingMark>) -> Self {
        Self {
            unit: MarkUnit::Word,
            marks,
        }
    }

    /// Page marks from a list of page start times, in page order.
    pub fn from_page_starts(starts: impl IntoIterator<Item = f64>) -> Self {
        Self::pages(
            starts
                .into_iter()
                .enumerate()
                .map(|(index, time_secs)| TimingMark { index, time_secs })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Assign every page a window proportional to its word count.
///
/// Windows tile `0..audio_duration` exactly. With no words at all the
/// duration is shared evenly, which for a single page means it gets all of it.
pub fn nominal_timeline(word_counts: &[usize], audio_duration: f64) -> Vec<Slot> {
    let n = word_counts.len();
    if n == 0 {
        return Vec::new();
    }

    let total_words: usize = word_counts.iter().sum();
    let starts: Vec<f64> = if total_words == 0 {
        (0..n)
            .map(|i| audio_duration * i as f64 / n as f64)
            .collect()
    } else {
        let mut words_before = 0usize;
        word_counts
            .iter()
            .map(|&w| {
                let start = audio_duration * words_before as f64 / total_words as f64;
                words_before += w;
                start
            })
            .collect()
    };

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(audio_duration);
            Slot {
                start,
                duration: end - start,
            }
        })
        .collect()
}

/// Turn timing marks into one optional start time per page.
///
/// Unusable marks are dropped with a warning rather than failing: a page
/// without an anchor simply falls back to word-count timing.
pub fn resolve_anchors(
    source: &TimingSource,
    word_counts: &[usize],
    audio_duration: f64,
) -> Vec<Option<f64>> {
    let pages = word_counts.len();
    let mut anchors: Vec<Option<f64>> = vec![None; pages];

    match source.unit {
        MarkUnit::Page => {
            if source.marks.len() != pages {
                warn!(
                    marks = source.marks.len(),
                    pages, "timing mark count does not match page count"
                );
            }
            for mark in &source.marks {
                if !mark_time_usable(mark, audio_duration) {
                    continue;
                }
                match anchors.get_mut(mark.index) {
                    None => warn!(index = mark.index, pages, "page mark out of range ignored"),
                    Some(anchor) if anchor.is_some() => {
                        warn!(index = mark.index, "duplicate page mark ignored")
                    }
                    Some(anchor) => *anchor = Some(mark.time_secs),
                }
            }
        }
        MarkUnit::Word => {
            let total_words: usize = word_counts.iter().sum();
            if source.marks.len() != total_words {
                warn!(
                    marks = source.marks.len(),
                    words = total_words,
                    "timing mark count does not match word count"
                );
            }
            let mut word_times: Vec<Option<f64>> = vec![None; total_words];
            for mark in &source.marks {
                if !mark_time_usable(mark, audio_duration) {
                    continue;
                }
                match word_times.get_mut(mark.index) {
                    None => {
                        warn!(index = mark.index, words = total_words, "word mark out of range ignored")
                    }
                    Some(time) if time.is_some() => {
                        warn!(index = mark.index, "duplicate word mark ignored")
                    }
                    Some(time) => *time = Some(mark.time_secs),
                }
            }
            let mut first = 0usize;
            for (anchor, &w) in anchors.iter_mut().zip(word_counts) {
                *anchor = first_word_time(&word_times, first, first + w);
                first += w;
            }
        }
    }

    let mut latest = f64::NEG_INFINITY;
    for (page, anchor) in anchors.iter_mut().enumerate() {
        if let Some(t) = *anchor {
            if t < latest {
                warn!(page, time = t, previous = latest, "non-monotonic mark ignored");
                *anchor = None;
            } else {
                latest = t;
            }
        }
    }

    anchors
}

/// When the first word of `first..end` was spoken.
///
/// Without a mark of its own, the time is interpolated by word index between
/// the closest marked word before the page (or the start of the audio) and
/// the first marked word inside it. A page with no marked word gets `None`.
fn first_word_time(word_times: &[Option<f64>], first: usize, end: usize) -> Option<f64> {
    if first >= end {
        return None;
    }
    if let Some(t) = word_times[first] {
        return Some(t);
    }
    let (next, t_next) = (first + 1..end).find_map(|i| word_times[i].map(|t| (i, t)))?;
    let (prev, t_prev) = word_times[..first]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, t)| t.map(|t| (i, t)))
        .unwrap_or((0, 0.0));
    let rate = (t_next - t_prev) / (next - prev) as f64;
    let estimate = t_prev + rate * (first - prev) as f64;
    debug!(word = first, estimate, "first word of page has no mark; interpolated");
    Some(estimate)
}

fn mark_time_usable(mark: &TimingMark, audio_duration: f64) -> bool {
    let t = mark.time_secs;
    let usable = t.is_finite() && t >= 0.0 && t < audio_duration;
    if !usable {
        warn!(index = mark.index, time = t, audio_duration, "timing mark outside audio ignored");
    }
    usable
}

/// Reconciles word-count timing against authoritative marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reconciler {
    /// Minimum page duration in seconds.
    pub floor: f64,
    /// How early a page may start relative to its mark before it is delayed.
    pub tolerance: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            floor: DURATION_FLOOR,
            tolerance: EARLY_TOLERANCE,
        }
    }
}

impl Reconciler {
    pub fn validate(&self) -> Result<()> {
        if !self.floor.is_finite() || self.floor <= 0.0 {
            return Err(CaptionError::InvalidDurationFloor(self.floor));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CaptionError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Final per-page durations. Pages tile the timeline from zero, so page
    /// starts are the running sums of these.
    pub fn reconcile(
        &self,
        word_counts: &[usize],
        anchors: &[Option<f64>],
        audio_duration: f64,
    ) -> Vec<f64> {
        if word_counts.is_empty() {
            return Vec::new();
        }

        let mut durations = self.base_durations(word_counts, anchors, audio_duration);
        self.correct_early_pages(&mut durations, anchors);
        self.settle_total(&mut durations, audio_duration);

        // Spreading an overshoot across predecessors can pull a page ahead of
        // its mark again. Fix it once more and take the difference back from
        // pages whose shortening moves no mark.
        if self.correct_early_pages(&mut durations, anchors) > 0 {
            self.fit_to_audio(&mut durations, anchors, audio_duration);
        }

        for d in durations.iter_mut() {
            if !(*d >= self.floor) {
                *d = self.floor;
            }
        }
        durations
    }

    /// Word-count timing, anchored wherever a mark exists.
    ///
    /// Page 0 is pinned to zero and the last page ends at `audio_duration`.
    /// Every run of pages between two anchors shares that run's span by word
    /// count, so with no anchors this is exactly [`nominal_timeline`] and with
    /// every page anchored each page runs from its mark to the next one.
    pub fn base_durations(
        &self,
        word_counts: &[usize],
        anchors: &[Option<f64>],
        audio_duration: f64,
    ) -> Vec<f64> {
        let n = word_counts.len();
        let mut breaks: Vec<(usize, f64)> = vec![(0, 0.0)];
        for (i, anchor) in anchors.iter().enumerate().take(n).skip(1) {
            if let Some(t) = anchor {
                breaks.push((i, *t));
            }
        }
        breaks.push((n, audio_duration));

        let mut durations = Vec::with_capacity(n);
        for pair in breaks.windows(2) {
            let (from, t0) = pair[0];
            let (to, t1) = pair[1];
            let span = (t1 - t0).max(0.0);
            durations.extend(
                nominal_timeline(&word_counts[from..to], span)
                    .into_iter()
                    .map(|slot| slot.duration.max(self.floor)),
            );
        }
        durations
    }

    /// Delay any page scheduled before its mark by stretching its
    /// predecessor. Returns how many pages were moved.
    pub fn correct_early_pages(&self, durations: &mut [f64], anchors: &[Option<f64>]) -> usize {
        let mut corrected = 0;
        let Some(&first) = durations.first() else {
            return 0;
        };
        let mut video_start = first;
        for i in 1..durations.len() {
            if let Some(Some(anchor)) = anchors.get(i) {
                let lag = anchor - video_start;
                if lag > self.tolerance {
                    debug!(page = i, lag, "page scheduled before its mark; delaying");
                    durations[i - 1] += lag;
                    video_start += lag;
                    corrected += 1;
                }
            }
            video_start += durations[i];
        }
        corrected
    }

    /// Make durations add up to `audio_duration`.
    fn settle_total(&self, durations: &mut [f64], audio_duration: f64) {
        let last = durations.len() - 1;
        let total: f64 = durations.iter().sum();

        if total < audio_duration {
            durations[last] += audio_duration - total;
            return;
        }

        let excess = total - audio_duration;
        if excess <= EPSILON {
            return;
        }

        let slack = self.slack(&durations[..last]);
        if slack >= excess {
            self.shave(&mut durations[..last], excess, slack);
            return;
        }

        let from_last = excess.min((durations[last] - self.floor).max(0.0));
        durations[last] -= from_last;
        let remaining = excess - from_last;
        if remaining > EPSILON && slack > 0.0 {
            self.shave(&mut durations[..last], remaining.min(slack), slack);
        }
        if remaining - slack > EPSILON {
            warn!(
                overshoot = remaining - slack,
                floor = self.floor,
                "audio too short to give every page the minimum duration"
            );
        }
    }

    /// Remove what still overshoots the audio without starting any anchored
    /// page before its mark.
    ///
    /// Pages from the last anchor on go first, the final page after them.
    /// Shortening an earlier run pulls every later page forward, so each run
    /// only gives up as much as the tightest anchor after it can move.
    fn fit_to_audio(&self, durations: &mut [f64], anchors: &[Option<f64>], audio_duration: f64) {
        let n = durations.len();
        let last = n - 1;
        let mut excess = durations.iter().sum::<f64>() - audio_duration;
        if excess <= EPSILON {
            return;
        }

        let anchored: Vec<(usize, f64)> = anchors
            .iter()
            .enumerate()
            .take(n)
            .skip(1)
            .filter_map(|(i, &anchor)| anchor.map(|t| (i, t)))
            .collect();
        let tail = anchored.last().map_or(0, |&(i, _)| i);
        excess -= self.take(&mut durations[tail..last], excess);
        excess -= self.take(&mut durations[last..], excess);

        let starts: Vec<f64> = durations
            .iter()
            .scan(0.0, |acc, &d| {
                let start = *acc;
                *acc += d;
                Some(start)
            })
            .collect();
        let mut headroom = f64::INFINITY;
        for (k, &(page, mark)) in anchored.iter().enumerate().rev() {
            if excess <= EPSILON {
                break;
            }
            headroom = headroom.min((starts[page] - mark).max(0.0));
            let from = if k == 0 { 0 } else { anchored[k - 1].0 };
            let taken = self.take(&mut durations[from..page], excess.min(headroom));
            excess -= taken;
            headroom -= taken;
        }

        if excess > EPSILON {
            warn!(overshoot = excess, "captions run past the end of the audio");
        }
    }

    /// Remove up to `amount` from `durations` without going below the floor.
    /// Returns how much was removed.
    fn take(&self, durations: &mut [f64], amount: f64) -> f64 {
        let slack = self.slack(durations);
        let amount = amount.min(slack);
        if amount <= 0.0 {
            return 0.0;
        }
        self.shave(durations, amount, slack);
        amount
    }

    fn slack(&self, durations: &[f64]) -> f64 {
        durations.iter().map(|d| (d - self.floor).max(0.0)).sum()
    }

    /// Remove `amount` from `durations`, proportionally to each one's slack.
    fn shave(&self, durations: &mut [f64], amount: f64, slack: f64) {
        for d in durations.iter_mut() {
            let share = (*d - self.floor).max(0.0) / slack;
            *d -= amount * share;
        }
    }
}

/// Lets captions appear slightly ahead of their audio.
///
/// The lead ramps linearly from `first` on the first page to `last` on the
/// last. It only moves when a page becomes visible, never its duration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadConfig {
    pub first: f64,
    pub last: f64,
}

impl LeadConfig {
    pub fn validate(&self) -> Result<()> {
        for value in [self.first, self.last] {
            if !(0.0..=MAX_LEAD).contains(&value) {
                return Err(CaptionError::LeadOutOfRange {
                    value,
                    max: MAX_LEAD,
                });
            }
        }
        Ok(())
    }

    pub fn lead_for(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.last;
        }
        let t = index as f64 / (count - 1) as f64;
        self.first + (self.last - self.first) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    fn sum(d: &[f64]) -> f64 {
        d.iter().sum()
    }

    #[test]
    fn test_nominal_proportional() {
        let slots = nominal_timeline(&[6, 4], 6.0);
        assert_close(slots[0].start, 0.0);
        assert_close(slots[0].duration, 3.6);
        assert_close(slots[1].start, 3.6);
        assert_close(slots[1].duration, 2.4);
    }

    #[test]
    fn test_nominal_zero_words() {
        let slots = nominal_timeline(&[0], 4.0);
        assert_eq!(slots, vec![Slot { start: 0.0, duration: 4.0 }]);
        assert!(nominal_timeline(&[], 4.0).is_empty());
    }

    #[test]
    fn test_page_anchors() {
        let source = TimingSource::from_page_starts([0.0, 2.0, 5.0]);
        let anchors = resolve_anchors(&source, &[3, 3, 3], 8.0);
        assert_eq!(anchors, vec![Some(0.0), Some(2.0), Some(5.0)]);
    }

    #[test]
    fn test_page_anchor_mismatch_degrades() {
        // too few, out of range, beyond audio, duplicate
        let source = TimingSource::pages(vec![
            TimingMark { index: 1, time_secs: 2.0 },
            TimingMark { index: 1, time_secs: 2.5 },
            TimingMark { index: 7, time_secs: 3.0 },
            TimingMark { index: 2, time_secs: 99.0 },
        ]);
        let anchors = resolve_anchors(&source, &[3, 3, 3], 8.0);
        assert_eq!(anchors, vec![None, Some(2.0), None]);
    }

    #[test]
    fn test_non_monotonic_anchor_dropped() {
        let source = TimingSource::from_page_starts([0.0, 4.0, 3.0, 6.0]);
        let anchors = resolve_anchors(&source, &[1, 1, 1, 1], 8.0);
        assert_eq!(anchors, vec![Some(0.0), Some(4.0), None, Some(6.0)]);
    }

    #[test]
    fn test_word_anchors_use_first_word_of_page() {
        let marks = (0..6)
            .map(|i| TimingMark {
                index: i,
                time_secs: i as f64 * 0.5,
            })
            .collect();
        let anchors = resolve_anchors(&TimingSource::words(marks), &[2, 3, 1], 4.0);
        assert_eq!(anchors, vec![Some(0.0), Some(1.0), Some(2.5)]);
    }

    #[test]
    fn test_word_anchors_missing_first_word() {
        let marks = vec![
            TimingMark { index: 0, time_secs: 0.1 },
            TimingMark { index: 3, time_secs: 1.7 },
        ];
        let anchors = resolve_anchors(&TimingSource::words(marks), &[2, 3], 4.0);
        // word 2 sits two thirds of the way from word 0 to word 3
        assert_eq!(anchors[0], Some(0.1));
        assert_close(anchors[1].unwrap(), 0.1 + 1.6 * 2.0 / 3.0);
    }

    #[test]
    fn test_word_anchors_interpolate_from_audio_start() {
        // nothing marked before page 1, so the rate is taken from zero
        let marks = vec![
            TimingMark { index: 4, time_secs: 2.0 },
            TimingMark { index: 5, time_secs: 2.4 },
        ];
        let anchors = resolve_anchors(&TimingSource::words(marks), &[2, 4], 4.0);
        assert_eq!(anchors[0], None);
        assert_close(anchors[1].unwrap(), 1.0);
    }

    #[test]
    fn test_word_anchors_unmarked_page_has_none() {
        let marks = vec![
            TimingMark { index: 0, time_secs: 0.0 },
            TimingMark { index: 5, time_secs: 3.0 },
        ];
        let anchors = resolve_anchors(&TimingSource::words(marks), &[2, 3, 1], 4.0);
        assert_eq!(anchors, vec![Some(0.0), None, Some(3.0)]);
    }

    #[test]
    fn test_reconcile_without_anchors_is_nominal() {
        let r = Reconciler::default();
        let d = r.reconcile(&[6, 4], &[None, None], 6.0);
        assert_close(d[0], 3.6);
        assert_close(d[1], 2.4);
    }

    #[test]
    fn test_reconcile_all_anchored_uses_marks() {
        let r = Reconciler::default();
        let d = r.reconcile(&[1, 1, 1], &[Some(0.2), Some(1.0), Some(4.0)], 5.0);
        assert_close(d[0], 1.0);
        assert_close(d[1], 3.0);
        assert_close(d[2], 1.0);
    }

    #[test]
    fn test_reconcile_partial_anchors_fill_by_words() {
        let r = Reconciler::default();
        // page 2 anchored at 6.0; pages 0 and 1 share 0..6 as 1:2
        let d = r.reconcile(&[1, 2, 1, 1], &[None, None, Some(6.0), None], 10.0);
        assert_close(d[0], 2.0);
        assert_close(d[1], 4.0);
        assert_close(d[2], 2.0);
        assert_close(d[3], 2.0);
    }

    #[test]
    fn test_correct_early_pages_extends_predecessor() {
        let r = Reconciler::default();
        let mut d = vec![1.0, 1.0, 1.0];
        let moved = r.correct_early_pages(&mut d, &[None, Some(1.5), Some(2.51)]);
        assert_eq!(moved, 1);
        assert_close(d[0], 1.5);
        // page 2 now starts at 2.5, within tolerance of its 2.51 mark
        assert_close(d[1], 1.0);
    }

    #[test]
    fn test_settle_shortfall_goes_to_last() {
        let r = Reconciler::default();
        let mut d = vec![1.0, 1.0];
        r.settle_total(&mut d, 3.0);
        assert_eq!(d, vec![1.0, 2.0]);
    }

    #[test]
    fn test_settle_overshoot_shaved_from_predecessors() {
        let r = Reconciler::default();
        let mut d = vec![2.05, 1.05, 1.0];
        r.settle_total(&mut d, 3.1);
        assert_close(sum(&d), 3.1);
        assert_close(d[0], 2.05 - 1.0 * 2.0 / 3.0);
        assert_close(d[1], 1.05 - 1.0 / 3.0);
        assert_close(d[2], 1.0);
    }

    #[test]
    fn test_settle_overshoot_falls_back_to_last() {
        let r = Reconciler::default();
        let mut d = vec![0.05, 0.06, 2.0];
        r.settle_total(&mut d, 1.0);
        assert_close(sum(&d), 1.0);
        assert_close(d[0], 0.05);
        assert!(d[1] >= DURATION_FLOOR);
    }

    #[test]
    fn test_floor_violation_keeps_every_page_visible() {
        let r = Reconciler::default();
        let d = r.reconcile(&[1, 1, 1, 1], &[None; 4], 0.1);
        assert!(d.iter().all(|&x| x >= DURATION_FLOOR));
        assert_close(sum(&d), 0.2);
    }

    #[test]
    fn test_overshoot_after_late_correction_keeps_coverage() {
        let r = Reconciler::default();
        let anchors = [None, Some(9.0), None, None];
        let d = r.reconcile(&[1, 1, 1000, 1], &anchors, 10.0);
        assert!((sum(&d) - 10.0).abs() <= 0.01, "{d:?}");
        assert!(d[0] >= 9.0 - r.tolerance);
        assert!(d.iter().all(|&x| x >= DURATION_FLOOR - 1e-9));
        assert_close(d[2], 0.9);
    }

    #[test]
    fn test_fit_to_audio_respects_marks() {
        let r = Reconciler::default();
        // page 2 sits 0.5s past its mark, so its predecessors may give up 0.5s
        let anchors = [None, None, Some(3.5), None];
        let mut d = vec![2.0, 2.0, 0.05, 0.05];
        r.fit_to_audio(&mut d, &anchors, 3.6);
        assert_close(sum(&d), 3.6);
        assert_close(d[0] + d[1], 3.5);
        assert_close(d[2], 0.05);
    }

    #[test]
    fn test_reconciler_validate() {
        assert!(Reconciler::default().validate().is_ok());
        let negative = Reconciler {
            floor: -1.0,
            ..Reconciler::default()
        };
        assert_eq!(negative.validate(), Err(CaptionError::InvalidDurationFloor(-1.0)));
        let zero = Reconciler {
            floor: 0.0,
            ..Reconciler::default()
        };
        assert!(zero.validate().is_err());
        let nan = Reconciler {
            floor: f64::NAN,
            ..Reconciler::default()
        };
        assert!(matches!(nan.validate(), Err(CaptionError::InvalidDurationFloor(_))));
        let early = Reconciler {
            tolerance: -0.01,
            ..Reconciler::default()
        };
        assert_eq!(early.validate(), Err(CaptionError::InvalidTolerance(-0.01)));
        let loose = Reconciler {
            tolerance: f64::INFINITY,
            ..Reconciler::default()
        };
        assert!(loose.validate().is_err());
    }

    #[test]
    fn test_lead_ramp() {
        let lead = LeadConfig {
            first: 0.1,
            last: 0.3,
        };
        assert_close(lead.lead_for(0, 3), 0.1);
        assert_close(lead.lead_for(1, 3), 0.2);
        assert_close(lead.lead_for(2, 3), 0.3);
        assert_close(lead.lead_for(0, 1), 0.3);
    }

    #[test]
    fn test_lead_bounds() {
        assert!(LeadConfig::default().validate().is_ok());
        let too_much = LeadConfig {
            first: 0.0,
            last: 0.75,
        };
        assert_eq!(
            too_much.validate(),
            Err(CaptionError::LeadOutOfRange {
                value: 0.75,
                max: MAX_LEAD
            })
        );
    }

    #[test]
    fn test_marks_deserialize_from_tts_names() {
        let json = r#"{"marks":[{"index":0,"timeSeconds":0.0},{"index":1,"time_secs":1.25}]}"#;
        let source: TimingSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.unit, MarkUnit::Page);
        assert_eq!(source.marks[1].time_secs, 1.25);
    }
}
