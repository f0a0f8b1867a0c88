use factshorts::layout::{wrap_lines, MonospaceMeasure, PageLayout, TextMeasure};
use factshorts::timing::{
    resolve_anchors, LeadConfig, Reconciler, TimingMark, TimingSource, DURATION_FLOOR,
};
use factshorts::Segmenter;
use proptest::prelude::*;

const MEASURE: MonospaceMeasure = MonospaceMeasure { advance: 10.0 };

fn narration() -> impl Strategy<Value = String> {
    prop::collection::vec(
        ("[A-Za-z0-9',.?!]{1,14}", prop::sample::select(vec![" ", " ", " ", "\n", "\n\n"])),
        0..40,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(word, sep)| format!("{word}{sep}"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn pages_tile_the_audio(
        text in narration(),
        max_width in 40.0f64..400.0,
        lines_per_page in 1usize..4,
        audio in 2.5f64..120.0,
    ) {
        let layout = PageLayout { max_width, lines_per_page, break_on_paragraphs: true };
        let timeline = Segmenter::new(layout).segment(&text, audio, None, &MEASURE).unwrap();

        prop_assert!(!timeline.pages.is_empty());
        prop_assert!((timeline.total_duration() - audio).abs() <= 0.01);
        prop_assert_eq!(timeline.pages[0].start, 0.0);
        for pair in timeline.pages.windows(2) {
            prop_assert!((pair[0].end() - pair[1].start).abs() < 1e-9);
        }
        for page in &timeline.pages {
            prop_assert!(page.duration >= DURATION_FLOOR);
        }
    }

    #[test]
    fn pages_keep_every_word_in_order(
        text in narration(),
        max_width in 40.0f64..400.0,
        lines_per_page in 1usize..4,
        break_on_paragraphs in any::<bool>(),
    ) {
        let layout = PageLayout { max_width, lines_per_page, break_on_paragraphs };
        let timeline = Segmenter::new(layout).segment(&text, 10.0, None, &MEASURE).unwrap();

        let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assert_eq!(timeline.plain_text(), expected);
        let words: usize = timeline.pages.iter().map(|p| p.word_count).sum();
        prop_assert_eq!(words, text.split_whitespace().count());
    }

    #[test]
    fn wrapped_lines_fit_unless_single_word(
        text in narration(),
        max_width in 40.0f64..400.0,
    ) {
        for line in wrap_lines(&text, max_width, &MEASURE) {
            if line.split_whitespace().count() > 1 {
                prop_assert!(MEASURE.width(&line) <= max_width, "{:?} too wide", line);
            }
        }
    }

    #[test]
    fn pages_never_start_before_their_marks(
        pages in prop::collection::vec(
            (
                prop_oneof![1usize..5, 200usize..1000],
                prop_oneof![0.0f64..0.2, 0.5f64..3.0],
                any::<bool>(),
            ),
            1..12,
        ),
        lead_last in 0.0f64..0.5,
    ) {
        let word_counts: Vec<usize> = pages.iter().map(|p| p.0).collect();
        let mut marks = Vec::new();
        let mut t = 0.0;
        for (i, (_, gap, marked)) in pages.iter().enumerate() {
            if *marked {
                marks.push((i, t));
            }
            t += gap;
        }
        let audio = t;
        prop_assume!(audio > 0.0);
        let source = TimingSource::pages(
            marks
                .iter()
                .map(|&(index, time_secs)| TimingMark { index, time_secs })
                .collect(),
        );

        let anchors = resolve_anchors(&source, &word_counts, audio);
        let reconciler = Reconciler::default();
        let durations = reconciler.reconcile(&word_counts, &anchors, audio);
        let lead = LeadConfig { first: 0.0, last: lead_last };
        let n = durations.len();

        // every page fits at the floor, behind every mark it must not precede
        let mut fits = n as f64 * reconciler.floor <= audio;
        let mut start = 0.0;
        for (i, duration) in durations.iter().enumerate() {
            prop_assert!(*duration >= reconciler.floor - 1e-9);
            if let Some(anchor) = anchors[i] {
                if i > 0 {
                    prop_assert!(
                        start >= anchor - reconciler.tolerance - 1e-9,
                        "page {} at {} before mark {}", i, start, anchor
                    );
                    fits &= anchor + (n - i) as f64 * reconciler.floor <= audio;
                }
                let visible = (start - lead.lead_for(i, n)).max(0.0);
                prop_assert!(visible >= anchor - lead_last - reconciler.tolerance - 1e-9);
            }
            start += duration;
        }
        if fits {
            prop_assert!((start - audio).abs() <= 0.01, "{:?} cover {} of {}", durations, start, audio);
        }
    }
}
