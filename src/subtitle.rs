use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::segment::Timeline;

/// SRT entries for a timeline, one per page, using lead-adjusted windows.
pub fn build_srt_entries(timeline: &Timeline) -> Vec<(f64, f64, String)> {
    timeline
        .display_windows()
        .into_iter()
        .zip(&timeline.pages)
        .map(|((start, end), page)| (start, end, page.text.clone()))
        .collect()
}

pub fn to_srt(entries: &[(f64, f64, String)]) -> String {
    let mut out = String::new();
    for (i, (start, end, text)) in entries.iter().enumerate() {
        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(*start),
            format_srt_time(*end)
        ));
        for line in text.lines() {
            out.push_str(line.trim());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn write_srt(path: &Path, timeline: &Timeline) -> anyhow::Result<()> {
    let entries = build_srt_entries(timeline);
    let mut f = File::create(path)?;
    f.write_all(to_srt(&entries).as_bytes())?;
    info!("Wrote {} subtitle entries to {}", entries.len(), path.display());
    Ok(())
}

/// The full timeline as JSON, for renderers that composite their own text.
pub fn write_timeline_json(path: &Path, timeline: &Timeline) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(timeline)?;
    std::fs::write(path, data)?;
    info!("Wrote caption timeline to {}", path.display());
    Ok(())
}

fn format_srt_time(seconds: f64) -> String {
    let t = Duration::from_millis((seconds.max(0.0) * 1000.0).round() as u64);
    let secs = t.as_secs();
    format!(
        "{:02}:{:02}:{:02},{:03}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        t.subsec_millis()
    )
}
