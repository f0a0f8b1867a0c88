mod args;

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};

use args::{Args, TtsBackend};
use factshorts::audio::audio_duration_seconds;
use factshorts::config::AppConfig;
use factshorts::layout::{split_pages, FontMeasure, MonospaceMeasure, TextMeasure};
use factshorts::logging::init_logging;
use factshorts::render::{render, RenderJob};
use factshorts::seen::{seen_key, JsonSeenStore, SeenStore};
use factshorts::subtitle::{write_srt, write_timeline_json};
use factshorts::timing::TimingSource;
use factshorts::tts::{MarkedSpeechClient, Narration, PiperSynthesizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);
    init_logging(&config.logging);

    info!("Starting fact short generation pipeline");

    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read narration {}", path.display()))?,
        (None, None) => anyhow::bail!("no narration given"),
    };
    info!("Narration (short preview): {:.200}", text.replace('\n', " "));

    if let Some(background) = &args.background {
        if !background.exists() {
            error!("Background not found: {}", background.display());
            anyhow::bail!("background not found: {}", background.display());
        }
        info!("Background found: {}", background.display());
    }

    let mut seen = JsonSeenStore::open(&config.paths.seen_db)?;
    let key = seen_key(&text);
    if seen.contains(&key) {
        if args.allow_repeat {
            warn!("Narration was rendered before; continuing because of --allow-repeat");
        } else {
            anyhow::bail!(
                "narration was already rendered (recorded in {})",
                config.paths.seen_db.display()
            );
        }
    }

    let measure = caption_measure(&config);
    let segmenter = config.segmenter();

    let work_dir = config.paths.work_dir.clone();
    // --audio may live in the work dir, so only clear it when we synthesize
    if work_dir.exists() && args.tts != TtsBackend::None {
        info!("Removing existing work dir '{}'", work_dir.display());
        fs::remove_dir_all(&work_dir)?;
    }
    fs::create_dir_all(&work_dir)?;

    let pages = split_pages(&text, &segmenter.layout, measure.as_ref())?;
    info!("Split narration into {} caption pages", pages.len());

    let narration = synthesize(&args, &pages, &work_dir).await?;
    let audio_duration = audio_duration_seconds(&narration.audio_path)?;
    info!("Narration audio lasts {:.2} seconds", audio_duration);

    let timeline = segmenter.segment(
        &text,
        audio_duration,
        Some(&narration.timing),
        measure.as_ref(),
    )?;
    for page in &timeline.pages {
        debug!(
            "{:>7.2}s +{:.2}s  {}",
            page.start,
            page.duration,
            page.text.replace('\n', " / ")
        );
    }

    let srt_path = work_dir.join("subs.srt");
    write_srt(&srt_path, &timeline)?;
    write_timeline_json(&work_dir.join("timeline.json"), &timeline)?;

    let Some(background) = &args.background else {
        info!("No background given; subtitles left in {}", work_dir.display());
        return Ok(());
    };

    render(
        &RenderJob {
            background,
            audio: &narration.audio_path,
            subtitles: &srt_path,
            out: &args.out,
            duration: timeline.video_duration(),
        },
        &config.render,
    )?;

    seen.record(&key)?;
    info!("Process complete.");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(font) = &args.font {
        config.render.font = Some(font.clone());
    }
    if let Some(size) = args.font_size {
        config.render.font_size_px = size;
    }
    if let Some(width) = args.max_width {
        config.layout.max_width = width;
    }
    if let Some(lines) = args.lines_per_page {
        config.layout.lines_per_page = lines;
    }
    if let Some(lead) = args.lead_first {
        config.lead.first = lead;
    }
    if let Some(lead) = args.lead_last {
        config.lead.last = lead;
    }
    if let Some(dir) = &args.work_dir {
        config.paths.work_dir = dir.clone();
    }
    if let Some(db) = &args.seen_db {
        config.paths.seen_db = db.clone();
    }
    if args.log_json {
        config.logging.json = true;
    }
}

/// Real font metrics when a font is configured and loads, otherwise an
/// average-advance estimate.
fn caption_measure(config: &AppConfig) -> Box<dyn TextMeasure> {
    let size = config.render.font_size_px;
    if let Some(font) = &config.render.font {
        match FontMeasure::from_file(font, size as f32) {
            Ok(measure) => return Box::new(measure),
            Err(e) => warn!("Falling back to estimated text widths: {:#}", e),
        }
    }
    Box::new(MonospaceMeasure::for_font_size(size))
}

async fn synthesize(args: &Args, pages: &[String], work_dir: &Path) -> anyhow::Result<Narration> {
    match args.tts {
        TtsBackend::Piper => {
            PiperSynthesizer::new(args.piper_model.clone(), work_dir).synthesize_pages(pages)
        }
        TtsBackend::Http => {
            let endpoint = args
                .tts_endpoint
                .clone()
                .context("--tts http needs --tts-endpoint")?;
            let client = MarkedSpeechClient::new(endpoint).with_voice(args.voice.clone());
            let out = work_dir.join(format!("narration.{}", client.audio_extension()));
            client.synthesize_pages(pages, &out).await
        }
        TtsBackend::None => {
            let audio = args.audio.clone().context("--tts none needs --audio")?;
            let timing = match &args.marks {
                Some(path) => {
                    let data = fs::read_to_string(path)
                        .with_context(|| format!("failed to read marks {}", path.display()))?;
                    serde_json::from_str::<TimingSource>(&data)
                        .with_context(|| format!("failed to parse marks {}", path.display()))?
                }
                None => TimingSource::default(),
            };
            Ok(Narration {
                audio_path: audio,
                timing,
            })
        }
    }
}
