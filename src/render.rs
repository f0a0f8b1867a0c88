//! Final video assembly through ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Libass lays out SRT captions on a canvas this tall, then scales.
const SUBTITLE_PLAY_RES_Y: f64 = 288.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Caption font size in output pixels.
    pub font_size_px: f64,
    /// TrueType font used to measure caption lines.
    pub font: Option<PathBuf>,
    pub outline: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            font_size_px: 70.0,
            font: None,
            outline: 3,
        }
    }
}

impl RenderConfig {
    /// Font size as the subtitles filter expects it.
    pub fn subtitle_font_size(&self) -> f64 {
        self.font_size_px * SUBTITLE_PLAY_RES_Y / self.height.max(1) as f64
    }
}

/// Inputs for one video.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub background: &'a Path,
    pub audio: &'a Path,
    pub subtitles: &'a Path,
    pub out: &'a Path,
    /// Length of the output in seconds.
    pub duration: f64,
}

const STILL_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

pub fn is_still_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| STILL_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// Arguments for an ffmpeg run that puts the captions over the background
/// and lays the narration under it, both starting at zero.
pub fn ffmpeg_args(job: &RenderJob<'_>, config: &RenderConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".to_string()];

    if is_still_image(job.background) {
        args.extend(["-loop", "1"].map(String::from));
        args.extend(["-framerate".to_string(), config.fps.to_string()]);
    } else {
        args.extend(["-stream_loop", "-1"].map(String::from));
    }
    args.extend(["-i".to_string(), job.background.display().to_string()]);
    args.extend(["-i".to_string(), job.audio.display().to_string()]);

    let filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},\
         subtitles={subs}:force_style='Fontsize={fs:.1},OutlineColour=&H000000&,Outline={ol},Shadow=0'",
        w = config.width,
        h = config.height,
        subs = escape_filter_path(job.subtitles),
        fs = config.subtitle_font_size(),
        ol = config.outline,
    );
    args.extend(["-vf".to_string(), filter]);

    args.extend(
        [
            "-map", "0:v:0", "-map", "1:a:0", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a",
            "aac",
        ]
        .map(String::from),
    );
    args.extend(["-r".to_string(), config.fps.to_string()]);
    args.extend(["-t".to_string(), format!("{:.3}", job.duration)]);
    args.push(job.out.display().to_string());
    args
}

/// ffmpeg filter arguments treat `:` and `'` as syntax.
fn escape_filter_path(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

pub fn render(job: &RenderJob<'_>, config: &RenderConfig) -> anyhow::Result<()> {
    if !job.background.exists() {
        anyhow::bail!("Background not found: {}", job.background.display());
    }
    info!(
        "Merging audio and subtitles into final video {} ({:.2}s)",
        job.out.display(),
        job.duration
    );
    let status = Command::new("ffmpeg")
        .args(ffmpeg_args(job, config))
        .status()?;
    if !status.success() {
        error!("ffmpeg failed to produce final video");
        anyhow::bail!("ffmpeg failed to produce final video");
    }
    info!("Final video written to {}", job.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job<'a>(background: &'a Path) -> RenderJob<'a> {
        RenderJob {
            background,
            audio: Path::new("rs_tmp/combined.wav"),
            subtitles: Path::new("rs_tmp/subs.srt"),
            out: Path::new("out.mp4"),
            duration: 6.0,
        }
    }

    #[test]
    fn test_still_background_is_looped() {
        let args = ffmpeg_args(&job(Path::new("bg.JPG")), &RenderConfig::default());
        assert_eq!(&args[..5], ["-y", "-loop", "1", "-framerate", "30"]);
        assert!(args.windows(2).any(|w| w == ["-t", "6.000"]));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_video_background() {
        let args = ffmpeg_args(&job(Path::new("res/bg.mp4")), &RenderConfig::default());
        assert_eq!(&args[..3], ["-y", "-stream_loop", "-1"]);
        let vf = &args[args.iter().position(|a| a == "-vf").unwrap() + 1];
        assert!(vf.starts_with("scale=1080:1920:"));
        assert!(vf.contains("subtitles=rs_tmp/subs.srt:force_style='Fontsize=10.5,"));
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new("C:/subs.srt")), "C\\:/subs.srt");
    }
}
