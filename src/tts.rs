//! Speech synthesis collaborators. Both produce one audio file for the whole
//! narration plus page-indexed timing marks.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::audio::wav_duration_seconds;
use crate::timing::{TimingMark, TimingSource};

/// Synthesized narration audio and where each page starts in it.
#[derive(Debug, Clone)]
pub struct Narration {
    pub audio_path: PathBuf,
    pub timing: TimingSource,
}

/// Local Piper voice, invoked once per page.
#[derive(Debug, Clone)]
pub struct PiperSynthesizer {
    pub model: String,
    pub work_dir: PathBuf,
}

impl PiperSynthesizer {
    pub fn new(model: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn synthesize_pages(&self, pages: &[String]) -> anyhow::Result<Narration> {
        fs::create_dir_all(&self.work_dir)?;

        let mut part_files = Vec::with_capacity(pages.len());
        let mut starts = Vec::with_capacity(pages.len());
        let mut offset = 0.0_f64;
        for (i, page) in pages.iter().enumerate() {
            let fname = self.work_dir.join(format!("part_{:03}.wav", i));
            let text = page.split_whitespace().collect::<Vec<_>>().join(" ");
            info!(
                "Generating TTS page {}/{} ({} chars)",
                i + 1,
                pages.len(),
                text.len()
            );
            debug!("Page text: {}", text);
            tts_generate_chunk(&self.model, &text, &fname)?;

            let dur = wav_duration_seconds(&fname)?;
            debug!("Page {} audio lasts {:.2} seconds", i, dur);
            starts.push(offset);
            offset += dur;
            part_files.push(fname);
        }

        let combined = self.work_dir.join("combined.wav");
        concat_wavs(&self.work_dir, &part_files, &combined)?;
        Ok(Narration {
            audio_path: combined,
            timing: TimingSource::from_page_starts(starts),
        })
    }
}

fn tts_generate_chunk(model: &str, text: &str, out_path: &Path) -> anyhow::Result<()> {
    let mut child = Command::new("piper")
        .args(["--model", model, "--output_file"])
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .context("failed to spawn piper process")?;

    {
        let stdin = child.stdin.as_mut().context("failed to open piper stdin")?;
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        error!("Piper TTS command failed for {}", out_path.display());
        anyhow::bail!("TTS engine failed for page, command returned non-zero");
    }
    Ok(())
}

fn write_concat_list(list_path: &Path, parts: &[PathBuf]) -> anyhow::Result<()> {
    let mut f = File::create(list_path)?;
    for p in parts {
        let fname = p
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid filename"))?;
        writeln!(f, "file '{}'", fname)?;
    }
    Ok(())
}

/// Join WAV parts living in `dir` with ffmpeg's concat demuxer.
fn concat_wavs(dir: &Path, parts: &[PathBuf], out: &Path) -> anyhow::Result<()> {
    let list = dir.join("files.txt");
    write_concat_list(&list, parts)?;
    info!("Concatenating {} WAV parts into {}", parts.len(), out.display());

    let status = Command::new("ffmpeg")
        .current_dir(dir)
        .args(["-y", "-f", "concat", "-safe", "0", "-i", "files.txt", "-c", "copy"])
        .arg(out.file_name().context("concat output has no file name")?)
        .status()?;

    if !status.success() {
        warn!("ffmpeg concat with copy failed; retrying with re-encode");
        let status2 = Command::new("ffmpeg")
            .current_dir(dir)
            .args([
                "-y", "-f", "concat", "-safe", "0", "-i", "files.txt", "-c:a", "pcm_s16le",
            ])
            .arg(out.file_name().context("concat output has no file name")?)
            .status()?;
        if !status2.success() {
            error!("ffmpeg failed to concatenate WAV files");
            anyhow::bail!("ffmpeg failed to concatenate WAV files");
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest<'a> {
    ssml: String,
    voice: &'a str,
    encoding: &'a str,
    enable_time_pointing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub audio_content: Option<String>,
    #[serde(default)]
    pub timepoints: Vec<Timepoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timepoint {
    pub mark_name: String,
    pub time_seconds: f64,
}

/// HTTP speech endpoint that takes SSML with `<mark>`s and reports when
/// each mark was reached.
#[derive(Debug, Clone)]
pub struct MarkedSpeechClient {
    pub endpoint: String,
    pub voice: String,
    pub encoding: String,
    client: reqwest::Client,
}

impl MarkedSpeechClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            voice: "en-US-Neural2-A".to_string(),
            encoding: "MP3".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn audio_extension(&self) -> &'static str {
        match self.encoding.to_ascii_uppercase().as_str() {
            "LINEAR16" => "wav",
            "OGG_OPUS" => "ogg",
            _ => "mp3",
        }
    }

    pub async fn synthesize_pages(
        &self,
        pages: &[String],
        out_path: &Path,
    ) -> anyhow::Result<Narration> {
        let body = SpeechRequest {
            ssml: build_ssml(pages),
            voice: &self.voice,
            encoding: &self.encoding,
            enable_time_pointing: true,
        };
        info!("Requesting speech for {} pages from {}", pages.len(), self.endpoint);

        let res = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            error!("TTS endpoint failed: {} {}", status, text);
            anyhow::bail!("TTS endpoint returned {}: {}", status, text);
        }

        let parsed: SpeechResponse =
            serde_json::from_str(&text).context("invalid JSON from TTS endpoint")?;
        decode_narration(parsed, out_path)
    }
}

fn decode_narration(response: SpeechResponse, out_path: &Path) -> anyhow::Result<Narration> {
    let audio = response
        .audio_content
        .filter(|a| !a.trim().is_empty())
        .context("no audio returned from TTS endpoint")?;
    let bytes = general_purpose::STANDARD
        .decode(audio.trim())
        .context("audioContent is not valid base64")?;
    fs::write(out_path, &bytes)?;
    info!("Wrote {} bytes of narration to {}", bytes.len(), out_path.display());

    Ok(Narration {
        audio_path: out_path.to_path_buf(),
        timing: marks_from_timepoints(&response.timepoints),
    })
}

/// SSML with a `pN` mark in front of page N (1-based).
pub fn build_ssml(pages: &[String]) -> String {
    let mut ssml = String::from("<speak>");
    for (i, page) in pages.iter().enumerate() {
        let text = page.split_whitespace().collect::<Vec<_>>().join(" ");
        ssml.push_str(&format!("<mark name=\"p{}\"/>{} ", i + 1, escape_xml(&text)));
    }
    ssml.push_str("</speak>");
    ssml
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn marks_from_timepoints(timepoints: &[Timepoint]) -> TimingSource {
    let marks = timepoints
        .iter()
        .filter_map(|tp| {
            let page = tp
                .mark_name
                .strip_prefix('p')
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n >= 1);
            match page {
                Some(n) => Some(TimingMark {
                    index: n - 1,
                    time_secs: tp.time_seconds,
                }),
                None => {
                    warn!("Ignoring unknown timepoint mark {:?}", tp.mark_name);
                    None
                }
            }
        })
        .collect();
    TimingSource::pages(marks)
}
