use std::path::Path;
use std::process::Command;

use anyhow::Context;
use hound::WavReader;
use tracing::debug;

/// Length of a WAV file from its header; `duration()` counts frames, not
/// samples, so the channel count drops out.
pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)
        .with_context(|| format!("failed to open WAV {}", path.display()))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        anyhow::bail!("WAV {} reports a zero sample rate", path.display());
    }
    Ok(f64::from(reader.duration()) / f64::from(sample_rate))
}

/// Duration of any audio file ffprobe understands.
pub fn probe_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .context("failed to run ffprobe")?;
    if !output.status.success() {
        anyhow::bail!(
            "ffprobe failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(stdout: &str) -> anyhow::Result<f64> {
    let value = stdout.trim();
    value
        .parse::<f64>()
        .with_context(|| format!("unexpected ffprobe duration output: {value:?}"))
}

/// WAV files are read directly; everything else goes through ffprobe.
pub fn audio_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    let duration = if is_wav {
        wav_duration_seconds(path)?
    } else {
        probe_duration_seconds(path)?
    };
    debug!("Audio {} lasts {:.2} seconds", path.display(), duration);
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_silence(path: &Path, seconds: f64, sample_rate: u32, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (seconds * sample_rate as f64).round() as usize;
        for _ in 0..frames * channels as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part_000.wav");
        write_silence(&path, 1.5, 16_000, 2);
        let duration = audio_duration_seconds(&path).unwrap();
        assert!((duration - 1.5).abs() < 1e-6);

        let mono = dir.path().join("part_001.wav");
        write_silence(&mono, 0.25, 22_050, 1);
        assert!((wav_duration_seconds(&mono).unwrap() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(parse_probe_output("12.345000\n").unwrap(), 12.345);
        assert!(parse_probe_output("N/A").is_err());
    }
}
