use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TtsBackend {
    /// Local Piper voice, one WAV per caption page.
    Piper,
    /// HTTP endpoint taking SSML with page marks.
    Http,
    /// Use `--audio` (and optionally `--marks`) as given.
    None,
}

#[derive(Parser, Debug)]
#[clap(about = "Narrated fact shorts with captions that follow the voice")]
#[clap(group(ArgGroup::new("narration").required(true).args(["text", "text_file"])))]
pub struct Args {
    /// Narration text.
    #[clap(long)]
    pub text: Option<String>,

    /// File holding the narration text.
    #[clap(long)]
    pub text_file: Option<PathBuf>,

    /// Still image or video shown behind the captions. Without it only
    /// subtitles and the timeline are written.
    #[clap(long)]
    pub background: Option<PathBuf>,

    #[clap(long, default_value = "out.mp4")]
    pub out: PathBuf,

    #[clap(long, value_enum, default_value_t = TtsBackend::Piper)]
    pub tts: TtsBackend,

    #[clap(long, default_value = "./tts/en_US-hfc_male-medium.onnx")]
    pub piper_model: String,

    #[clap(long)]
    pub tts_endpoint: Option<String>,

    #[clap(long, default_value = "en-US-Neural2-A")]
    pub voice: String,

    /// Existing narration audio (with `--tts none`).
    #[clap(long)]
    pub audio: Option<PathBuf>,

    /// JSON timing marks for `--audio`.
    #[clap(long)]
    pub marks: Option<PathBuf>,

    /// JSON configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// TrueType font used to measure caption lines.
    #[clap(long)]
    pub font: Option<PathBuf>,

    #[clap(long)]
    pub font_size: Option<f64>,

    #[clap(long)]
    pub max_width: Option<f64>,

    #[clap(long)]
    pub lines_per_page: Option<usize>,

    #[clap(long)]
    pub lead_first: Option<f64>,

    #[clap(long)]
    pub lead_last: Option<f64>,

    #[clap(long)]
    pub work_dir: Option<PathBuf>,

    #[clap(long)]
    pub seen_db: Option<PathBuf>,

    /// Render even if this narration was rendered before.
    #[clap(long)]
    pub allow_repeat: bool,

    #[clap(long)]
    pub log_json: bool,
}
