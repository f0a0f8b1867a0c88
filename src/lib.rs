//! Caption pages for narrated short videos: split narration into screen-sized
//! pages, time them against the voice, and hand them to a renderer.

pub mod audio;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod render;
pub mod seen;
pub mod segment;
pub mod subtitle;
pub mod timing;
pub mod tts;

pub use error::{CaptionError, Result};
pub use layout::{MonospaceMeasure, PageLayout, TextMeasure};
pub use segment::{build_timeline, Page, Segmenter, Timeline};
pub use timing::{LeadConfig, MarkUnit, Reconciler, TimingMark, TimingSource};
