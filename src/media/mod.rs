pub mod cut;
pub mod extract;

pub use cut::{build_cut_args, build_video_filter, escape_filter_path, FfmpegCutter};
pub use extract::{check_ffmpeg, check_ffprobe, extract_audio, get_media_duration};

use crate::config::Background;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Encoding options for a rendered short.
#[derive(Debug, Clone)]
pub struct CutOptions {
    /// Lay the source out on a 1080x1920 canvas.
    pub vertical: bool,
    pub background: Background,
    pub fps: u32,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            vertical: true,
            background: Background::default(),
            fps: 30,
        }
    }
}

/// Subtitle file to burn into a cut. ASS takes priority over SRT.
#[derive(Debug, Clone, PartialEq)]
pub enum BurnIn {
    None,
    Srt(PathBuf),
    Ass(PathBuf),
}

/// One cut request: source range in seconds and where to write the clip.
#[derive(Debug, Clone)]
pub struct CutRequest<'a> {
    pub input: &'a Path,
    pub start: f64,
    pub end: f64,
    pub output: &'a Path,
    pub subtitles: &'a BurnIn,
}

/// Renders one source range into a standalone media file.
#[async_trait]
pub trait SegmentCutter: Send + Sync {
    async fn cut(&self, request: CutRequest<'_>) -> Result<()>;
    fn name(&self) -> &'static str;
}
