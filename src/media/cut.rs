use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Background;
use crate::error::{Result, ShortsError};

use super::{BurnIn, CutOptions, CutRequest, SegmentCutter};

const CANVAS_WIDTH: u32 = 1080;
const CANVAS_HEIGHT: u32 = 1920;

/// Cuts segments by spawning `ffmpeg`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegCutter {
    options: CutOptions,
}

impl FfmpegCutter {
    pub fn new(options: CutOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl SegmentCutter for FfmpegCutter {
    async fn cut(&self, request: CutRequest<'_>) -> Result<()> {
        let args = build_cut_args(&request, &self.options);
        debug!(
            "ffmpeg {}",
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = tokio::process::Command::new("ffmpeg")
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ShortsError::Media(format!("Failed to run FFmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(5)..].join("\n");
            return Err(ShortsError::Media(format!(
                "FFmpeg failed to cut {}: {tail}",
                request.output.display()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// Escape a path for use inside an ffmpeg filter argument.
pub fn escape_filter_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '\\' | ':' | ',' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the `-vf` graph: vertical layout first, subtitles last.
pub fn build_video_filter(options: &CutOptions, subtitles: &BurnIn) -> Option<String> {
    let mut filters: Vec<String> = Vec::new();

    if options.vertical {
        let (w, h) = (CANVAS_WIDTH, CANVAS_HEIGHT);
        match options.background {
            Background::Blur => filters.push(
                [
                    "split=2[fg][bg]".to_string(),
                    format!("[bg]scale={w}:{h},boxblur=20:1[bg]"),
                    format!("[fg]scale={w}:-2:force_original_aspect_ratio=decrease[fg]"),
                    "[bg][fg]overlay=(W-w)/2:(H-h)/2".to_string(),
                ]
                .join(";"),
            ),
            Background::Black => filters.push(format!(
                "scale={w}:-2:force_original_aspect_ratio=decrease,pad={w}:{h}:({w}-iw)/2:({h}-ih)/2:color=black"
            )),
        }
    }

    match subtitles {
        BurnIn::Ass(path) => filters.push(format!(
            "ass={}",
            escape_filter_path(&path.to_string_lossy())
        )),
        BurnIn::Srt(path) => filters.push(format!(
            "subtitles={}",
            escape_filter_path(&path.to_string_lossy())
        )),
        BurnIn::None => {}
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters.join(","))
    }
}

/// Full ffmpeg argument list for one cut.
///
/// Seeking happens after `-i` so audio is not lost on some MP4 sources.
pub fn build_cut_args(request: &CutRequest<'_>, options: &CutOptions) -> Vec<OsString> {
    let duration = (request.end - request.start).max(0.0);
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), request.input.into()];

    args.extend(
        [
            "-ss".to_string(),
            format!("{:.3}", request.start),
            "-t".to_string(),
            format!("{:.3}", duration),
        ]
        .map(OsString::from),
    );

    if let Some(vf) = build_video_filter(options, request.subtitles) {
        args.push("-vf".into());
        args.push(vf.into());
    }

    let fps = options.fps.to_string();
    args.extend(
        [
            "-map", "0:v:0", "-map", "0:a?", "-pix_fmt", "yuv420p", "-c:v", "libx264",
            "-preset", "medium", "-crf", "18", "-r", fps.as_str(), "-c:a", "aac", "-b:a", "192k", "-ac",
            "2", "-ar", "48000", "-movflags", "+faststart", "-shortest",
        ]
        .map(OsString::from),
    );
    args.push(request.output.into());

    args
}
