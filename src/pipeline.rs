use crate::config::{Config, SubtitleStyle};
use crate::error::{Result, ShortsError};
use crate::manifest::{relative_to, Manifest, ManifestSegment};
use crate::media::{
    check_ffmpeg, check_ffprobe, get_media_duration, BurnIn, CutOptions, FfmpegCutter,
    SegmentCutter,
};
use crate::segment::{
    plan_segments, segment_stem, ExportStats, PlanConfig, SegmentExporter, SegmentJob, Window,
};
use crate::subtitle::{format_srt, parse_srt, render_karaoke, slice_cues, Cue, KaraokeStyle};
use crate::transcribe::{resolve_transcript, Transcriber, TranscriptOrigin, WhisperClient};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

/// Configuration for one shorts generation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Segment length bounds.
    pub plan: PlanConfig,
    /// Subtitle style burned into each segment.
    pub style: SubtitleStyle,
    /// Karaoke script presentation, used when `style` is karaoke.
    pub karaoke: KaraokeStyle,
    /// Encoding and layout options for the cutter.
    pub cut: CutOptions,
    /// Free-form description recorded in the manifest.
    pub caption: Option<String>,
    /// Number of segments cut at the same time.
    pub concurrency: usize,
    /// Show progress bars.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            plan: PlanConfig::default(),
            style: SubtitleStyle::default(),
            karaoke: KaraokeStyle::vertical(),
            cut: CutOptions::default(),
            caption: None,
            concurrency: 2,
            show_progress: true,
        }
    }
}

/// Statistics from the shorts generation process.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total time taken for the entire pipeline.
    pub total_time: Duration,
    /// Time spent cutting segments.
    pub export_time: Duration,
    /// Source media duration in seconds.
    pub media_duration: f64,
    /// Number of cues parsed from the transcript.
    pub cue_count: usize,
    /// Number of segments produced.
    pub segment_count: usize,
    /// Human-readable transcript origin.
    pub transcript: String,
}

/// Result of the shorts generation pipeline.
#[derive(Debug)]
pub struct PipelineResult {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub stats: PipelineStats,
}

/// Per-window artifacts written before cutting.
#[derive(Debug, Clone)]
pub struct PreparedSegment {
    pub job: SegmentJob,
    pub srt_path: PathBuf,
    pub ass_path: Option<PathBuf>,
}

/// Output directory layout for a run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub segments: PathBuf,
    pub subtitles: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            segments: root.join("segments"),
            subtitles: root.join("subtitles"),
        }
    }

    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.segments)?;
        fs::create_dir_all(&self.subtitles)?;
        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }
}

/// Generate vertical shorts from a video.
///
/// This is the main entry point. It:
/// 1. Probes the source duration
/// 2. Finds or generates a transcript
/// 3. Plans segment windows on phrase boundaries
/// 4. Writes re-timed subtitles per segment
/// 5. Cuts and encodes every segment
/// 6. Writes the manifest
pub async fn generate_shorts(
    input: &Path,
    out_dir: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
    cancelled: Arc<AtomicBool>,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    if !input.exists() {
        return Err(ShortsError::FileNotFound(input.display().to_string()));
    }

    check_ffmpeg().map_err(|_| {
        ShortsError::Media(
            "FFmpeg not found. Install it with: brew install ffmpeg (macOS) or apt install ffmpeg (Linux)".to_string()
        )
    })?;
    check_ffprobe()?;

    info!("Stage 1/3: Probing {:?}", input);
    let duration = get_media_duration(input)?;
    info!("Source duration: {:.1}s", duration);

    check_cancelled(&cancelled)?;

    info!("Stage 2/3: Resolving transcript");
    let work_dir = TempDir::new()?;
    debug!("Using work directory: {:?}", work_dir.path());

    let whisper = config.openai_api_key.as_ref().map(|key| {
        let client = WhisperClient::new(key.clone());
        match &config.asr_language {
            Some(lang) => client.with_language(lang.clone()),
            None => client,
        }
    });
    let transcript = resolve_transcript(
        input,
        work_dir.path(),
        whisper.as_ref().map(|w| w as &dyn Transcriber),
    )
    .await?;

    check_cancelled(&cancelled)?;

    let (srt, origin) = match transcript {
        Some(t) => (Some(t.srt), describe_origin(&t.origin)),
        None => (None, "none (time-based cuts)".to_string()),
    };

    info!("Stage 3/3: Rendering segments");
    let cutter: Arc<dyn SegmentCutter> = Arc::new(FfmpegCutter::new(pipeline_config.cut.clone()));
    let mut result = render_shorts(
        input,
        out_dir,
        duration,
        srt.as_deref(),
        cutter,
        &pipeline_config,
        cancelled,
    )
    .await?;

    result.stats.transcript = origin;
    result.stats.total_time = start_time.elapsed();
    Ok(result)
}

/// Plan, write subtitles, cut, and write the manifest for a known duration and transcript.
///
/// Without a transcript (or with one that yields no cues) windows are cut by time only.
pub async fn render_shorts(
    input: &Path,
    out_dir: &Path,
    duration: f64,
    srt: Option<&str>,
    cutter: Arc<dyn SegmentCutter>,
    config: &PipelineConfig,
    cancelled: Arc<AtomicBool>,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    let cues = srt.map(parse_srt).unwrap_or_default();
    info!("Parsed {} cues", cues.len());

    let windows = plan_segments(&cues, duration, &config.plan)?;
    info!("Planned {} segments", windows.len());

    let layout = OutputLayout::new(out_dir);
    layout.create()?;

    let prepared = prepare_segments(&cues, &windows, &layout, config)?;

    check_cancelled(&cancelled)?;

    let jobs: Vec<SegmentJob> = prepared.iter().map(|p| p.job.clone()).collect();
    let exporter = SegmentExporter::new(cutter, config.concurrency)
        .with_progress(config.show_progress)
        .with_cancel_flag(cancelled.clone());
    let export_stats: ExportStats = exporter.export(input, &jobs).await?;

    let manifest = Manifest {
        source: input.to_path_buf(),
        duration,
        chunk_target: config.plan.target,
        chunk_max: config.plan.max,
        caption: config.caption.clone(),
        style: config.style,
        segments: prepared
            .iter()
            .map(|p| ManifestSegment {
                index: p.job.index,
                start: p.job.window.start,
                end: p.job.window.end,
                file: relative_to(&p.job.output, &layout.root),
                srt: relative_to(&p.srt_path, &layout.root),
                ass: p.ass_path.as_ref().map(|a| relative_to(a, &layout.root)),
            })
            .collect(),
    };

    let manifest_path = layout.manifest_path();
    manifest.write(&manifest_path)?;
    info!("Wrote manifest to {:?}", manifest_path);

    Ok(PipelineResult {
        output_dir: layout.root.clone(),
        manifest_path,
        stats: PipelineStats {
            total_time: start_time.elapsed(),
            export_time: export_stats.total_time,
            media_duration: duration,
            cue_count: cues.len(),
            segment_count: manifest.segments.len(),
            transcript: if srt.is_some() {
                "provided".to_string()
            } else {
                "none (time-based cuts)".to_string()
            },
        },
        manifest,
    })
}

/// Slice cues for every window and write its SRT (and ASS for karaoke).
pub fn prepare_segments(
    cues: &[Cue],
    windows: &[Window],
    layout: &OutputLayout,
    config: &PipelineConfig,
) -> Result<Vec<PreparedSegment>> {
    let mut prepared = Vec::with_capacity(windows.len());

    for (index, window) in windows.iter().enumerate() {
        let stem = segment_stem(index);
        let local_cues = slice_cues(cues, window.start, window.end, true);

        let srt_path = layout.subtitles.join(format!("{stem}.srt"));
        fs::write(&srt_path, format_srt(&local_cues))?;

        let ass_path = match config.style {
            SubtitleStyle::Karaoke => {
                let path = layout.subtitles.join(format!("{stem}.ass"));
                fs::write(&path, render_karaoke(&local_cues, &config.karaoke))?;
                Some(path)
            }
            SubtitleStyle::Srt => None,
        };

        let subtitles = if local_cues.is_empty() {
            BurnIn::None
        } else if let Some(ref ass) = ass_path {
            BurnIn::Ass(ass.clone())
        } else {
            BurnIn::Srt(srt_path.clone())
        };

        debug!(
            "Segment {}: {:.3}s..{:.3}s with {} cues",
            index,
            window.start,
            window.end,
            local_cues.len()
        );

        prepared.push(PreparedSegment {
            job: SegmentJob {
                index,
                window: *window,
                output: layout.segments.join(format!("{stem}.mp4")),
                subtitles,
            },
            srt_path,
            ass_path,
        });
    }

    Ok(prepared)
}

fn check_cancelled(cancelled: &AtomicBool) -> Result<()> {
    if cancelled.load(Ordering::Relaxed) {
        Err(ShortsError::Cancelled)
    } else {
        Ok(())
    }
}

fn describe_origin(origin: &TranscriptOrigin) -> String {
    match origin {
        TranscriptOrigin::Sidecar(path) => format!("sidecar {}", path.display()),
        TranscriptOrigin::Generated { provider, .. } => format!("generated by {provider}"),
    }
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    let rule = "═══════════════════════════════════════════════════════════════";
    println!();
    println!("{}", style(rule).cyan());
    println!("{}", style("                     Shorts Generation Complete").bold());
    println!("{}", style(rule).cyan());
    println!();
    println!("  Output:     {}", result.output_dir.display());
    println!("  Manifest:   {}", result.manifest_path.display());
    println!("  Segments:   {}", result.stats.segment_count);
    println!("  Cues:       {}", result.stats.cue_count);
    println!("  Transcript: {}", result.stats.transcript);
    println!("  Duration:   {:.1}s source", result.stats.media_duration);
    println!();
    for segment in &result.manifest.segments {
        println!(
            "    {} {:>8.2}s → {:>8.2}s  {}",
            style(format!("#{:03}", segment.index)).dim(),
            segment.start,
            segment.end,
            segment.file.display()
        );
    }
    println!();
    println!("  Timing:");
    println!(
        "    Cutting:     {:.2}s",
        result.stats.export_time.as_secs_f64()
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("{}", style(rule).cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::CueIndex;

    fn cue(start: f64, end: f64, text: &str) -> Cue {
        Cue {
            index: CueIndex::Explicit(1),
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.plan.target, 60.0);
        assert_eq!(config.plan.max, 75.0);
        assert_eq!(config.style, SubtitleStyle::Srt);
        assert_eq!(config.karaoke.font_size, 64);
        assert!(config.cut.vertical);
        assert!(config.show_progress);
    }

    #[test]
    fn test_prepare_segments_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.create().unwrap();

        let cues = vec![cue(1.0, 3.0, "first words"), cue(58.0, 63.0, "across the cut")];
        let windows = vec![
            Window { start: 0.0, end: 60.0 },
            Window { start: 60.0, end: 90.0 },
            Window { start: 90.0, end: 100.0 },
        ];
        let config = PipelineConfig {
            style: SubtitleStyle::Karaoke,
            ..Default::default()
        };

        let prepared = prepare_segments(&cues, &windows, &layout, &config).unwrap();
        assert_eq!(prepared.len(), 3);

        let second_srt = fs::read_to_string(&prepared[1].srt_path).unwrap();
        assert_eq!(
            second_srt,
            "1\n00:00:00,000 --> 00:00:03,000\nacross the cut\n"
        );
        let second_ass = fs::read_to_string(prepared[1].ass_path.as_ref().unwrap()).unwrap();
        assert!(second_ass.contains("Dialogue: 0,00:00:00.00,00:00:03.00,TikTok,,0,0,0,,{\\k100}across"));

        assert!(matches!(prepared[0].job.subtitles, BurnIn::Ass(_)));
        // No cues fall in the last window, so nothing is burned in.
        assert_eq!(prepared[2].job.subtitles, BurnIn::None);
        assert!(prepared[2].srt_path.exists());
        assert!(prepared[2].job.output.ends_with("segments/seg_002.mp4"));
    }

    #[test]
    fn test_prepare_segments_srt_style() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.create().unwrap();

        let prepared = prepare_segments(
            &[cue(0.0, 2.0, "hi")],
            &[Window { start: 0.0, end: 10.0 }],
            &layout,
            &PipelineConfig::default(),
        )
        .unwrap();

        assert!(prepared[0].ass_path.is_none());
        assert_eq!(
            prepared[0].job.subtitles,
            BurnIn::Srt(layout.subtitles.join("seg_000.srt"))
        );
    }

    #[test]
    fn test_prepare_segments_skips_burn_in_for_sliver_cue() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.create().unwrap();

        let prepared = prepare_segments(
            &[cue(9.0, 10.0004, "sliver")],
            &[Window { start: 0.0, end: 10.0 }, Window { start: 10.0, end: 20.0 }],
            &layout,
            &PipelineConfig::default(),
        )
        .unwrap();

        assert!(matches!(prepared[0].job.subtitles, BurnIn::Srt(_)));
        assert_eq!(prepared[1].job.subtitles, BurnIn::None);
        assert_eq!(fs::read_to_string(&prepared[1].srt_path).unwrap(), "");
    }

    #[test]
    fn test_check_cancelled() {
        assert!(check_cancelled(&AtomicBool::new(false)).is_ok());
        assert!(matches!(
            check_cancelled(&AtomicBool::new(true)),
            Err(ShortsError::Cancelled)
        ));
    }
}
