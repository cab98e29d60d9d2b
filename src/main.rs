use anyhow::{Context, Result};
use autoshorts::config::{Background, Config, SubtitleStyle};
use autoshorts::media::CutOptions;
use autoshorts::segment::PlanConfig;
use autoshorts::subtitle::KaraokeStyle;
use autoshorts::{generate_shorts, print_summary, PipelineConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "autoshorts")]
#[command(version, about = "Cut long videos into vertical shorts with subtitles")]
#[command(long_about = "Split a video into phrase-aligned short segments, re-time its subtitles per segment, and render vertical clips with plain or karaoke captions.")]
struct Cli {
    /// Input video file
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./out")]
    out: PathBuf,

    /// Target segment length in seconds
    #[arg(long)]
    chunk: Option<f64>,

    /// Maximum segment length in seconds
    #[arg(long)]
    max_chunk: Option<f64>,

    /// Description or hashtags stored in the manifest
    #[arg(long)]
    caption: Option<String>,

    /// Subtitle style to burn in: srt, tiktok
    #[arg(short, long)]
    style: Option<String>,

    /// Keep the source aspect ratio instead of a 1080x1920 canvas
    #[arg(long)]
    no_vertical: bool,

    /// Background for the vertical layout: black, blur
    #[arg(long, default_value = "black")]
    bg: String,

    /// Output frame rate
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Number of segments encoded at once
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Language hint for automatic transcription (e.g., en, ru)
    #[arg(short, long)]
    language: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(language) = cli.language.clone() {
        config.asr_language = Some(language);
    }
    if let Some(target) = cli.chunk {
        config.chunk_target = target;
    }
    if let Some(max) = cli.max_chunk {
        config.chunk_max = max;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    let style: SubtitleStyle = match cli.style.as_deref() {
        Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_style,
    };
    let background: Background = cli.bg.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let pipeline_config = PipelineConfig {
        plan: PlanConfig::new(config.chunk_target, config.chunk_max)?,
        style,
        karaoke: KaraokeStyle::vertical(),
        cut: CutOptions {
            vertical: !cli.no_vertical,
            background,
            fps: cli.fps,
        },
        caption: cli.caption.clone(),
        concurrency: config.concurrency,
        show_progress: true,
    };

    info!("Input:    {}", cli.input.display());
    info!("Output:   {}", cli.out.display());
    info!("Style:    {}", style);
    info!(
        "Segments: target {}s, max {}s",
        config.chunk_target, config.chunk_max
    );

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
        warn!("Interrupt received, finishing current segments (press Ctrl+C again to abort)");
    })
    .context("Failed to install Ctrl+C handler")?;

    let result = generate_shorts(&cli.input, &cli.out, &config, pipeline_config, cancelled)
        .await
        .context("Shorts generation failed")?;

    print_summary(&result);
    Ok(())
}
