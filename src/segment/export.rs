use crate::error::{Result, ShortsError};
use crate::media::{BurnIn, CutRequest, SegmentCutter};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::Window;

/// One window to render, with its subtitle artifact already on disk.
#[derive(Debug, Clone)]
pub struct SegmentJob {
    pub index: usize,
    pub window: Window,
    pub output: PathBuf,
    pub subtitles: BurnIn,
}

/// Result of cutting a single segment.
#[derive(Debug)]
struct CutResult {
    index: usize,
    error: Option<String>,
    duration_ms: u64,
}

/// Statistics from the export process.
#[derive(Debug, Clone)]
pub struct ExportStats {
    pub total_segments: usize,
    pub total_time: Duration,
    pub avg_segment_time: Duration,
}

/// Runs segment cuts concurrently through a [`SegmentCutter`].
pub struct SegmentExporter {
    cutter: Arc<dyn SegmentCutter>,
    concurrency: usize,
    show_progress: bool,
    cancelled: Arc<AtomicBool>,
}

impl SegmentExporter {
    /// Create a new exporter with the given cutter.
    pub fn new(cutter: Arc<dyn SegmentCutter>, concurrency: usize) -> Self {
        Self {
            cutter,
            concurrency: concurrency.max(1),
            show_progress: true,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enable or disable progress bar display.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Share a cancellation flag; jobs not yet started are skipped once it is set.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Cut every job from `input`. Fails if any segment fails.
    pub async fn export(&self, input: &Path, jobs: &[SegmentJob]) -> Result<ExportStats> {
        let total_segments = jobs.len();
        let start_time = Instant::now();

        info!(
            "Cutting {} segments with {} concurrent jobs using {}",
            total_segments,
            self.concurrency,
            self.cutter.name()
        );

        let progress_bar = if self.show_progress && total_segments > 0 {
            let pb = ProgressBar::new(total_segments as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut futures = FuturesUnordered::new();

        for job in jobs {
            let sem = semaphore.clone();
            let cutter = self.cutter.clone();
            let cancelled = self.cancelled.clone();
            let pb = progress_bar.clone();

            futures.push(async move {
                let segment_start = Instant::now();
                let index = job.index;

                let result = match sem.acquire().await {
                    Ok(_permit) if cancelled.load(Ordering::Relaxed) => Err(ShortsError::Cancelled),
                    Ok(_permit) => {
                        debug!(
                            "Cutting segment {}: {:.3}s..{:.3}s",
                            index, job.window.start, job.window.end
                        );
                        cutter
                            .cut(CutRequest {
                                input,
                                start: job.window.start,
                                end: job.window.end,
                                output: &job.output,
                                subtitles: &job.subtitles,
                            })
                            .await
                    }
                    Err(e) => Err(ShortsError::Media(format!("Job queue closed: {e}"))),
                };
                let duration_ms = segment_start.elapsed().as_millis() as u64;

                if let Some(ref pb) = pb {
                    pb.inc(1);
                }

                match result {
                    Ok(()) => {
                        debug!("Segment {} completed in {}ms", index, duration_ms);
                        CutResult {
                            index,
                            error: None,
                            duration_ms,
                        }
                    }
                    Err(e) => {
                        warn!("Segment {} failed: {}", index, e);
                        CutResult {
                            index,
                            error: Some(e.to_string()),
                            duration_ms,
                        }
                    }
                }
            });
        }

        let mut results: Vec<CutResult> = Vec::with_capacity(total_segments);
        while let Some(result) = futures.next().await {
            results.push(result);
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Segments complete");
        }

        if self.cancelled.load(Ordering::Relaxed) {
            return Err(ShortsError::Cancelled);
        }

        results.sort_by_key(|r| r.index);

        let failures: Vec<String> = results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| format!("segment {}: {}", r.index, e)))
            .collect();
        if !failures.is_empty() {
            return Err(ShortsError::Media(format!(
                "{} of {} segments failed. Errors: {}",
                failures.len(),
                total_segments,
                failures.join("; ")
            )));
        }

        let total_time = start_time.elapsed();
        let total_segment_ms: u64 = results.iter().map(|r| r.duration_ms).sum();
        let avg_segment_time = if results.is_empty() {
            Duration::ZERO
        } else {
            Duration::from_millis(total_segment_ms / results.len() as u64)
        };

        info!(
            "Cut {} segments in {:.2}s (avg {:.2}s/segment)",
            total_segments,
            total_time.as_secs_f64(),
            avg_segment_time.as_secs_f64()
        );

        Ok(ExportStats {
            total_segments,
            total_time,
            avg_segment_time,
        })
    }
}
