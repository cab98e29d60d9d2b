use tracing::debug;

use crate::config::validate_lengths;
use crate::error::{Result, ShortsError};
use crate::subtitle::Cue;

use super::Window;

/// Trailing remainder shorter than this is dropped instead of becoming a segment.
pub const TAIL_TOLERANCE: f64 = 0.25;

/// Length bounds for planned segments, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanConfig {
    /// Length at which a segment may be closed on a phrase boundary.
    pub target: f64,
    /// Hard ceiling; longer spans are cut here even mid-phrase.
    pub max: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            target: 60.0,
            max: 75.0,
        }
    }
}

impl PlanConfig {
    pub fn new(target: f64, max: f64) -> Result<Self> {
        validate_lengths(target, max)?;
        Ok(Self { target, max })
    }
}

/// Plan segment windows over `[0, total_duration]`.
///
/// With no cues the timeline is cut into fixed `target`-length pieces.
/// Otherwise segments close on cue ends once they reach `target`, and are
/// force-cut at `max` when a cue pushes them past it.
pub fn plan_segments(cues: &[Cue], total_duration: f64, config: &PlanConfig) -> Result<Vec<Window>> {
    validate_lengths(config.target, config.max)?;
    if !total_duration.is_finite() || total_duration < 0.0 {
        return Err(ShortsError::Config(format!(
            "Total duration must be a non-negative number of seconds, got {total_duration}"
        )));
    }

    let windows = if cues.is_empty() {
        plan_fixed_windows(total_duration, config.target)
    } else {
        plan_cue_windows(cues, total_duration, config)
    };

    debug!(
        "Planned {} windows over {:.3}s (target {}s, max {}s)",
        windows.len(),
        total_duration,
        config.target,
        config.max
    );

    Ok(windows)
}

/// Fixed-length windows when no transcript is available.
fn plan_fixed_windows(total_duration: f64, target: f64) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut current = 0.0;

    while current < total_duration - TAIL_TOLERANCE {
        let end = (current + target).min(total_duration);
        windows.push(Window {
            start: current,
            end,
        });
        current = end;
    }

    windows
}

fn plan_cue_windows(cues: &[Cue], total_duration: f64, config: &PlanConfig) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut seg_start = 0.0;

    for cue in cues {
        if cue.end > total_duration {
            debug!(
                "Cue ends at {:.3}s past media duration {:.3}s, stopping",
                cue.end, total_duration
            );
            break;
        }

        let cur_end = cue.end;
        let seg_dur = cur_end - seg_start;

        if seg_dur < config.target {
            continue;
        }

        if seg_dur > config.max {
            // The rest of this cue carries over into the next window.
            let forced_end = seg_start + config.max;
            windows.push(Window {
                start: seg_start,
                end: forced_end,
            });
            seg_start = forced_end;
        } else {
            windows.push(Window {
                start: seg_start,
                end: cur_end,
            });
            seg_start = cur_end;
        }
    }

    if seg_start < total_duration - TAIL_TOLERANCE {
        windows.push(Window {
            start: seg_start,
            end: total_duration,
        });
    }

    windows
}
