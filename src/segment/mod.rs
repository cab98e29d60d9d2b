pub mod export;
pub mod plan;

pub use export::{ExportStats, SegmentExporter, SegmentJob};
pub use plan::{plan_segments, PlanConfig, TAIL_TOLERANCE};

use serde::Serialize;

/// A planned time range of the source that becomes one short. Seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    /// Get the duration of this window.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// File stem shared by every artifact of the window at `index`.
pub fn segment_stem(index: usize) -> String {
    format!("seg_{:03}", index)
}
