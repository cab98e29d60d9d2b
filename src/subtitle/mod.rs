pub mod ass;
pub mod slice;
pub mod srt;
pub mod timecode;

pub use ass::{render_header, render_karaoke, render_line, KaraokeFormatter, KaraokeStyle, KaraokeWord};
pub use slice::slice_cues;
pub use srt::{format_srt, parse_srt, SrtFormatter};
pub use timecode::{format_ass_timestamp, format_timestamp, parse_timestamp};

use crate::config::SubtitleStyle;

/// Where a cue's display index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueIndex {
    /// Taken from the index line of the source block.
    Explicit(u32),
    /// Supplied by the parser because the block had no index line.
    Synthesized(u32),
}

impl CueIndex {
    pub fn value(&self) -> u32 {
        match self {
            CueIndex::Explicit(n) | CueIndex::Synthesized(n) => *n,
        }
    }
}

/// A single timed transcript utterance. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub index: CueIndex,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

pub trait SubtitleFormatter {
    fn format(&self, cues: &[Cue]) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(style: SubtitleStyle) -> Box<dyn SubtitleFormatter> {
    match style {
        SubtitleStyle::Srt => Box::new(SrtFormatter),
        SubtitleStyle::Karaoke => Box::new(KaraokeFormatter::default()),
    }
}
