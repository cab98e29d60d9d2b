// SRT subtitle format
use super::timecode::{format_timestamp, parse_timestamp};
use super::{Cue, CueIndex, SubtitleFormatter};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("Invalid regex"));
static TIME_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-->\s+").expect("Invalid regex"));

pub struct SrtFormatter;

impl SubtitleFormatter for SrtFormatter {
    fn format(&self, cues: &[Cue]) -> String {
        format_srt(cues)
    }

    fn extension(&self) -> &'static str {
        "srt"
    }
}

/// Parse SRT text into cues.
///
/// Blocks that are too short or carry an unparseable time range are skipped;
/// this never fails.
pub fn parse_srt(text: &str) -> Vec<Cue> {
    let normalized = text.replace('\r', "");
    let mut cues = Vec::new();
    let mut next_synthesized = 1u32;

    for block in BLOCK_SEPARATOR.split(&normalized) {
        let lines: Vec<&str> = block.split('\n').filter(|l| !l.is_empty()).collect();
        if lines.len() < 2 {
            continue;
        }

        let (index, rest) = match explicit_index(lines[0]) {
            Some(n) => (CueIndex::Explicit(n), &lines[1..]),
            None => {
                let n = next_synthesized;
                next_synthesized += 1;
                (CueIndex::Synthesized(n), &lines[..])
            }
        };

        let Some((time_line, body)) = rest.split_first() else {
            continue;
        };

        match parse_time_range(time_line) {
            Some((start, end)) => cues.push(Cue {
                index,
                start,
                end,
                text: body.join("\n"),
            }),
            None => debug!("Skipping SRT block with bad time range: {:?}", time_line),
        }
    }

    cues
}

/// Serialize cues as SRT, renumbering from 1.
pub fn format_srt(cues: &[Cue]) -> String {
    cues.iter()
        .enumerate()
        .map(|(i, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_timestamp(cue.start),
                format_timestamp(cue.end),
                cue.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn explicit_index(line: &str) -> Option<u32> {
    if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
        line.parse().ok()
    } else {
        None
    }
}

fn parse_time_range(line: &str) -> Option<(f64, f64)> {
    let mut parts = TIME_ARROW.split(line);
    let start = parse_timestamp(parts.next()?).ok()?;
    let end = parse_timestamp(parts.next()?).ok()?;
    Some((start, end))
}
