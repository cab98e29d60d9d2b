use super::Cue;

/// Project cues onto the window `[start, end]`.
///
/// Each cue is clipped to the window and dropped when nothing positive is left.
/// With `retime_to_zero` the clipped bounds are shifted so the window starts at
/// zero and rounded to milliseconds; a cue that rounds to zero length is
/// dropped too. Order and indices are preserved.
pub fn slice_cues(cues: &[Cue], start: f64, end: f64, retime_to_zero: bool) -> Vec<Cue> {
    cues.iter()
        .filter_map(|cue| {
            let clipped_start = cue.start.max(start);
            let clipped_end = cue.end.min(end);
            if clipped_end - clipped_start <= 0.0 {
                return None;
            }

            let (s, e) = if retime_to_zero {
                (round_millis(clipped_start - start), round_millis(clipped_end - start))
            } else {
                (clipped_start, clipped_end)
            };
            if e <= s {
                return None;
            }

            Some(Cue {
                index: cue.index,
                start: s,
                end: e,
                text: cue.text.clone(),
            })
        })
        .collect()
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
