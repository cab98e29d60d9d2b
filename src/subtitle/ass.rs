// ASS karaoke subtitle format
use super::timecode::format_ass_timestamp;
use super::{Cue, SubtitleFormatter};

/// Name of the single style every karaoke event uses.
const STYLE_NAME: &str = "TikTok";

/// Shortest cue duration used when spreading time across words (seconds).
const MIN_CUE_DURATION: f64 = 0.01;

/// Presentation parameters for the karaoke script.
#[derive(Debug, Clone, PartialEq)]
pub struct KaraokeStyle {
    pub play_res_x: u32,
    pub play_res_y: u32,
    pub font: String,
    pub font_size: u32,
}

impl Default for KaraokeStyle {
    fn default() -> Self {
        Self {
            play_res_x: 1080,
            play_res_y: 1920,
            font: "Inter".to_string(),
            font_size: 62,
        }
    }
}

impl KaraokeStyle {
    /// Style used for rendered shorts: vertical canvas, slightly larger type.
    pub fn vertical() -> Self {
        Self {
            font_size: 64,
            ..Self::default()
        }
    }
}

/// One word of a karaoke line with its highlight duration.
#[derive(Debug, Clone, PartialEq)]
pub struct KaraokeWord {
    pub text: String,
    pub duration_cs: u32,
}

#[derive(Default)]
pub struct KaraokeFormatter {
    pub style: KaraokeStyle,
}

impl SubtitleFormatter for KaraokeFormatter {
    fn format(&self, cues: &[Cue]) -> String {
        render_karaoke(cues, &self.style)
    }

    fn extension(&self) -> &'static str {
        "ass"
    }
}

/// Script header: canvas, the fixed style, and the events format line.
pub fn render_header(style: &KaraokeStyle) -> String {
    format!(
        "[Script Info]
ScriptType: v4.00+
PlayResX: {x}
PlayResY: {y}
ScaledBorderAndShadow: yes

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: {name},{font},{size},&H00FFFFFF,&H0000FFFF,&H00101010,&H60000000,0,0,0,0,100,100,0,0,1,4,0,2,40,40,100,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
",
        x = style.play_res_x,
        y = style.play_res_y,
        name = STYLE_NAME,
        font = style.font,
        size = style.font_size,
    )
}

/// Build one `Dialogue:` event with a `\k` tag before every word.
pub fn render_line(start: f64, end: f64, words: &[KaraokeWord]) -> String {
    let text = words
        .iter()
        .map(|w| format!("{{\\k{}}}{}", w.duration_cs.max(1), escape_braces(&w.text)))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        format_ass_timestamp(start),
        format_ass_timestamp(end),
        STYLE_NAME,
        text
    )
}

/// Render a full karaoke script, spreading each cue's time evenly across its words.
pub fn render_karaoke(cues: &[Cue], style: &KaraokeStyle) -> String {
    let mut out = render_header(style);
    for cue in cues {
        out.push_str(&render_line(cue.start, cue.end, &split_words(cue)));
        out.push('\n');
    }
    out
}

/// Uniform word timing; there is no acoustic alignment behind it.
fn split_words(cue: &Cue) -> Vec<KaraokeWord> {
    let duration = cue.duration().max(MIN_CUE_DURATION);
    let words: Vec<&str> = cue.text.split_whitespace().collect();
    let per_word = ((duration * 100.0) / words.len().max(1) as f64).round().max(1.0) as u32;

    words
        .into_iter()
        .map(|w| KaraokeWord {
            text: w.to_string(),
            duration_cs: per_word,
        })
        .collect()
}

fn escape_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '{' || c == '}' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
