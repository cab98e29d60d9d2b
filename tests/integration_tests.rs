//! Integration tests for autoshorts
//!
//! These tests exercise planning, slicing, and rendering together without
//! requiring ffmpeg or an API key.

use async_trait::async_trait;
use autoshorts::config::{Config, SubtitleStyle};
use autoshorts::manifest::Manifest;
use autoshorts::media::{BurnIn, CutRequest, SegmentCutter};
use autoshorts::segment::{plan_segments, PlanConfig, Window};
use autoshorts::subtitle::{
    create_formatter, format_srt, parse_srt, parse_timestamp, render_karaoke, slice_cues, Cue,
    CueIndex, KaraokeStyle,
};
use autoshorts::{render_shorts, PipelineConfig, ShortsError};

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

const SAMPLE_SRT: &str = "1
00:00:00,000 --> 00:00:04,000
Welcome back to the channel

2
00:00:04,500 --> 00:00:31,000
Today we talk about rivers

3
00:00:31,000 --> 00:00:58,000
and why they bend

4
00:00:58,000 --> 00:01:03,000
the way they do

5
00:01:03,000 --> 00:01:30,000
Thanks for watching
";

fn cue(start: f64, end: f64, text: &str) -> Cue {
    Cue {
        index: CueIndex::Explicit(1),
        start,
        end,
        text: text.to_string(),
    }
}

// ============================================================================
// Config Integration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.default_style, SubtitleStyle::Srt);
        assert_eq!(config.chunk_target, 60.0);
        assert_eq!(config.chunk_max, 75.0);
        assert_eq!(config.concurrency, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_inverted_lengths() {
        let config = Config {
            chunk_target: 80.0,
            chunk_max: 60.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ShortsError::Config(_))));
    }

    #[test]
    fn test_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
            default_style = "karaoke"
            chunk_target = 45.0
            "#,
        )
        .unwrap();
        assert_eq!(config.default_style, SubtitleStyle::Karaoke);
        assert_eq!(config.chunk_target, 45.0);
        // Unset fields keep their defaults.
        assert_eq!(config.chunk_max, 75.0);
    }
}

// ============================================================================
// Subtitle Formatter Tests
// ============================================================================

mod subtitle_formatter_tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_example() {
        assert_eq!(parse_timestamp("00:01:02,500").unwrap(), 62.5);
        assert!(parse_timestamp("1:02,500").is_err());
    }

    #[test]
    fn test_parse_sample_transcript() {
        let cues = parse_srt(SAMPLE_SRT);
        assert_eq!(cues.len(), 5);
        assert_eq!(cues[1].start, 4.5);
        assert_eq!(cues[3].end, 63.0);
        assert_eq!(cues[4].text, "Thanks for watching");
    }

    #[test]
    fn test_parse_then_format_keeps_content() {
        let cues = parse_srt(SAMPLE_SRT);
        let reparsed = parse_srt(&format_srt(&cues));
        assert_eq!(reparsed.len(), cues.len());
        for (a, b) in cues.iter().zip(&reparsed) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn test_create_formatter() {
        let cues = vec![cue(0.0, 1.5, "hello world")];

        let srt = create_formatter(SubtitleStyle::Srt);
        assert_eq!(srt.extension(), "srt");
        assert_eq!(srt.format(&cues), "1\n00:00:00,000 --> 00:00:01,500\nhello world\n");

        let ass = create_formatter(SubtitleStyle::Karaoke);
        assert_eq!(ass.extension(), "ass");
        let script = ass.format(&cues);
        assert!(script.starts_with("[Script Info]"));
        assert!(script.contains("{\\k75}hello {\\k75}world"));
    }

    #[test]
    fn test_karaoke_for_empty_window_is_header_only() {
        let script = render_karaoke(&[], &KaraokeStyle::vertical());
        assert!(script.contains("[Events]"));
        assert!(!script.contains("Dialogue:"));
    }
}

// ============================================================================
// Planner and Slicer Tests
// ============================================================================

mod planning_tests {
    use super::*;

    #[test]
    fn test_short_transcript_becomes_one_window() {
        let windows = plan_segments(
            &[cue(0.0, 5.0, "only")],
            10.0,
            &PlanConfig::new(6.0, 8.0).unwrap(),
        )
        .unwrap();
        assert_eq!(windows, vec![Window { start: 0.0, end: 10.0 }]);
    }

    #[test]
    fn test_sample_plan_covers_timeline() {
        let cues = parse_srt(SAMPLE_SRT);
        let windows = plan_segments(&cues, 95.0, &PlanConfig::default()).unwrap();

        assert_eq!(
            windows,
            vec![
                Window { start: 0.0, end: 63.0 },
                Window { start: 63.0, end: 95.0 },
            ]
        );
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_slice_across_boundary() {
        let sliced = slice_cues(&[cue(58.0, 63.0, "straddles")], 60.0, 120.0, true);
        assert_eq!(sliced.len(), 1);
        assert_eq!(sliced[0].start, 0.0);
        assert_eq!(sliced[0].end, 3.0);
    }

    #[test]
    fn test_slice_is_idempotent_without_retime() {
        let cues = parse_srt(SAMPLE_SRT);
        let once = slice_cues(&cues, 30.0, 70.0, false);
        let twice = slice_cues(&once, 30.0, 70.0, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_slices_match_direct_slice() {
        let cues = parse_srt(SAMPLE_SRT);
        let outer = slice_cues(&cues, 10.0, 80.0, false);
        let nested = slice_cues(&outer, 40.0, 65.0, false);
        assert_eq!(nested, slice_cues(&cues, 40.0, 65.0, false));
    }

    #[test]
    fn test_every_window_slice_fits_its_duration() {
        let cues = parse_srt(SAMPLE_SRT);
        let config = PlanConfig::new(20.0, 30.0).unwrap();
        let windows = plan_segments(&cues, 95.0, &config).unwrap();

        for window in &windows {
            for local in slice_cues(&cues, window.start, window.end, true) {
                assert!(local.start >= 0.0);
                assert!(local.end <= window.duration() + 1e-9);
                assert!(local.end > local.start);
            }
        }
    }
}

// ============================================================================
// End-to-end Rendering Tests
// ============================================================================

mod render_tests {
    use super::*;

    #[derive(Default)]
    struct FakeCutter {
        calls: Mutex<Vec<(f64, f64, BurnIn)>>,
    }

    #[async_trait]
    impl SegmentCutter for FakeCutter {
        async fn cut(&self, request: CutRequest<'_>) -> autoshorts::Result<()> {
            std::fs::write(request.output, b"clip")?;
            self.calls
                .lock()
                .unwrap()
                .push((request.start, request.end, request.subtitles.clone()));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn quiet_config(style: SubtitleStyle) -> PipelineConfig {
        PipelineConfig {
            style,
            show_progress: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_render_with_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cutter = Arc::new(FakeCutter::default());

        let result = render_shorts(
            &PathBuf::from("talk.mp4"),
            &out,
            95.0,
            Some(SAMPLE_SRT),
            cutter.clone(),
            &quiet_config(SubtitleStyle::Karaoke),
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

        assert_eq!(result.stats.segment_count, 2);
        assert_eq!(result.stats.cue_count, 5);
        assert!(out.join("segments/seg_000.mp4").exists());
        assert!(out.join("segments/seg_001.mp4").exists());

        let second_srt = std::fs::read_to_string(out.join("subtitles/seg_001.srt")).unwrap();
        assert_eq!(
            second_srt,
            "1\n00:00:00,000 --> 00:00:27,000\nThanks for watching\n"
        );
        assert!(out.join("subtitles/seg_001.ass").exists());

        let manifest: Manifest =
            serde_json::from_str(&std::fs::read_to_string(&result.manifest_path).unwrap()).unwrap();
        assert_eq!(manifest, result.manifest);
        assert_eq!(manifest.segments[1].start, 63.0);
        assert_eq!(manifest.segments[1].file, PathBuf::from("segments/seg_001.mp4"));
        assert_eq!(
            manifest.segments[1].ass,
            Some(PathBuf::from("subtitles/seg_001.ass"))
        );

        let mut calls = cutter.calls.lock().unwrap().clone();
        calls.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0].2, BurnIn::Ass(_)));
    }

    #[tokio::test]
    async fn test_render_time_only() {
        let dir = tempfile::tempdir().unwrap();
        let cutter = Arc::new(FakeCutter::default());

        let result = render_shorts(
            &PathBuf::from("talk.mp4"),
            dir.path(),
            130.0,
            None,
            cutter.clone(),
            &quiet_config(SubtitleStyle::Srt),
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

        let bounds: Vec<(f64, f64)> = result
            .manifest
            .segments
            .iter()
            .map(|s| (s.start, s.end))
            .collect();
        assert_eq!(bounds, vec![(0.0, 60.0), (60.0, 120.0), (120.0, 130.0)]);

        for (_, _, burn_in) in cutter.calls.lock().unwrap().iter() {
            assert_eq!(*burn_in, BurnIn::None);
        }
        // Empty subtitle files are still written for every segment.
        let srt = std::fs::read_to_string(dir.path().join("subtitles/seg_002.srt")).unwrap();
        assert!(srt.is_empty());
    }

    #[tokio::test]
    async fn test_render_stops_when_cancelled() {
        let dir = tempfile::tempdir().unwrap();

        let result = render_shorts(
            &PathBuf::from("talk.mp4"),
            dir.path(),
            30.0,
            None,
            Arc::new(FakeCutter::default()),
            &quiet_config(SubtitleStyle::Srt),
            Arc::new(AtomicBool::new(true)),
        )
        .await;

        assert!(matches!(result, Err(ShortsError::Cancelled)));
        assert!(!dir.path().join("manifest.json").exists());
    }
}
