pub mod whisper;

pub use whisper::WhisperClient;

use crate::error::Result;
use crate::media::extract_audio;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A speech-to-text service that returns SRT text for an audio file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe_srt(&self, audio: &Path) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Where the run's transcript came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptOrigin {
    /// An `.srt` file sitting next to the input video.
    Sidecar(PathBuf),
    /// Produced by a transcriber; the path is the saved copy in the work dir.
    Generated { provider: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub srt: String,
    pub origin: TranscriptOrigin,
}

/// Path of the same-named `.srt` next to `input`.
pub fn sidecar_path(input: &Path) -> PathBuf {
    input.with_extension("srt")
}

/// Use the sidecar SRT when present, otherwise extract audio and transcribe it.
///
/// Returns `None` when there is no sidecar and no transcriber to fall back on.
pub async fn resolve_transcript(
    input: &Path,
    work_dir: &Path,
    transcriber: Option<&dyn Transcriber>,
) -> Result<Option<Transcript>> {
    let sidecar = sidecar_path(input);
    if sidecar.is_file() {
        info!("Using transcript {}", sidecar.display());
        let srt = tokio::fs::read_to_string(&sidecar).await?;
        return Ok(Some(Transcript {
            srt,
            origin: TranscriptOrigin::Sidecar(sidecar),
        }));
    }

    let Some(transcriber) = transcriber else {
        warn!(
            "No transcript at {} and no OPENAI_API_KEY configured; segments will be cut by time only",
            sidecar.display()
        );
        return Ok(None);
    };

    let audio_path = work_dir.join("audio_tmp.mp3");
    extract_audio(input, &audio_path).await?;

    info!("Transcribing audio with {}", transcriber.name());
    let srt = transcriber.transcribe_srt(&audio_path).await?;

    let saved = work_dir.join("input_auto.srt");
    tokio::fs::write(&saved, &srt).await?;

    Ok(Some(Transcript {
        srt,
        origin: TranscriptOrigin::Generated {
            provider: transcriber.name().to_string(),
            path: saved,
        },
    }))
}
