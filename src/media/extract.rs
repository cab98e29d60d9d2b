use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, ShortsError};

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| {
            ShortsError::Media(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(ShortsError::Media("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe")
        .arg("-version")
        .output()
        .map_err(|e| {
            ShortsError::Media(format!(
                "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(ShortsError::Media("FFprobe check failed".to_string()));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get the container duration in seconds using FFprobe.
pub fn get_media_duration(input: &Path) -> Result<f64> {
    if !input.exists() {
        return Err(ShortsError::FileNotFound(input.display().to_string()));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| ShortsError::Media(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShortsError::Media(format!("FFprobe failed: {stderr}")));
    }

    parse_duration_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration_output(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let duration: f64 = trimmed
        .parse()
        .map_err(|e| ShortsError::Media(format!("Failed to parse duration '{trimmed}': {e}")))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(ShortsError::Media(format!(
            "FFprobe reported an unusable duration: {trimmed}"
        )));
    }

    Ok(duration)
}

/// Extract a mono 16kHz MP3 track suitable for speech recognition.
pub async fn extract_audio(input: &Path, output: &Path) -> Result<()> {
    check_ffmpeg()?;

    if !input.exists() {
        return Err(ShortsError::FileNotFound(input.display().to_string()));
    }

    info!("Extracting audio from {}", input.display());

    let status = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args([
            "-vn",
            "-ac",
            "1",
            "-ar",
            "16000",
            "-c:a",
            "libmp3lame",
            "-q:a",
            "2",
        ])
        .arg(output)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|e| ShortsError::Media(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(ShortsError::Media(
            "FFmpeg audio extraction failed".to_string(),
        ));
    }

    if !output.exists() {
        return Err(ShortsError::Media(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio extracted to {}", output.display());
    Ok(())
}
