// Run manifest written next to the rendered segments
use crate::config::SubtitleStyle;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub source: PathBuf,
    pub duration: f64,
    pub chunk_target: f64,
    pub chunk_max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub style: SubtitleStyle,
    pub segments: Vec<ManifestSegment>,
}

/// One rendered window. Paths are relative to the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSegment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub file: PathBuf,
    pub srt: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ass: Option<PathBuf>,
}

impl Manifest {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// `path` relative to `base`, or `path` unchanged when it is not below `base`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
