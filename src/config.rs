use crate::error::{Result, ShortsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Subtitle rendering style burned into each short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleStyle {
    /// Plain SRT cues.
    #[default]
    Srt,
    /// ASS karaoke with per-word highlight timing.
    Karaoke,
}

impl std::fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubtitleStyle::Srt => write!(f, "srt"),
            SubtitleStyle::Karaoke => write!(f, "tiktok"),
        }
    }
}

impl std::str::FromStr for SubtitleStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(SubtitleStyle::Srt),
            "tiktok" | "karaoke" | "ass" => Ok(SubtitleStyle::Karaoke),
            _ => Err(format!("Unknown style: {}. Use 'srt' or 'tiktok'", s)),
        }
    }
}

impl SubtitleStyle {
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleStyle::Srt => "srt",
            SubtitleStyle::Karaoke => "ass",
        }
    }
}

/// Fill used around the source frame in vertical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Black,
    Blur,
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Background::Black => write!(f, "black"),
            Background::Blur => write!(f, "blur"),
        }
    }
}

impl std::str::FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Background::Black),
            "blur" => Ok(Background::Blur),
            _ => Err(format!("Unknown background: {}. Use 'black' or 'blur'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    /// Language hint forwarded to the speech-to-text service.
    pub asr_language: Option<String>,
    pub default_style: SubtitleStyle,
    pub chunk_target: f64,
    pub chunk_max: f64,
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            asr_language: None,
            default_style: SubtitleStyle::default(),
            chunk_target: 60.0,
            chunk_max: 75.0,
            concurrency: 2,
        }
    }
}

impl Config {
    /// Load configuration from the config file, then apply environment overrides.
    ///
    /// This is the only place that reads process state; everything downstream
    /// receives explicit values.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                config.openai_api_key = Some(key);
            }
        }
        if let Ok(language) = std::env::var("ASR_LANGUAGE") {
            if !language.trim().is_empty() {
                config.asr_language = Some(language);
            }
        }
        if let Ok(style) = std::env::var("AUTOSHORTS_STYLE") {
            if let Ok(s) = style.parse() {
                config.default_style = s;
            }
        }
        if let Ok(target) = std::env::var("AUTOSHORTS_CHUNK_TARGET") {
            if let Ok(t) = target.parse() {
                config.chunk_target = t;
            }
        }
        if let Ok(max) = std::env::var("AUTOSHORTS_CHUNK_MAX") {
            if let Ok(m) = max.parse() {
                config.chunk_max = m;
            }
        }
        if let Ok(concurrency) = std::env::var("AUTOSHORTS_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                config.concurrency = c;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_lengths(self.chunk_target, self.chunk_max)?;

        if self.concurrency == 0 {
            return Err(ShortsError::Config(
                "Concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("autoshorts").join("config.toml"))
    }
}

/// Check segment length bounds: `0 < target <= max`, both finite.
pub fn validate_lengths(target: f64, max: f64) -> Result<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(ShortsError::Config(format!(
            "Target segment length must be a positive number of seconds, got {target}"
        )));
    }
    if !max.is_finite() || max < target {
        return Err(ShortsError::Config(format!(
            "Maximum segment length ({max}) must not be shorter than the target ({target})"
        )));
    }
    Ok(())
}
