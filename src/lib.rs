pub mod config;
pub mod error;
pub mod manifest;
pub mod media;
pub mod pipeline;
pub mod segment;
pub mod subtitle;
pub mod transcribe;

pub use config::Config;
pub use error::{Result, ShortsError};
pub use pipeline::{
    generate_shorts, print_summary, render_shorts, PipelineConfig, PipelineResult, PipelineStats,
};
