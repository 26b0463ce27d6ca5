//! Slidecast - A Rust CLI tool for creating narrated slideshow videos
//!
//! This library turns a free-text prompt into a finished video: a generative
//! model scripts the slides, each slide is realized as a generated image and
//! a synthesized voice clip, and ffmpeg concatenates the pairs into one file.

pub mod backends;
pub mod catalog;
pub mod cli;
pub mod pipeline;

pub use catalog::VoiceCatalog;
pub use cli::Cli;
pub use pipeline::{Pipeline, PipelineArgs};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the slide pipeline
///
/// Filesystem failures are left as `std::io::Error` in the anyhow chain
/// rather than duplicated here.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    #[error("Generative backend returned an invalid presentation: {0}")]
    InvalidResponse(String),

    #[error("Asset generation failed for slide {index} during {step}: {message}")]
    AssetGeneration {
        index: usize,
        step: AssetStep,
        message: String,
    },

    #[error("Image and audio assets do not pair up: {0}")]
    AssetMismatch(String),

    #[error("Video encoding failed: {0}")]
    Encoding(String),

    #[error("Unknown speaker '{0}': not present in the voice catalog")]
    UnknownSpeaker(String),
}

/// Which half of a slide's asset pair failed to materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStep {
    Image,
    Speech,
}

impl std::fmt::Display for AssetStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStep::Image => write!(f, "image generation"),
            AssetStep::Speech => write!(f, "speech synthesis"),
        }
    }
}
