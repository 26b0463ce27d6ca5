use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::backends::{ImageGenerator, SpeechSynthesizer};
use crate::pipeline::presentation::Slide;
use crate::{AssetStep, Result, SlidecastError};

/// Length of the description/speech previews shown while generating
const PREVIEW_CHARS: usize = 40;

/// The image file and audio file that together make one video scene
#[derive(Debug, Clone)]
pub struct SlideAsset {
    pub index: usize,
    pub image_path: PathBuf,
    pub audio_path: PathBuf,
}

/// Image filename for a slide index
///
/// Indices are zero-padded so a lexical sort of the filenames matches
/// numeric slide order ("slide_010" never sorts before "slide_002").
pub fn image_filename(index: usize) -> String {
    format!("slide_{index:03}.png")
}

/// Audio filename for a slide index
pub fn audio_filename(index: usize) -> String {
    format!("slide_{index:03}.wav")
}

/// Observer for per-slide progress; an observability side effect only
///
/// Implementations can be swapped or disabled without touching the
/// generation logic. All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    fn begin(&self, _total: usize) {}
    fn slide_completed(&self, _index: usize, _slide: &Slide) {}
    fn finish(&self) {}
}

/// Progress reporter that does nothing
pub struct NullProgress;

impl ProgressReporter for NullProgress {}

/// Terminal progress bar backed by indicatif
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap(),
        );
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn begin(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn slide_completed(&self, index: usize, slide: &Slide) {
        self.bar.set_message(format!(
            "Slide {}: image '{}', speech '{}'",
            index,
            preview(&slide.image_description, PREVIEW_CHARS),
            preview(&slide.speech_text, PREVIEW_CHARS),
        ));
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("All slides generated");
    }
}

/// Truncate text for display, respecting character boundaries
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// Drives per-slide asset generation against the external backends
pub struct AssetPipeline<'a> {
    image: &'a dyn ImageGenerator,
    speech: &'a dyn SpeechSynthesizer,
    progress: &'a dyn ProgressReporter,
}

impl<'a> AssetPipeline<'a> {
    pub fn new(
        image: &'a dyn ImageGenerator,
        speech: &'a dyn SpeechSynthesizer,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            image,
            speech,
            progress,
        }
    }

    /// Generate and persist the image/audio pair for every slide, in order
    ///
    /// Both halves of a slide are fetched into memory before either final
    /// file is written, so a failing slide leaves no partial pair under its
    /// final filenames. Assets of already-completed slides stay on disk.
    pub async fn materialize(
        &self,
        presentation: &[Slide],
        voice_id: &str,
        output_dir: &Path,
    ) -> Result<Vec<SlideAsset>> {
        self.progress.begin(presentation.len());

        let mut assets = Vec::with_capacity(presentation.len());

        for (index, slide) in presentation.iter().enumerate() {
            let image_bytes = self
                .image
                .generate(&slide.image_description)
                .await
                .map_err(|err| asset_error(index, AssetStep::Image, err))?;

            let audio_bytes = self
                .speech
                .synthesize(&slide.speech_text, voice_id)
                .await
                .map_err(|err| asset_error(index, AssetStep::Speech, err))?;

            let image_path = output_dir.join(image_filename(index));
            let audio_path = output_dir.join(audio_filename(index));
            fs_err::write(&image_path, &image_bytes)?;
            fs_err::write(&audio_path, &audio_bytes)?;

            self.progress.slide_completed(index, slide);

            assets.push(SlideAsset {
                index,
                image_path,
                audio_path,
            });
        }

        self.progress.finish();

        Ok(assets)
    }
}

fn asset_error(index: usize, step: AssetStep, err: anyhow::Error) -> anyhow::Error {
    SlidecastError::AssetGeneration {
        index,
        step,
        message: err.to_string(),
    }
    .into()
}
