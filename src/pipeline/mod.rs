use std::path::PathBuf;

use crate::backends::{ImageGenerator, SpeechSynthesizer, TextGenerator};
use crate::Result;

pub mod assets;
pub mod presentation;
pub mod run_dir;
pub mod video;

pub use assets::{AssetPipeline, ConsoleProgress, NullProgress, ProgressReporter, SlideAsset};
pub use presentation::{Presentation, Slide, SYSTEM_INSTRUCTIONS};
pub use run_dir::RunContext;
pub use video::{FfmpegEncoder, VideoAssembler, VideoEncoder};

/// Arguments for one pipeline execution, immutable once constructed
#[derive(Debug, Clone)]
pub struct PipelineArgs {
    /// Free-text prompt describing the presentation
    pub prompt: String,

    /// Backend voice identifier, already resolved against the catalog
    pub speaker_voice_id: String,

    /// Root directory under which run directories are allocated
    pub output_root: PathBuf,
}

/// Sequences the full pipeline: run directory, slide script, per-slide
/// assets, final video
pub struct Pipeline {
    text: Box<dyn TextGenerator>,
    image: Box<dyn ImageGenerator>,
    speech: Box<dyn SpeechSynthesizer>,
    encoder: Box<dyn VideoEncoder>,
    progress: Box<dyn ProgressReporter>,
}

impl Pipeline {
    pub fn new(
        text: Box<dyn TextGenerator>,
        image: Box<dyn ImageGenerator>,
        speech: Box<dyn SpeechSynthesizer>,
        encoder: Box<dyn VideoEncoder>,
        progress: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            text,
            image,
            speech,
            encoder,
            progress,
        }
    }

    /// Run the pipeline end to end and return the run identifier
    ///
    /// The first failing stage aborts the rest; partial artifacts already
    /// written stay in the run directory for inspection.
    pub async fn run(&self, args: &PipelineArgs) -> Result<String> {
        tracing::info!("Running pipeline for output root: {}", args.output_root.display());

        let run = run_dir::allocate(&args.output_root)?;

        let script = presentation::generate(
            self.text.as_ref(),
            SYSTEM_INSTRUCTIONS,
            &args.prompt,
            &run.run_path,
        )
        .await?;

        let assets = AssetPipeline::new(
            self.image.as_ref(),
            self.speech.as_ref(),
            self.progress.as_ref(),
        )
        .materialize(&script, &args.speaker_voice_id, &run.run_path)
        .await?;
        tracing::info!("Materialized {} slide asset pairs", assets.len());

        VideoAssembler::new(self.encoder.as_ref())
            .assemble(&run.run_path)
            .await?;

        Ok(run.run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::video::ScenePair;
    use crate::SlidecastError;
    use async_trait::async_trait;
    use std::path::Path;

    struct ScriptedText(String);

    #[async_trait]
    impl TextGenerator for ScriptedText {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct StubImage;

    #[async_trait]
    impl ImageGenerator for StubImage {
        async fn generate(&self, _description: &str) -> Result<Vec<u8>> {
            Ok(b"png".to_vec())
        }
    }

    struct StubSpeech;

    #[async_trait]
    impl SpeechSynthesizer for StubSpeech {
        async fn synthesize(&self, _text: &str, _voice_id: &str) -> Result<Vec<u8>> {
            Ok(b"wav".to_vec())
        }
    }

    struct StubEncoder;

    #[async_trait]
    impl VideoEncoder for StubEncoder {
        async fn encode(&self, _pairs: &[ScenePair], output: &Path) -> Result<()> {
            fs_err::write(output, b"video")?;
            Ok(())
        }
    }

    fn pipeline_with_script(script: &str) -> Pipeline {
        Pipeline::new(
            Box::new(ScriptedText(script.to_string())),
            Box::new(StubImage),
            Box::new(StubSpeech),
            Box::new(StubEncoder),
            Box::new(NullProgress),
        )
    }

    #[tokio::test]
    async fn end_to_end_three_slides() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with_script(
            r#"[
                {"text": "Intro", "image": "a product box"},
                {"text": "Features", "image": "a feature chart"},
                {"text": "Thanks", "image": "a thank you card"}
            ]"#,
        );
        let args = PipelineArgs {
            prompt: "Intro to a product".to_string(),
            speaker_voice_id: "TM:voice".to_string(),
            output_root: root.path().to_path_buf(),
        };

        let run_id = pipeline.run(&args).await.unwrap();

        assert_eq!(run_id, "0");
        let run_dir = root.path().join(&run_id);
        assert!(run_dir.join("prompt.txt").exists());
        assert!(run_dir.join("presentation.json").exists());
        for i in 0..3 {
            assert!(run_dir.join(format!("slide_{:03}.png", i)).exists());
            assert!(run_dir.join(format!("slide_{:03}.wav", i)).exists());
        }
        assert!(run_dir.join("video.mp4").exists());
    }

    #[tokio::test]
    async fn consecutive_runs_get_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with_script(r#"[{"text": "t", "image": "i"}]"#);
        let args = PipelineArgs {
            prompt: "p".to_string(),
            speaker_voice_id: "TM:voice".to_string(),
            output_root: root.path().to_path_buf(),
        };

        assert_eq!(pipeline.run(&args).await.unwrap(), "0");
        assert_eq!(pipeline.run(&args).await.unwrap(), "1");
    }

    #[tokio::test]
    async fn invalid_script_stops_before_asset_generation() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with_script("not json");
        let args = PipelineArgs {
            prompt: "p".to_string(),
            speaker_voice_id: "TM:voice".to_string(),
            output_root: root.path().to_path_buf(),
        };

        let err = pipeline.run(&args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlidecastError>(),
            Some(SlidecastError::InvalidResponse(_))
        ));

        // prompt persisted before the failure, nothing downstream
        let run_dir = root.path().join("0");
        assert!(run_dir.join("prompt.txt").exists());
        assert!(!run_dir.join("presentation.json").exists());
        assert!(!run_dir.join("video.mp4").exists());
    }

    #[tokio::test]
    async fn empty_script_fails_at_encoding() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with_script("[]");
        let args = PipelineArgs {
            prompt: "p".to_string(),
            speaker_voice_id: "TM:voice".to_string(),
            output_root: root.path().to_path_buf(),
        };

        let err = pipeline.run(&args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlidecastError>(),
            Some(SlidecastError::Encoding(_))
        ));
        assert!(!root.path().join("0").join("video.mp4").exists());
    }
}
