use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Result, SlidecastError};

/// Filename of the finished video inside the run directory
pub const VIDEO_FILENAME: &str = "video.mp4";

/// One (image, audio) pair contributing a single scene to the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePair {
    pub image: PathBuf,
    pub audio: PathBuf,
}

/// Trait for the external media-encoding tool
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// Concatenate the ordered scene pairs into one video file at `output`
    async fn encode(&self, pairs: &[ScenePair], output: &Path) -> Result<()>;
}

/// Encoder that shells out to ffmpeg
pub struct FfmpegEncoder {
    program: String,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }

    /// Build the ffmpeg argument list for concatenating the scene pairs
    ///
    /// Inputs alternate image/audio per pair and feed a single concat filter
    /// with one video and one audio stream per scene, so each scene lasts as
    /// long as its audio clip. yuv420p keeps the output broadly playable.
    fn concat_args(pairs: &[ScenePair], output: &Path) -> Vec<String> {
        let mut args = vec!["-y".to_string()];

        for pair in pairs {
            args.push("-i".to_string());
            args.push(pair.image.to_string_lossy().into_owned());
            args.push("-i".to_string());
            args.push(pair.audio.to_string_lossy().into_owned());
        }

        args.push("-filter_complex".to_string());
        args.push(format!("concat=n={}:v=1:a=1[v][a]", pairs.len()));
        args.push("-map".to_string());
        args.push("[v]".to_string());
        args.push("-map".to_string());
        args.push("[a]".to_string());
        args.push("-pix_fmt".to_string());
        args.push("yuv420p".to_string());
        args.push(output.to_string_lossy().into_owned());

        args
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn encode(&self, pairs: &[ScenePair], output: &Path) -> Result<()> {
        let args = Self::concat_args(pairs, output);
        tracing::debug!("Running {} with {} scene pairs", self.program, pairs.len());

        let result = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| SlidecastError::Encoding(format!("failed to run ffmpeg: {}", err)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SlidecastError::Encoding(stderr.into_owned()).into());
        }

        Ok(())
    }
}

/// Assembles the per-slide assets of a run directory into the final video
pub struct VideoAssembler<'a> {
    encoder: &'a dyn VideoEncoder,
}

impl<'a> VideoAssembler<'a> {
    pub fn new(encoder: &'a dyn VideoEncoder) -> Self {
        Self { encoder }
    }

    /// Discover the persisted slide assets and concatenate them in order
    ///
    /// All-or-nothing: a count mismatch or a stray half-pair aborts before
    /// the encoder is invoked and no video file is written.
    pub async fn assemble(&self, output_dir: &Path) -> Result<PathBuf> {
        tracing::info!("Creating video...");

        let images = discover_assets(output_dir, "png")?;
        let audio = discover_assets(output_dir, "wav")?;

        if images.len() != audio.len() {
            return Err(SlidecastError::AssetMismatch(format!(
                "found {} image files but {} audio files",
                images.len(),
                audio.len()
            ))
            .into());
        }

        let mut pairs = Vec::with_capacity(images.len());
        for (image, audio) in images.into_iter().zip(audio) {
            if image.file_stem() != audio.file_stem() {
                return Err(SlidecastError::AssetMismatch(format!(
                    "stray half-pair: {} does not match {}",
                    image.display(),
                    audio.display()
                ))
                .into());
            }
            pairs.push(ScenePair { image, audio });
        }

        if pairs.is_empty() {
            return Err(
                SlidecastError::Encoding("presentation has no slides to encode".to_string())
                    .into(),
            );
        }

        let output = output_dir.join(VIDEO_FILENAME);
        self.encoder.encode(&pairs, &output).await?;

        tracing::info!("Video written to: {}", output.display());

        Ok(output)
    }
}

/// List `slide_*.{ext}` files in the directory, lexically sorted
///
/// Zero-padded slide indices make the lexical sort equal numeric slide order.
fn discover_assets(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs_err::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if name.starts_with("slide_") && path.extension().is_some_and(|e| e == extension) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Encoder stand-in that records invocations and writes a marker file
    #[derive(Default)]
    struct StubEncoder {
        calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl VideoEncoder for StubEncoder {
        async fn encode(&self, pairs: &[ScenePair], output: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(pairs.len());
            fs_err::write(output, b"video")?;
            Ok(())
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs_err::write(dir.join(name), b"x").unwrap();
    }

    #[tokio::test]
    async fn assembles_pairs_in_slide_order() {
        let dir = tempfile::tempdir().unwrap();
        // created out of order on purpose; discovery must sort
        for name in [
            "slide_010.png",
            "slide_010.wav",
            "slide_002.png",
            "slide_002.wav",
            "slide_000.png",
            "slide_000.wav",
        ] {
            touch(dir.path(), name);
        }

        let encoder = StubEncoder::default();
        let video = VideoAssembler::new(&encoder)
            .assemble(dir.path())
            .await
            .unwrap();

        assert_eq!(video, dir.path().join(VIDEO_FILENAME));
        assert!(video.exists());
        assert_eq!(*encoder.calls.lock().unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn count_mismatch_writes_no_video() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "slide_000.png");
        touch(dir.path(), "slide_000.wav");
        touch(dir.path(), "slide_001.png");

        let encoder = StubEncoder::default();
        let err = VideoAssembler::new(&encoder)
            .assemble(dir.path())
            .await
            .unwrap_err();

        match err.downcast_ref::<SlidecastError>() {
            Some(SlidecastError::AssetMismatch(_)) => {}
            other => panic!("expected AssetMismatch, got {:?}", other),
        }
        assert!(!dir.path().join(VIDEO_FILENAME).exists());
        assert!(encoder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stray_half_pairs_are_a_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        // equal counts, but the pairs don't line up
        touch(dir.path(), "slide_000.png");
        touch(dir.path(), "slide_001.wav");

        let encoder = StubEncoder::default();
        let err = VideoAssembler::new(&encoder)
            .assemble(dir.path())
            .await
            .unwrap_err();

        match err.downcast_ref::<SlidecastError>() {
            Some(SlidecastError::AssetMismatch(_)) => {}
            other => panic!("expected AssetMismatch, got {:?}", other),
        }
        assert!(!dir.path().join(VIDEO_FILENAME).exists());
    }

    #[tokio::test]
    async fn zero_slides_fail_explicitly() {
        let dir = tempfile::tempdir().unwrap();

        let encoder = StubEncoder::default();
        let err = VideoAssembler::new(&encoder)
            .assemble(dir.path())
            .await
            .unwrap_err();

        match err.downcast_ref::<SlidecastError>() {
            Some(SlidecastError::Encoding(_)) => {}
            other => panic!("expected Encoding, got {:?}", other),
        }
        assert!(!dir.path().join(VIDEO_FILENAME).exists());
    }

    #[tokio::test]
    async fn ignores_unrelated_files_during_discovery() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "slide_000.png");
        touch(dir.path(), "slide_000.wav");
        touch(dir.path(), "prompt.txt");
        touch(dir.path(), "presentation.json");

        let encoder = StubEncoder::default();
        VideoAssembler::new(&encoder)
            .assemble(dir.path())
            .await
            .unwrap();

        assert_eq!(*encoder.calls.lock().unwrap(), vec![1]);
    }

    #[test]
    fn concat_args_interleave_pairs() {
        let pairs = vec![
            ScenePair {
                image: PathBuf::from("a.png"),
                audio: PathBuf::from("a.wav"),
            },
            ScenePair {
                image: PathBuf::from("b.png"),
                audio: PathBuf::from("b.wav"),
            },
        ];

        let args = FfmpegEncoder::concat_args(&pairs, Path::new("out.mp4"));

        assert_eq!(
            args,
            vec![
                "-y", "-i", "a.png", "-i", "a.wav", "-i", "b.png", "-i", "b.wav",
                "-filter_complex", "concat=n=2:v=1:a=1[v][a]", "-map", "[v]", "-map", "[a]",
                "-pix_fmt", "yuv420p", "out.mp4",
            ]
        );
    }
}
