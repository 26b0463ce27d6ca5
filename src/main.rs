use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidecast::backends::fakeyou::FakeYouClient;
use slidecast::backends::openai::OpenAiClient;
use slidecast::pipeline::{ConsoleProgress, FfmpegEncoder};
use slidecast::{Cli, Pipeline, PipelineArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "slidecast=debug"
    } else {
        "slidecast=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The speaker is validated against the catalog before anything runs;
    // an unknown name exits here without allocating a run directory.
    let fakeyou = FakeYouClient::new();
    let catalog = fakeyou.fetch_voice_catalog().await?;
    tracing::info!("Loaded {} voices from the catalog", catalog.len());

    let voice_id = catalog.resolve(&cli.speaker)?.to_string();

    let mut prompt = String::new();
    std::io::stdin()
        .read_to_string(&mut prompt)
        .context("Failed to read prompt from stdin")?;

    let openai = OpenAiClient::new(cli.api_key);
    let pipeline = Pipeline::new(
        Box::new(openai.clone()),
        Box::new(openai),
        Box::new(fakeyou),
        Box::new(FfmpegEncoder::new()),
        Box::new(ConsoleProgress::new()),
    );

    let args = PipelineArgs {
        prompt,
        speaker_voice_id: voice_id,
        output_root: cli.output,
    };

    let run_id = pipeline.run(&args).await?;
    println!("Finished run {} in {}", run_id, args.output_root.join(&run_id).display());

    Ok(())
}
