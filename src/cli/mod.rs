use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "slidecast",
    about = "Slidecast - Create a narrated slideshow video from a text prompt",
    version,
    long_about = "Reads a free-text prompt from standard input, asks a generative model to \
script a slide presentation, renders each slide as a generated image plus a synthesized \
voice clip, and concatenates everything into a single video file."
)]
pub struct Cli {
    /// Speaker name to narrate the presentation (must exist in the voice catalog)
    #[arg(short, long, default_value = "Morgan Freeman", value_name = "NAME")]
    pub speaker: String,

    /// Output root directory; each run gets its own numbered subdirectory
    #[arg(short, long, default_value = "videos", value_name = "DIR")]
    pub output: PathBuf,

    /// OpenAI API key used for script and image generation
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
