use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backends::TextGenerator;
use crate::{Result, SlidecastError};

/// Filename for the verbatim user prompt, written before any network call
pub const PROMPT_FILENAME: &str = "prompt.txt";

/// Filename for the validated slide script
pub const PRESENTATION_FILENAME: &str = "presentation.json";

/// System instructions that make the model emit the slide script as JSON
pub const SYSTEM_INSTRUCTIONS: &str = r#"Your job is to create a slide presentation for a video. In this presentation you must include a speech for the current slide and a description for the background image. You need to make it as story-like as possible. The format of the output must be in JSON. You have to output a list of objects. Each object will contain a key for the speech called "text" and a key for the image description called "image".

For example for a slide presentation about the new iphone you could output something like:

```
[
  {
    "text": "Hello. Today we will discuss about the new iphone",
    "image": "Image of a phone on a business desk with a black background"
  },
  {
    "text": "Apple is going to release this new iphone this summer",
    "image": "A group of happy people with phones in their hand"
  },
  {
    "text": "Thank you for watching my presentation",
    "image": "A thank you message on white background"
  }
]
```

Make sure to output only JSON text. Do not output any extra comments.
"#;

/// One narrated unit: the speech for the slide and the description of its
/// background image
///
/// Wire format matches the instruction text above: `{"text": .., "image": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "text")]
    pub speech_text: String,

    #[serde(rename = "image")]
    pub image_description: String,
}

/// Ordered sequence of slides; order is screen/narration order
pub type Presentation = Vec<Slide>;

/// Request the slide script from the generative backend and validate it
///
/// The prompt is persisted to `prompt.txt` before the network call so a
/// failed run can be diagnosed and replayed. The validated script is
/// persisted to `presentation.json` with stable formatting. Malformed
/// responses fail without repair or retry; the caller decides whether to
/// retry the whole generation.
pub async fn generate(
    backend: &dyn TextGenerator,
    system: &str,
    prompt: &str,
    output_dir: &Path,
) -> Result<Presentation> {
    tracing::info!("Creating slides...");

    fs_err::write(output_dir.join(PROMPT_FILENAME), prompt)?;

    let response = backend.complete(system, prompt).await?;

    let presentation: Presentation = serde_json::from_str(&response)
        .map_err(|err| SlidecastError::InvalidResponse(err.to_string()))?;

    let serialized = serde_json::to_string_pretty(&presentation)?;
    fs_err::write(output_dir.join(PRESENTATION_FILENAME), serialized)?;

    tracing::info!("Presentation has {} slides", presentation.len());

    Ok(presentation)
}
