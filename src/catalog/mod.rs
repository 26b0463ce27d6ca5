use std::collections::HashMap;

use crate::{Result, SlidecastError};

/// Mapping from human-readable speaker names to backend voice identifiers
///
/// Fetched once at process start and passed by reference into the parts that
/// need it; there is no ambient global lookup.
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: HashMap<String, String>,
}

impl VoiceCatalog {
    /// Build a catalog from (speaker title, voice identifier) entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            voices: entries.into_iter().collect(),
        }
    }

    /// Resolve a speaker name to its backend voice identifier
    ///
    /// Unknown names are rejected here, before any pipeline stage runs.
    pub fn resolve(&self, speaker: &str) -> Result<&str> {
        self.voices
            .get(speaker)
            .map(String::as_str)
            .ok_or_else(|| SlidecastError::UnknownSpeaker(speaker.to_string()).into())
    }

    /// Number of voices in the catalog
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
