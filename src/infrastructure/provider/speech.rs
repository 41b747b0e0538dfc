//! File-storing speech synthesizer.
//!
//! Fetches audio bytes from the generation API and stores them under the
//! configured audio directory. Failures here are soft for callers; the
//! generation coordinator falls back to a null audio reference.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::client::GenerationApiClient;
use crate::domain::ports::{ProviderError, SpeechSynthesizer};

/// `SpeechSynthesizer` writing synthesized audio to disk.
pub struct FileSpeechSynthesizer {
    client: Arc<GenerationApiClient>,
    audio_dir: PathBuf,
}

impl FileSpeechSynthesizer {
    pub fn new(client: Arc<GenerationApiClient>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            audio_dir: audio_dir.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for FileSpeechSynthesizer {
    async fn synthesize(&self, script: &str, file_stem: &str) -> Result<String, ProviderError> {
        let bytes = self
            .client
            .request_speech(script)
            .await
            .map_err(|e| ProviderError::Failed(e.to_string()))?;

        tokio::fs::create_dir_all(&self.audio_dir)
            .await
            .map_err(|e| ProviderError::Failed(format!("failed to create audio dir: {e}")))?;

        let path = self.audio_dir.join(format!("{file_stem}.mp3"));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ProviderError::Failed(format!("failed to store audio: {e}")))?;

        debug!(path = %path.display(), "audio stored");
        Ok(path.to_string_lossy().into_owned())
    }
}
