// src/export.rs
//
// Final-stage package: a plain-text summary plus the binary assets.

use crate::audio::pcm_to_wav;
use crate::types::PublishSlot;
use crate::workflow::state::WorkflowState;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PACKAGE_FILE_NAME: &str = "tubeflow-assets.txt";
pub const VOICEOVER_FILE_NAME: &str = "voiceover.wav";

/// Everything the final review stage hands over, projected from the state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPackage {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub slot: Option<PublishSlot>,
    pub schedule: Vec<String>,
    pub script: String,
    pub voiceover_pcm: Option<Vec<u8>>,
    pub thumbnails: Vec<Vec<u8>>,
}

impl ContentPackage {
    pub fn from_state(state: &WorkflowState) -> Self {
        let seo = state.seo.result.clone().unwrap_or_default();
        Self {
            title: seo.title,
            description: seo.description,
            tags: seo.tags,
            slot: state.plan.slot,
            schedule: state.plan.schedule.clone(),
            script: state.script.script.clone(),
            voiceover_pcm: state.voice.audio.clone(),
            thumbnails: state.thumbnail_images.images.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let (date, time) = self
            .slot
            .map(|s| (s.date_label(), s.time_label()))
            .unwrap_or_default();

        let mut out = format!(
            "TITLE: {}\n\nDESCRIPTION:\n{}\n\nTAGS:\n{}\n\n---\nPUBLISH: {} @ {}\n\n",
            self.title,
            self.description,
            self.tags.join(", "),
            date,
            time
        );

        if !self.schedule.is_empty() {
            out.push_str("SCHEDULE:\n");
            for step in &self.schedule {
                out.push_str(&format!("- {}\n", step));
            }
            out.push('\n');
        }

        out.push_str("SCRIPT:\n");
        out.push_str(&self.script);
        out
    }

    /// Write the text package, the voiceover as WAV and each thumbnail into `dir`.
    /// Returns the written paths.
    pub async fn write_to_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;
        let mut written = Vec::new();

        let text_path = dir.join(PACKAGE_FILE_NAME);
        tokio::fs::write(&text_path, self.render_text()).await?;
        written.push(text_path);

        if let Some(pcm) = self.voiceover_pcm.as_deref().filter(|p| !p.is_empty()) {
            let wav = pcm_to_wav(pcm).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let wav_path = dir.join(VOICEOVER_FILE_NAME);
            tokio::fs::write(&wav_path, wav).await?;
            written.push(wav_path);
        }

        for (i, image) in self.thumbnails.iter().enumerate() {
            let path = dir.join(format!("thumbnail-{}.{}", i + 1, image_extension(image)));
            tokio::fs::write(&path, image).await?;
            written.push(path);
        }

        info!(dir = %dir.display(), files = written.len(), "Assets exported");
        Ok(written)
    }
}

/// Pick the file extension from the image's magic bytes
fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpg"
    } else {
        "png"
    }
}
