//! Transcript export
//!
//! A transcript is one `ROLE: content` entry per message, separated by blank
//! lines, in conversation order.

use crate::catalog::ModuleInfo;
use crate::conversation::Conversation;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0} (only txt is available)")]
    UnsupportedFormat(String),
    #[error("Failed to write transcript: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format of an export.
///
/// Plain text only. A PDF request is refused rather than producing a text
/// file under a PDF name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "" | "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render a conversation as a transcript.
///
/// Line breaks inside a message are folded into single spaces so every
/// message is exactly one line and entries stay separable on blank lines.
#[must_use]
pub fn encode(conversation: &Conversation) -> Vec<u8> {
    conversation
        .messages()
        .iter()
        .map(|m| format!("{}: {}", m.role().as_str().to_uppercase(), single_line(m.content())))
        .collect::<Vec<_>>()
        .join("\n\n")
        .into_bytes()
}

fn single_line(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// e.g. `Active_Listening_conversation_2.txt`
#[must_use]
pub fn export_filename(
    module: &ModuleInfo,
    conversation: &Conversation,
    format: ExportFormat,
) -> String {
    let stem = module
        .display_name()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!(
        "{stem}_conversation_{}.{}",
        conversation.id(),
        format.extension()
    )
}

/// Write the transcript into `dir`, returning the file path
///
/// # Errors
///
/// `ExportError::Io` if the file can't be written.
pub fn write_transcript(
    dir: &Path,
    module: &ModuleInfo,
    conversation: &Conversation,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_filename(module, conversation, format));
    std::fs::write(&path, encode(conversation))?;
    tracing::info!(
        conv_id = %conversation.id(),
        path = %path.display(),
        messages = conversation.messages().len(),
        "Exported transcript"
    );
    Ok(path)
}
