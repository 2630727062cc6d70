//! File attachments for prompts.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A file ready to be uploaded with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Build an attachment from in-memory content; the MIME type is guessed
    /// from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read attachment {}: {}", path.display(), e);
            Error::Attachment
        })?;
        Ok(Self::from_bytes(file_name_of(path), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The single file chosen in the input row, held until the next send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAttachment {
    path: Option<PathBuf>,
}

impl PendingAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a picker selection. Only the first file is kept; an empty
    /// selection leaves the current choice alone.
    pub fn select(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        if let Some(first) = paths.into_iter().next() {
            self.path = Some(first);
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Display name of the chosen file.
    pub fn name(&self) -> Option<String> {
        self.path.as_deref().map(file_name_of)
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }

    /// Take the chosen path, leaving nothing selected.
    pub fn take(&mut self) -> Option<PathBuf> {
        self.path.take()
    }

    pub fn clear(&mut self) {
        self.path = None;
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}
