use std::path::{Path, PathBuf};

use crate::encode::container::OutputFormat;
use crate::foundation::error::{RelingoError, RelingoResult};

/// The finished output of a render: container bytes tagged with their format.
///
/// Ownership passes to the caller.
#[derive(Clone, Debug)]
pub struct MediaBlob {
    format: OutputFormat,
    bytes: Vec<u8>,
    created_at: chrono::DateTime<chrono::Local>,
}

impl MediaBlob {
    /// Assemble a blob from the chunks an encoder emitted, in order.
    pub fn from_chunks(format: OutputFormat, chunks: Vec<Vec<u8>>) -> Self {
        let total = chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for c in chunks {
            bytes.extend_from_slice(&c);
        }
        Self::new(format, bytes)
    }

    /// Wrap already-assembled bytes.
    pub fn new(format: OutputFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            created_at: chrono::Local::now(),
        }
    }

    /// Negotiated output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// MIME tag.
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Container bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when the blob holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// When the blob was assembled.
    pub fn created_at(&self) -> chrono::DateTime<chrono::Local> {
        self.created_at
    }

    /// Download name: `<stem>_<YYYYmmdd_HHMMSS>.<ext>`.
    pub fn file_name(&self, stem: &str) -> String {
        let stem = sanitize_stem(stem);
        format!(
            "{stem}_{}.{}",
            self.created_at.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        )
    }

    /// Write the blob into `dir` under [`MediaBlob::file_name`] and return the full path.
    pub fn write_to(&self, dir: &Path, stem: &str) -> RelingoResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            RelingoError::encode(format!(
                "failed to create output directory '{}': {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(self.file_name(stem));
        std::fs::write(&path, &self.bytes).map_err(|e| {
            RelingoError::encode(format!("failed to write '{}': {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "wrote output");
        Ok(path)
    }
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "captioned".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/blob.rs"]
mod tests;
