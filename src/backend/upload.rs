use bytes::Bytes;
use reqwest::multipart::Part;
use std::sync::Arc;

use crate::common::BackendError;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.sent.min(self.total) * 100 / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.sent >= self.total
    }
}

pub type ProgressFn = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// A file picked by the operator, held in memory until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn part(&self) -> Result<Part, BackendError> {
        let part = Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)?;
        Ok(part)
    }

    /// Like [`UploadFile::part`], reporting bytes as the request body is pulled.
    pub fn part_with_progress(&self, on_progress: ProgressFn) -> Result<Part, BackendError> {
        let total = self.bytes.len() as u64;
        let part = Part::stream_with_length(progress_body(self.bytes.clone(), on_progress), total)
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)?;
        Ok(part)
    }
}

pub fn progress_body(bytes: Bytes, on_progress: ProgressFn) -> reqwest::Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Bytes> = (0..bytes.len())
        .step_by(CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
        .collect();

    if chunks.is_empty() {
        on_progress(UploadProgress { sent: 0, total: 0 });
    }

    let mut sent = 0u64;
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        on_progress(UploadProgress { sent, total });
        Ok::<Bytes, std::io::Error>(chunk)
    }));

    reqwest::Body::wrap_stream(stream)
}
