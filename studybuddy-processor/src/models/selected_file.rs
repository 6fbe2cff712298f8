//! User-selected document handles

use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// An opaque document chosen by the user
///
/// The bytes are uploaded as-is; the MIME type is sniffed from the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    bytes: Vec<u8>,
    mime_type: String,
}

impl SelectedFile {
    /// Create a handle from in-memory content
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        Self {
            name: name.into(),
            bytes,
            mime_type,
        }
    }

    /// Read a handle from disk
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
