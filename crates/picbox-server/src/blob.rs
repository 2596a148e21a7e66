//! Blob storage for uploaded picture bytes.
//!
//! [`BlobStore`] writes payloads under a configured media directory and
//! hands back a relative storage key (`<uuid4>.<ext>`). Keys are opaque to
//! the rest of the system; only this module resolves them to filesystem
//! paths, so stored records never embed host-specific absolute paths.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Errors produced by blob operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The payload does not start with a known image signature.
    #[error("payload is not a recognized image")]
    NotAnImage,

    /// Filesystem failure writing or removing a blob.
    #[error("blob I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Image formats accepted for upload, detected by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Sniffs the payload's leading bytes.
    fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Filesystem-backed store for uploaded image bytes.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(BlobStore { root })
    }

    /// Saves an uploaded payload, returning its relative storage key.
    ///
    /// The payload must carry a recognized image signature. The key keeps
    /// the original filename's extension when present, falling back to the
    /// sniffed format's canonical extension.
    pub fn save(&self, bytes: &[u8], original_filename: &str) -> Result<String, BlobError> {
        let format = ImageFormat::sniff(bytes).ok_or(BlobError::NotAnImage)?;
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| format.extension().to_string());
        let key = format!("{}.{}", Uuid::new_v4().simple(), ext);
        std::fs::write(self.root.join(&key), bytes)?;
        Ok(key)
    }

    /// Resolves a storage key to its full path.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Removes a stored blob. Missing files are not an error.
    pub fn remove(&self, key: &str) -> Result<(), BlobError> {
        match std::fs::remove_file(self.root.join(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
