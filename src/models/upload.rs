// src/models/upload.rs
//! Uploaded certificate files.
//!
//! An [`UploadedFile`] is what the client declares when it picks a file; an
//! [`AcceptedFile`] is what the upload gate hands back once the declaration
//! passes validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A file as declared by the client, before validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as chosen by the user, e.g. "degree.pdf"
    pub name: String,

    /// MIME type reported by the client, e.g. "application/pdf"
    #[serde(alias = "mime_type")]
    pub declared_mime_type: String,

    /// Size in bytes reported by the client
    pub size_bytes: u64,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, declared_mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
        }
    }
}

/// Container types the gate accepts.
///
/// `image/jpg` is not a registered MIME type but browsers still send it, so
/// it is accepted alongside `image/jpeg`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Jpg,
    Png,
}

impl DocumentType {
    /// Maps a declared MIME type onto an accepted container type.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentType::Pdf),
            "image/jpeg" => Some(DocumentType::Jpeg),
            "image/jpg" => Some(DocumentType::Jpg),
            "image/png" => Some(DocumentType::Png),
            _ => None,
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Jpeg => "image/jpeg",
            DocumentType::Jpg => "image/jpg",
            DocumentType::Png => "image/png",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A file that passed the upload gate and is staged for the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub name: String,
    pub document_type: DocumentType,
    pub size_bytes: u64,
}

impl AcceptedFile {
    /// Size in mebibytes, rounded to two decimals for display.
    pub fn size_mib(&self) -> f64 {
        (self.size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_accepts_known_types() {
        assert_eq!(DocumentType::from_mime("application/pdf"), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_mime("image/jpeg"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_mime("image/jpg"), Some(DocumentType::Jpg));
        assert_eq!(DocumentType::from_mime(" IMAGE/PNG "), Some(DocumentType::Png));
    }

    #[test]
    fn test_from_mime_rejects_others() {
        assert_eq!(DocumentType::from_mime("image/gif"), None);
        assert_eq!(DocumentType::from_mime("application/msword"), None);
        assert_eq!(DocumentType::from_mime(""), None);
    }

    #[test]
    fn test_size_mib_rounding() {
        let file = AcceptedFile {
            name: "scan.png".to_string(),
            document_type: DocumentType::Png,
            size_bytes: 5 * 1024 * 1024 + 300_000,
        };
        assert_eq!(file.size_mib(), 5.29);
    }
}
