// src/services/upload_gate.rs
//! Upload validation.
//!
//! The gate is the only way into the workflow: a file must declare one of
//! the accepted container types and stay within the size limit.

use crate::errors::RejectionReason;
use crate::models::upload::{AcceptedFile, DocumentType, UploadedFile, MAX_UPLOAD_BYTES};
use log::warn;

/// Validates declared type and size of a submitted file.
#[derive(Debug, Clone, Copy)]
pub struct UploadGate {
    max_size_bytes: u64,
}

impl UploadGate {
    /// Gate enforcing a custom size limit.
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Checks a file declaration.
    ///
    /// # Returns
    /// - `Ok(AcceptedFile)` when the declaration is acceptable
    /// - `Err(RejectionReason::TooLarge)` when the size exceeds the limit,
    ///   whatever the type
    /// - `Err(RejectionReason::UnsupportedType)` when the size is fine but
    ///   the type is not PDF, JPEG, JPG or PNG
    pub fn submit(&self, file: &UploadedFile) -> Result<AcceptedFile, RejectionReason> {
        if file.size_bytes > self.max_size_bytes {
            warn!(
                "rejected '{}': {} bytes exceeds {} byte limit",
                file.name, file.size_bytes, self.max_size_bytes
            );
            return Err(RejectionReason::TooLarge {
                size_bytes: file.size_bytes,
                limit_bytes: self.max_size_bytes,
            });
        }

        let document_type = DocumentType::from_mime(&file.declared_mime_type).ok_or_else(|| {
            warn!("rejected '{}': unsupported type '{}'", file.name, file.declared_mime_type);
            RejectionReason::UnsupportedType {
                declared: file.declared_mime_type.clone(),
            }
        })?;

        Ok(AcceptedFile {
            name: file.name.clone(),
            document_type,
            size_bytes: file.size_bytes,
        })
    }
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_accepts_pdf_within_limit() {
        let gate = UploadGate::default();
        let accepted = gate
            .submit(&UploadedFile::new("degree.pdf", "application/pdf", 5 * MB))
            .unwrap();
        assert_eq!(accepted.document_type, DocumentType::Pdf);
        assert_eq!(accepted.name, "degree.pdf");
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let gate = UploadGate::default();
        assert!(gate
            .submit(&UploadedFile::new("scan.png", "image/png", MAX_UPLOAD_BYTES))
            .is_ok());
    }

    #[test]
    fn test_too_large_regardless_of_type() {
        let gate = UploadGate::default();
        for mime in ["application/pdf", "image/jpeg", "image/jpg", "image/png", "text/plain", ""] {
            let err = gate
                .submit(&UploadedFile::new("big", mime, MAX_UPLOAD_BYTES + 1))
                .unwrap_err();
            assert!(matches!(err, RejectionReason::TooLarge { .. }), "mime {mime:?}");
        }
    }

    #[test]
    fn test_unsupported_type_with_valid_size() {
        let gate = UploadGate::default();
        for mime in ["image/gif", "application/zip", "text/html"] {
            let err = gate.submit(&UploadedFile::new("file", mime, 1024)).unwrap_err();
            assert_eq!(
                err,
                RejectionReason::UnsupportedType {
                    declared: mime.to_string()
                }
            );
        }
    }

    #[test]
    fn test_custom_limit() {
        let gate = UploadGate::new(100);
        assert!(gate.submit(&UploadedFile::new("a.jpg", "image/jpg", 100)).is_ok());
        assert!(gate.submit(&UploadedFile::new("a.jpg", "image/jpg", 101)).is_err());
    }
}
