// src/models/verification.rs
//! Records produced while a certificate is being checked.
//!
//! [`ExtractedFields`] holds what the simulated OCR scan "read" from the
//! certificate, and [`VerificationResult`] is the final verdict shown at the
//! last step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field names produced by the scan, in display order.
pub const FIELD_NAMES: [&str; 6] = [
    "Student Name",
    "Institution",
    "Degree",
    "Year",
    "Grade",
    "Certificate ID",
];

/// Ordered field name -> value pairs read from a certificate.
///
/// Built once per session and never mutated afterwards; there are no
/// setters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    fields: Vec<(String, String)>,
}

impl ExtractedFields {
    /// Builds the record from values given in [`FIELD_NAMES`] order.
    pub fn from_values(values: [&str; 6]) -> Self {
        Self {
            fields: FIELD_NAMES
                .iter()
                .zip(values.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Looks up a value by field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over the fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Final verdict for a session.
///
/// # Fields
/// - `verified`: whether the certificate passed
/// - `authenticity_score`: synthetic confidence, 0-100
/// - `transaction_id`: synthetic ledger reference, e.g. "0x1a2b3c4d"
/// - `verified_at`: when the verdict was produced
/// - `signature_valid`: mirrors `verified`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub verified: bool,
    pub authenticity_score: u8,
    pub transaction_id: String,
    pub verified_at: DateTime<Utc>,
    pub signature_valid: bool,
}

impl VerificationResult {
    /// Headline shown above the score.
    pub fn headline(&self) -> &'static str {
        if self.verified {
            "Certificate Verified"
        } else {
            "Verification Failed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_order() {
        let fields = ExtractedFields::from_values(["a", "b", "c", "d", "e", "f"]);
        let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, FIELD_NAMES.to_vec());
        assert_eq!(fields.get("Grade"), Some("e"));
        assert_eq!(fields.get("Signature"), None);
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_result_serializes_timestamp() {
        let result = VerificationResult {
            verified: false,
            authenticity_score: 42,
            transaction_id: "0x0000beef".to_string(),
            verified_at: Utc::now(),
            signature_valid: false,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["authenticity_score"], 42);
        assert!(json["verified_at"].is_string());
        assert_eq!(result.headline(), "Verification Failed");
    }
}
