// src/services/outcome.rs
//! Verdict generation.
//!
//! There is no real check behind the verdict: the outcome is drawn with an
//! 80% prior of "verified" and the authenticity score is drawn from a range
//! that depends on the outcome.

use crate::models::verification::VerificationResult;
use crate::utils::random::RandomSource;
use chrono::Utc;
use std::ops::Range;

/// Draws at or above this value produce a verified outcome.
pub const FRAUD_THRESHOLD: f64 = 0.2;

/// Score range for verified certificates (upper bound exclusive).
pub const VERIFIED_SCORES: Range<u32> = 85..100;

/// Score range for failed certificates (upper bound exclusive).
pub const FAILED_SCORES: Range<u32> = 20..60;

/// Produces [`VerificationResult`]s from a random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeGenerator;

impl OutcomeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draws a verdict. Consumes three values from `rng`: outcome, score,
    /// transaction id.
    pub fn generate(&self, rng: &mut dyn RandomSource) -> VerificationResult {
        let verified = rng.next_unit() >= FRAUD_THRESHOLD;
        let scores = if verified { VERIFIED_SCORES } else { FAILED_SCORES };
        let authenticity_score = rng.next_in_range(scores.start, scores.end) as u8;
        let transaction_id = format!("0x{:08x}", rng.next_in_range(0, u32::MAX));

        VerificationResult {
            verified,
            authenticity_score,
            transaction_id,
            verified_at: Utc::now(),
            signature_valid: verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::{ScriptedRandom, SystemRandom};

    #[test]
    fn test_verified_rate_near_eighty_percent() {
        let generator = OutcomeGenerator::new();
        let mut rng = SystemRandom::seeded(2024);
        let runs = 10_000;
        let mut verified = 0;

        for _ in 0..runs {
            let result = generator.generate(&mut rng);
            let score = u32::from(result.authenticity_score);
            if result.verified {
                verified += 1;
                assert!(VERIFIED_SCORES.contains(&score), "verified score {score}");
            } else {
                assert!(FAILED_SCORES.contains(&score), "failed score {score}");
            }
            assert_eq!(result.signature_valid, result.verified);
        }

        let rate = verified as f64 / runs as f64;
        assert!((0.75..=0.85).contains(&rate), "verified rate {rate}");
    }

    #[test]
    fn test_threshold_boundary() {
        let generator = OutcomeGenerator::new();

        let mut at = ScriptedRandom::new(vec![0.2, 0.0, 0.0]);
        let result = generator.generate(&mut at);
        assert!(result.verified);
        assert_eq!(result.authenticity_score, 85);

        let mut below = ScriptedRandom::new(vec![0.19, 1.0, 0.0]);
        let result = generator.generate(&mut below);
        assert!(!result.verified);
        assert_eq!(result.authenticity_score, 59);
        assert!(!result.signature_valid);
    }

    #[test]
    fn test_transaction_id_format() {
        let generator = OutcomeGenerator::new();
        let mut rng = ScriptedRandom::new(vec![0.9, 0.5, 0.0]);
        let result = generator.generate(&mut rng);
        assert_eq!(result.transaction_id, "0x00000000");

        let mut rng = SystemRandom::seeded(3);
        for _ in 0..100 {
            let id = generator.generate(&mut rng).transaction_id;
            assert_eq!(id.len(), 10);
            assert!(id.starts_with("0x"));
            assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
