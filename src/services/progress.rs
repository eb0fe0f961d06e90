// src/services/progress.rs
//! Simulated OCR scan progress.
//!
//! A [`ProgressSimulator`] is single use: [`ProgressSimulator::start`]
//! consumes it and returns a [`ProgressTicks`] cursor. Each tick adds a
//! uniform increment in `[0, max_increment]` to the running total, clamped
//! to 100, and the cursor is exhausted right after the first 100.

use crate::utils::random::RandomSource;

/// Upper bound of a single tick's increment.
pub const DEFAULT_MAX_INCREMENT: u8 = 15;

pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy)]
pub struct ProgressSimulator {
    max_increment: u8,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self {
            max_increment: DEFAULT_MAX_INCREMENT,
        }
    }

    /// Starts the scan. The simulator is consumed, so a new one is needed
    /// for every scan.
    pub fn start(self) -> ProgressTicks {
        ProgressTicks {
            max_increment: self.max_increment,
            total: 0,
            finished: false,
            ticks: 0,
        }
    }
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over a running scan.
///
/// The cursor keeps no random source of its own; each tick borrows one,
/// which lets the controller pace ticks with its scheduler while sharing a
/// single source with the outcome generator.
#[derive(Debug, Clone)]
pub struct ProgressTicks {
    max_increment: u8,
    total: u8,
    finished: bool,
    ticks: u32,
}

impl ProgressTicks {
    /// Produces the next progress value, or `None` once 100 was reported.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Option<u8> {
        if self.finished {
            return None;
        }
        let increment = rng.next_in_range(0, u32::from(self.max_increment) + 1);
        let total = (u32::from(self.total) + increment).min(u32::from(COMPLETE));
        self.total = total as u8;
        self.ticks += 1;
        if self.total == COMPLETE {
            self.finished = true;
        }
        Some(self.total)
    }

    /// Lazy iterator over the remaining ticks.
    pub fn iter<'a>(&'a mut self, rng: &'a mut dyn RandomSource) -> impl Iterator<Item = u8> + 'a {
        std::iter::from_fn(move || self.tick(rng))
    }

    /// Last reported value.
    pub fn current(&self) -> u8 {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Number of ticks produced so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::{ScriptedRandom, SystemRandom};

    #[test]
    fn test_sequence_is_monotonic_and_ends_at_100() {
        for seed in 0..200 {
            let mut rng = SystemRandom::seeded(seed);
            let mut ticks = ProgressSimulator::new().start();
            let values: Vec<u8> = ticks.iter(&mut rng).collect();

            assert!(values.windows(2).all(|w| w[0] <= w[1]), "seed {seed}");
            assert!(values.iter().all(|v| *v <= COMPLETE));
            assert_eq!(values.last(), Some(&COMPLETE));
            assert_eq!(values.iter().filter(|v| **v == COMPLETE).count(), 1);
            assert!(ticks.is_complete());
        }
    }

    #[test]
    fn test_exhausted_after_completion() {
        let mut rng = ScriptedRandom::new(vec![1.0]);
        let mut ticks = ProgressSimulator::new().start();
        let values: Vec<u8> = ticks.iter(&mut rng).collect();
        // 15 per tick: 15, 30, ... 90, then clamped 100
        assert_eq!(values, vec![15, 30, 45, 60, 75, 90, 100]);
        assert_eq!(ticks.tick(&mut rng), None);
        assert_eq!(ticks.ticks(), 7);
    }

    #[test]
    fn test_zero_draws_stall_without_completing() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let mut ticks = ProgressSimulator::new().start();
        for _ in 0..10 {
            assert_eq!(ticks.tick(&mut rng), Some(0));
        }
        assert!(!ticks.is_complete());
    }

    #[test]
    fn test_tick_count_is_bounded_in_practice() {
        let mut rng = SystemRandom::seeded(99);
        let total: u32 = (0..500)
            .map(|_| {
                let mut ticks = ProgressSimulator::new().start();
                ticks.iter(&mut rng).count() as u32
            })
            .sum();
        let mean = total as f64 / 500.0;
        assert!(mean > 10.0 && mean < 20.0, "mean ticks {mean}");
    }
}
