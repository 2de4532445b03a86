#![allow(dead_code)]

//! Body-language channel: a synthetic non-verbal score.
//!
//! Stands in for an external perception signal. The engine only sees the
//! `BodyLanguageSource` trait, so a real producer can replace the simulator
//! without touching scoring.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Sub-scores on a 10-point scale at or above this get the positive sentence.
const POSITIVE_THRESHOLD: u8 = 8;

/// Raw sub-scores on a 10-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLanguageReading {
    pub eye_contact: u8,
    pub tone: u8,
    pub pacing: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLanguageDetails {
    pub eye_contact: String,
    pub tone: String,
    pub pacing: String,
}

/// 0–100 channel score plus one sentence per sub-score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLanguageReport {
    pub score: u8,
    pub details: BodyLanguageDetails,
}

impl BodyLanguageReport {
    pub fn from_reading(reading: BodyLanguageReading) -> Self {
        let sum = reading.eye_contact as u32 + reading.tone as u32 + reading.pacing as u32;
        // floor(sum / 3 * 10), in integers.
        let score = (sum * 10 / 3).min(100) as u8;

        let pick = |value: u8, positive: &str, improve: &str| {
            if value >= POSITIVE_THRESHOLD {
                positive.to_string()
            } else {
                improve.to_string()
            }
        };

        BodyLanguageReport {
            score,
            details: BodyLanguageDetails {
                eye_contact: pick(
                    reading.eye_contact,
                    "Good eye contact maintained.",
                    "Try to look at the camera more consistently.",
                ),
                tone: pick(
                    reading.tone,
                    "Confident and clear tone.",
                    "Voice projection could be stronger.",
                ),
                pacing: pick(
                    reading.pacing,
                    "Excellent pacing.",
                    "A bit fast, try to slow down slightly.",
                ),
            },
        }
    }
}

/// Producer of body-language readings. One instance per session.
pub trait BodyLanguageSource: Send {
    fn sample(&mut self) -> BodyLanguageReading;
}

/// Draws each sub-score independently: eye contact and tone in 7..=9,
/// pacing in 6..=9.
pub struct SimulatedBodyLanguage {
    rng: StdRng,
}

impl SimulatedBodyLanguage {
    pub fn from_seed(seed: u64) -> Self {
        SimulatedBodyLanguage {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SimulatedBodyLanguage {
            rng: StdRng::from_entropy(),
        }
    }
}

impl BodyLanguageSource for SimulatedBodyLanguage {
    fn sample(&mut self) -> BodyLanguageReading {
        BodyLanguageReading {
            eye_contact: self.rng.gen_range(7..=9),
            tone: self.rng.gen_range(7..=9),
            pacing: self.rng.gen_range(6..=9),
        }
    }
}

/// Always returns the same reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedBodyLanguage(pub BodyLanguageReading);

impl BodyLanguageSource for FixedBodyLanguage {
    fn sample(&mut self) -> BodyLanguageReading {
        self.0
    }
}
