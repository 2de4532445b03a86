//! Score aggregation and the relevance gate.
//!
//! total = floor(star_sum × 4 + quality_sum / 15 × 40)
//!
//! On `Mismatch` the STAR sum is zeroed before the formula and the total is
//! capped at `MISMATCH_TOTAL_CAP`.

use serde::{Deserialize, Serialize};

use crate::grading::quality::QualityScores;
use crate::grading::relevance::RelevanceVerdict;
use crate::grading::star::StarScores;

pub const STAR_WEIGHT: u32 = 4;
pub const QUALITY_POINTS: u32 = 40;
pub const QUALITY_SUM_MAX: u32 = 15;
pub const MISMATCH_TOTAL_CAP: u8 = 30;

/// Every dimension score for one answer, after the relevance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub situation: u8,
    pub task: u8,
    pub action: u8,
    pub result: u8,
    pub reflection: u8,
    pub clarity: u8,
    pub structure: u8,
    pub completeness: u8,
    pub total: u8,
    pub body_language: u8,
}

impl ScoreBundle {
    /// Applies the relevance gate and computes the total.
    pub fn assemble(
        star: StarScores,
        quality: QualityScores,
        verdict: RelevanceVerdict,
        body_language: u8,
    ) -> Self {
        let star = gate_star(star, verdict);
        ScoreBundle {
            situation: star.situation,
            task: star.task,
            action: star.action,
            result: star.result,
            reflection: star.reflection,
            clarity: quality.clarity,
            structure: quality.structure,
            completeness: quality.completeness,
            total: compute_total(star.sum(), quality.sum(), verdict),
            body_language,
        }
    }
}

#[cfg(test)]
impl ScoreBundle {
    pub fn star(&self) -> StarScores {
        StarScores {
            situation: self.situation,
            task: self.task,
            action: self.action,
            result: self.result,
            reflection: self.reflection,
        }
    }

    pub fn quality(&self) -> QualityScores {
        QualityScores {
            clarity: self.clarity,
            structure: self.structure,
            completeness: self.completeness,
        }
    }
}

fn gate_star(star: StarScores, verdict: RelevanceVerdict) -> StarScores {
    match verdict {
        RelevanceVerdict::Mismatch => StarScores::default(),
        RelevanceVerdict::Strong | RelevanceVerdict::Neutral => star,
    }
}

/// `floor(a + b)` with integer `a` equals `a + floor(b)`, so the formula is
/// evaluated in integers.
pub fn compute_total(star_sum: u32, quality_sum: u32, verdict: RelevanceVerdict) -> u8 {
    let star_sum = match verdict {
        RelevanceVerdict::Mismatch => 0,
        RelevanceVerdict::Strong | RelevanceVerdict::Neutral => star_sum,
    };
    let raw = star_sum * STAR_WEIGHT + quality_sum * QUALITY_POINTS / QUALITY_SUM_MAX;
    let total = raw.min(100) as u8;

    match verdict {
        RelevanceVerdict::Mismatch => total.min(MISMATCH_TOTAL_CAP),
        RelevanceVerdict::Strong | RelevanceVerdict::Neutral => total,
    }
}
