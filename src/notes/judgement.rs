// Judgement types
// Hit results, judgement kinds and the timing-window evaluator seam

use serde::{Deserialize, Serialize};

/// Outcome of judging a note or nested node
/// Ordered from worst to best within the scoring results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitResult {
    Miss,
    Ok,
    Good,
    Great,
    Perfect,

    /// Non-scoring placeholder was reached
    IgnoreHit,

    /// Non-scoring placeholder was missed
    IgnoreMiss,
}

impl HitResult {
    /// Whether this result contributes to the score
    pub fn is_scorable(&self) -> bool {
        !matches!(self, HitResult::IgnoreHit | HitResult::IgnoreMiss)
    }

    /// Whether this result counts as a hit
    pub fn is_hit(&self) -> bool {
        !matches!(self, HitResult::Miss | HitResult::IgnoreMiss)
    }
}

/// Judgement contract of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgementKind {
    /// Regular scoring judgement
    Standard,

    /// Break note judgement, weighted separately by scoring
    Break,

    /// Placeholder that never affects the score
    Ignore,
}

impl JudgementKind {
    /// Judgement kind for a note with the given break flag
    pub fn for_break(is_break: bool) -> Self {
        if is_break {
            JudgementKind::Break
        } else {
            JudgementKind::Standard
        }
    }

    /// Best result obtainable for this kind
    pub fn max_result(&self) -> HitResult {
        match self {
            JudgementKind::Standard | JudgementKind::Break => HitResult::Perfect,
            JudgementKind::Ignore => HitResult::IgnoreHit,
        }
    }

    /// Worst result obtainable for this kind
    pub fn min_result(&self) -> HitResult {
        match self {
            JudgementKind::Standard | JudgementKind::Break => HitResult::Miss,
            JudgementKind::Ignore => HitResult::IgnoreMiss,
        }
    }
}

/// Timing-window evaluator
/// Maps a signed offset from the target time to a result, or None if the
/// offset is outside every window and the note can still be hit later
pub trait HitWindows {
    fn result_for(&self, time_offset: f64) -> Option<HitResult>;

    /// Latest offset after which the note counts as missed
    fn miss_window(&self) -> f64;
}

/// Half-widths of each timing window in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardHitWindows {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub ok: f64,
    pub miss: f64,
}

impl Default for StandardHitWindows {
    fn default() -> Self {
        StandardHitWindows {
            perfect: 32.0,
            great: 64.0,
            good: 96.0,
            ok: 128.0,
            miss: 160.0,
        }
    }
}

impl HitWindows for StandardHitWindows {
    fn result_for(&self, time_offset: f64) -> Option<HitResult> {
        let offset = time_offset.abs();
        if offset <= self.perfect {
            Some(HitResult::Perfect)
        } else if offset <= self.great {
            Some(HitResult::Great)
        } else if offset <= self.good {
            Some(HitResult::Good)
        } else if offset <= self.ok {
            Some(HitResult::Ok)
        } else if offset <= self.miss {
            Some(HitResult::Miss)
        } else {
            None
        }
    }

    fn miss_window(&self) -> f64 {
        self.miss
    }
}
