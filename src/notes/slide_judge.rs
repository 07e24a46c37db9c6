// Slide judging
// Aggregates nested node results into the slide's own result

use super::judgement::{HitResult, HitWindows, JudgementKind};
use super::types::{Slide, SlideNodeKind};

/// Per-slide judging state
/// Holds one slot per nested node; the slide resolves once every slot is filled
#[derive(Debug, Clone)]
pub struct SlideJudgement {
    kind: JudgementKind,
    end_time: f64,
    node_kinds: Vec<SlideNodeKind>,
    node_results: Vec<Option<HitResult>>,
    result: Option<HitResult>,
}

impl SlideJudgement {
    /// Create judging state for a slide with no resolved nodes
    pub fn new(slide: &Slide) -> Self {
        SlideJudgement {
            kind: JudgementKind::for_break(slide.is_break),
            end_time: slide.end_time,
            node_kinds: slide.nodes.iter().map(|n| n.kind).collect(),
            node_results: vec![None; slide.nodes.len()],
            result: None,
        }
    }

    /// Record a node outcome and report whether the slide is now resolvable
    /// Intermediate nodes only accept ignore results; the tail only accepts scoring results
    pub fn resolve_node(&mut self, index: usize, result: HitResult) -> bool {
        let Some(kind) = self.node_kinds.get(index) else {
            log::warn!("Slide node {} does not exist", index);
            return self.is_resolvable();
        };

        let accepted = match kind {
            SlideNodeKind::Node => !result.is_scorable(),
            SlideNodeKind::Tail => result.is_scorable(),
        };
        if !accepted {
            log::warn!("Rejected {:?} for slide node {} ({:?})", result, index, kind);
            return self.is_resolvable();
        }

        self.node_results[index] = Some(result);
        self.is_resolvable()
    }

    /// Mark an intermediate node as passed
    pub fn pass_node(&mut self, index: usize) -> bool {
        self.resolve_node(index, HitResult::IgnoreHit)
    }

    /// Judge the tail at `current_time` against timing windows
    /// Only a late offset past the miss window records a Miss; early or in-window
    /// Miss-grade offsets leave the tail waiting. Returns whether the slide is now resolvable
    pub fn judge_tail(&mut self, current_time: f64, windows: &dyn HitWindows) -> bool {
        let Some(tail_index) = self.node_kinds.len().checked_sub(1) else {
            return self.is_resolvable();
        };
        if self.node_results[tail_index].is_some() {
            return self.is_resolvable();
        }

        let offset = current_time - self.end_time;
        let result = if offset > windows.miss_window() {
            Some(HitResult::Miss)
        } else {
            windows.result_for(offset).filter(HitResult::is_hit)
        };

        match result {
            Some(result) => self.resolve_node(tail_index, result),
            None => false,
        }
    }

    /// Undo a node outcome, e.g. when rewinding; the slide result is reverted too
    pub fn revert_node(&mut self, index: usize) {
        if let Some(slot) = self.node_results.get_mut(index) {
            *slot = None;
            self.result = None;
        }
    }

    /// Whether every nested node has a result
    pub fn is_resolvable(&self) -> bool {
        self.node_results.iter().all(Option::is_some)
    }

    /// Apply the slide's own result if all nodes are resolved
    /// The slide always takes the best result of its judgement kind
    pub fn check_result(&mut self) -> Option<HitResult> {
        if self.result.is_none() && self.is_resolvable() {
            self.result = Some(self.kind.max_result());
        }
        self.result
    }

    /// Current slide result, if resolved
    pub fn result(&self) -> Option<HitResult> {
        self.result
    }

    /// Result of the tail node, if judged
    pub fn tail_result(&self) -> Option<HitResult> {
        self.node_results.last().copied().flatten()
    }

    pub fn judgement_kind(&self) -> JudgementKind {
        self.kind
    }
}
