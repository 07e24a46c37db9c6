// Touch hold judging
// Progressive hold: the grade depends on the share of the duration spent holding

use super::judgement::HitResult;
use super::types::TouchHold;

/// Ratio thresholds, best grade first
const HOLD_THRESHOLDS: [(f64, HitResult); 4] = [
    (0.90, HitResult::Perfect),
    (0.75, HitResult::Great),
    (0.50, HitResult::Good),
    (0.25, HitResult::Ok),
];

/// Grade for a held ratio
/// Below the lowest threshold the hold is only a miss once past its end time
pub fn grade_for_ratio(ratio: f64, past_end: bool) -> Option<HitResult> {
    HOLD_THRESHOLDS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, result)| *result)
        .or(if past_end { Some(HitResult::Miss) } else { None })
}

/// Judging state for a single touch hold
#[derive(Debug, Clone)]
pub struct TouchHoldJudgement {
    start_time: f64,
    end_time: f64,
    time_held: f64,
    last_update: Option<f64>,
    activated: bool,
    result: Option<HitResult>,
}

impl TouchHoldJudgement {
    pub fn new(note: &TouchHold) -> Self {
        TouchHoldJudgement {
            start_time: note.start_time,
            end_time: note.end_time,
            time_held: 0.0,
            last_update: None,
            activated: false,
            result: None,
        }
    }

    /// Advance to `current_time` with the given activation state
    /// Time counts as held only while activated inside [start, end]
    pub fn update(&mut self, current_time: f64, activated: bool) {
        if self.result.is_none() {
            if let Some(previous) = self.last_update {
                if self.activated {
                    let from = previous.max(self.start_time);
                    let to = current_time.min(self.end_time);
                    if to > from {
                        self.time_held += to - from;
                    }
                }
            }
        }

        self.last_update = Some(current_time);
        self.activated = activated
            && current_time >= self.start_time
            && current_time <= self.end_time;
    }

    /// Resolve the hold once its end time has passed
    pub fn check_result(&mut self, current_time: f64) -> Option<HitResult> {
        if self.result.is_some() || current_time < self.end_time {
            return self.result;
        }

        let ratio = self.held_ratio();
        self.result = grade_for_ratio(ratio, true);
        log::debug!(
            "Touch hold at {}ms resolved with ratio {:.3} -> {:?}",
            self.start_time,
            ratio,
            self.result
        );
        self.result
    }

    /// Grade the hold would currently receive, for in-progress feedback
    pub fn provisional_grade(&self) -> Option<HitResult> {
        grade_for_ratio(self.held_ratio(), false)
    }

    /// Share of the duration held so far
    pub fn held_ratio(&self) -> f64 {
        let duration = self.end_time - self.start_time;
        if duration <= 0.0 {
            return 1.0;
        }
        self.time_held / duration
    }

    pub fn time_held(&self) -> f64 {
        self.time_held
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn result(&self) -> Option<HitResult> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold() -> TouchHold {
        TouchHold { start_time: 1000.0, end_time: 2000.0 }
    }

    #[test]
    fn test_grade_for_ratio_scenarios() {
        assert_eq!(grade_for_ratio(0.95, true), Some(HitResult::Perfect));
        assert_eq!(grade_for_ratio(0.80, true), Some(HitResult::Great));
        assert_eq!(grade_for_ratio(0.60, true), Some(HitResult::Good));
        assert_eq!(grade_for_ratio(0.30, true), Some(HitResult::Ok));
        assert_eq!(grade_for_ratio(0.10, true), Some(HitResult::Miss));
    }

    #[test]
    fn test_grade_for_ratio_exact_boundaries() {
        assert_eq!(grade_for_ratio(0.90, true), Some(HitResult::Perfect));
        assert_eq!(grade_for_ratio(0.75, true), Some(HitResult::Great));
        assert_eq!(grade_for_ratio(0.50, true), Some(HitResult::Good));
        assert_eq!(grade_for_ratio(0.25, true), Some(HitResult::Ok));
    }

    #[test]
    fn test_low_ratio_before_end_has_no_result() {
        assert_eq!(grade_for_ratio(0.10, false), None);
        assert_eq!(grade_for_ratio(0.60, false), Some(HitResult::Good));
    }

    #[test]
    fn test_fully_held() {
        let mut judge = TouchHoldJudgement::new(&hold());
        let mut time = 900.0;
        while time <= 2100.0 {
            judge.update(time, true);
            time += 10.0;
        }
        assert!((judge.held_ratio() - 1.0).abs() < 1e-9);
        assert_eq!(judge.check_result(2100.0), Some(HitResult::Perfect));
    }

    #[test]
    fn test_partial_hold() {
        let mut judge = TouchHoldJudgement::new(&hold());
        judge.update(1000.0, true);
        judge.update(1600.0, false); // held 600ms
        judge.update(2000.0, false);

        assert!((judge.time_held() - 600.0).abs() < 1e-9);
        assert_eq!(judge.provisional_grade(), Some(HitResult::Good));
        assert_eq!(judge.check_result(2000.0), Some(HitResult::Good));
    }

    #[test]
    fn test_no_result_before_end() {
        let mut judge = TouchHoldJudgement::new(&hold());
        judge.update(1000.0, true);
        judge.update(1950.0, true);
        assert_eq!(judge.check_result(1950.0), None);
        assert_eq!(judge.provisional_grade(), Some(HitResult::Perfect));
    }

    #[test]
    fn test_never_held_is_miss_after_end() {
        let mut judge = TouchHoldJudgement::new(&hold());
        judge.update(1500.0, false);
        assert_eq!(judge.check_result(2001.0), Some(HitResult::Miss));
    }

    #[test]
    fn test_activation_outside_window_is_ignored() {
        let mut judge = TouchHoldJudgement::new(&hold());
        judge.update(500.0, true);
        assert!(!judge.is_activated());
        judge.update(2500.0, true);
        assert_eq!(judge.time_held(), 0.0);
    }

    #[test]
    fn test_result_is_sticky() {
        let mut judge = TouchHoldJudgement::new(&hold());
        assert_eq!(judge.check_result(2000.0), Some(HitResult::Miss));
        judge.update(2000.0, true);
        assert_eq!(judge.check_result(3000.0), Some(HitResult::Miss));
        assert_eq!(judge.result(), Some(HitResult::Miss));
    }
}
