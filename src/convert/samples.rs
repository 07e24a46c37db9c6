// Sample classification
// Maps the sample tags on a hit event to conversion flags

use serde::{Deserialize, Serialize};

use crate::beatmap::{HitEvent, HitEventKind, SampleTag};

/// Conversion flags derived from an event's samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFlags {
    /// FINISH - the note is a break
    pub is_break: bool,

    /// WHISTLE on a curve - the curve becomes a slide
    pub slide_trigger: bool,

    /// CLAP - a twin note accompanies the primary note
    pub twin_trigger: bool,

    /// WHISTLE on an instant event - the event may become a touch
    pub touch_trigger: bool,
}

impl SampleFlags {
    /// Classify a flat sample set
    pub fn from_samples(samples: &[SampleTag], instant: bool) -> Self {
        let has = |tag: SampleTag| samples.contains(&tag);
        SampleFlags {
            is_break: has(SampleTag::Finish),
            slide_trigger: has(SampleTag::Whistle),
            twin_trigger: has(SampleTag::Clap),
            touch_trigger: instant && has(SampleTag::Whistle),
        }
    }

    /// Classify per-node sample sets; a tag on any node counts
    pub fn from_node_samples(node_samples: &[Vec<SampleTag>]) -> Self {
        let has = |tag: SampleTag| node_samples.iter().any(|samples| samples.contains(&tag));
        SampleFlags {
            is_break: has(SampleTag::Finish),
            slide_trigger: has(SampleTag::Whistle),
            twin_trigger: has(SampleTag::Clap),
            touch_trigger: false,
        }
    }
}

/// Classify an event, using node samples for curves and direct samples otherwise
pub fn classify_event(event: &HitEvent) -> SampleFlags {
    match &event.kind {
        HitEventKind::Curve(curve) => SampleFlags::from_node_samples(&curve.node_samples),
        HitEventKind::Sustained { .. } => SampleFlags::from_samples(&event.samples, false),
        HitEventKind::Instant => SampleFlags::from_samples(&event.samples, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::CurveData;

    #[test]
    fn test_instant_flags() {
        let event = HitEvent::instant(0.0, vec![SampleTag::Whistle, SampleTag::Clap]);
        let flags = classify_event(&event);
        assert!(flags.slide_trigger);
        assert!(flags.touch_trigger);
        assert!(flags.twin_trigger);
        assert!(!flags.is_break);
    }

    #[test]
    fn test_break_and_twin_are_independent() {
        let flags = SampleFlags::from_samples(&[SampleTag::Finish, SampleTag::Clap], true);
        assert!(flags.is_break);
        assert!(flags.twin_trigger);
    }

    #[test]
    fn test_curve_aggregates_node_samples() {
        let event = HitEvent::curve(
            0.0,
            CurveData {
                duration: 500.0,
                repeat_count: 1,
                path_distance: 100.0,
                node_samples: vec![vec![SampleTag::Normal], vec![SampleTag::Whistle], vec![SampleTag::Finish]],
                legacy_last_tick_offset: None,
            },
        );
        let flags = classify_event(&event);
        assert!(flags.slide_trigger);
        assert!(flags.is_break);
        assert!(!flags.twin_trigger);
        // Curves never become touches
        assert!(!flags.touch_trigger);
    }

    #[test]
    fn test_curve_ignores_direct_samples() {
        let mut event = HitEvent::curve(
            0.0,
            CurveData {
                duration: 500.0,
                repeat_count: 0,
                path_distance: 100.0,
                node_samples: vec![vec![], vec![]],
                legacy_last_tick_offset: None,
            },
        );
        event.samples = vec![SampleTag::Whistle];
        assert_eq!(classify_event(&event), SampleFlags::default());
    }

    #[test]
    fn test_sustained_is_not_touch() {
        let mut event = HitEvent::sustained(0.0, 300.0);
        event.samples = vec![SampleTag::Whistle];
        assert!(!classify_event(&event).touch_trigger);
    }
}
