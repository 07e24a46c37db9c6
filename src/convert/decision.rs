// Conversion decisions
// Per-event record of how a source event was turned into notes

use serde::{Deserialize, Serialize};

use super::pattern::PatternState;
use super::samples::SampleFlags;
use crate::beatmap::{HitEvent, HitEventKind};
use crate::notes::{Note, NoteKind};

/// What the converter did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    Tap,
    TwinTaps,
    Touch,
    Hold,
    TwinHolds,
    Slide,
    TwinSlides,

    /// Twin slides landed on the same lane and were combined
    MergedSlides,

    /// Slide requested but no path fits the duration
    SlideSkipped,

    TouchHold,

    /// Event produced no notes
    Dropped,
}

impl ConversionOutcome {
    pub fn to_string(&self) -> &'static str {
        match self {
            ConversionOutcome::Tap => "tap",
            ConversionOutcome::TwinTaps => "twin_taps",
            ConversionOutcome::Touch => "touch",
            ConversionOutcome::Hold => "hold",
            ConversionOutcome::TwinHolds => "twin_holds",
            ConversionOutcome::Slide => "slide",
            ConversionOutcome::TwinSlides => "twin_slides",
            ConversionOutcome::MergedSlides => "merged_slides",
            ConversionOutcome::SlideSkipped => "slide_skipped",
            ConversionOutcome::TouchHold => "touch_hold",
            ConversionOutcome::Dropped => "dropped",
        }
    }
}

/// Compact view of a note produced for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedNote {
    pub kind: NoteKind,

    /// Lane index for lane-bound notes
    pub lane: Option<u8>,

    pub start_time: f64,
    pub end_time: Option<f64>,
    pub is_break: bool,
    pub has_twin: bool,
}

impl From<&Note> for AssignedNote {
    fn from(note: &Note) -> Self {
        AssignedNote {
            kind: note.kind(),
            lane: note.lane().map(|l| l.index()),
            start_time: note.start_time(),
            end_time: note.end_time(),
            is_break: note.is_break(),
            has_twin: note.has_twin(),
        }
    }
}

/// Full decision information for a single source event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDecision {
    /// Position of the event in the beatmap
    pub event_index: usize,

    // --- Source ---
    pub start_time: f64,
    pub duration: Option<f64>,
    pub new_combo: bool,
    pub flags: SampleFlags,

    // --- Pattern ---
    /// Pattern state after the event was converted
    pub pattern: PatternState,

    // --- Result ---
    pub outcome: ConversionOutcome,
    pub assigned_notes: Vec<AssignedNote>,

    pub reasoning: String,
}

impl EventDecision {
    /// Build a decision from the converter's view of one event
    pub fn from_conversion(
        event_index: usize,
        event: &HitEvent,
        flags: SampleFlags,
        pattern: &PatternState,
        outcome: ConversionOutcome,
        notes: &[Note],
    ) -> Self {
        let mut reason_parts = Vec::new();

        let shape = match &event.kind {
            HitEventKind::Instant => "instant".to_string(),
            HitEventKind::Curve(curve) => format!(
                "curve ({:.0}ms, {} repeats)",
                curve.duration, curve.repeat_count
            ),
            HitEventKind::Sustained { duration } => format!("sustained ({:.0}ms)", duration),
        };
        reason_parts.push(format!("Source event is {}.", shape));

        let mut triggers = Vec::new();
        if flags.is_break {
            triggers.push("break");
        }
        if flags.slide_trigger {
            triggers.push("slide");
        }
        if flags.twin_trigger {
            triggers.push("twin");
        }
        if flags.touch_trigger {
            triggers.push("touch");
        }
        if !triggers.is_empty() {
            reason_parts.push(format!("Samples request: {}.", triggers.join(", ")));
        }

        if event.new_combo {
            reason_parts.push(format!(
                "New combo reseeded the pattern to {:?} (offset {}, step {}).",
                pattern.pattern, pattern.offset, pattern.offset2
            ));
        }

        let assigned: Vec<AssignedNote> = notes.iter().map(AssignedNote::from).collect();
        match outcome {
            ConversionOutcome::SlideSkipped => {
                reason_parts.push("No slide path fits the duration, slide skipped.".to_string())
            }
            ConversionOutcome::Dropped => {
                reason_parts.push("Too short to convert, no notes emitted.".to_string())
            }
            ConversionOutcome::MergedSlides => reason_parts
                .push("Twin slide shared a lane with the main slide and was merged.".to_string()),
            _ => {}
        }
        if !assigned.is_empty() {
            let summary: Vec<String> = assigned
                .iter()
                .map(|n| match n.lane {
                    Some(lane) => format!("{}@{}", n.kind.to_string(), lane),
                    None => n.kind.to_string().to_string(),
                })
                .collect();
            reason_parts.push(format!("Emitted {}.", summary.join(", ")));
        }

        EventDecision {
            event_index,
            start_time: event.start_time,
            duration: event.duration(),
            new_combo: event.new_combo,
            flags,
            pattern: *pattern,
            outcome,
            assigned_notes: assigned,
            reasoning: reason_parts.join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::SampleTag;
    use crate::convert::pattern::PatternKind;
    use crate::notes::Tap;
    use crate::playfield::Lane;

    #[test]
    fn test_decision_for_twin_taps() {
        let event = HitEvent::instant(120.0, vec![SampleTag::Clap]).with_new_combo();
        let flags = SampleFlags::from_samples(&event.samples, true);
        let state = PatternState {
            pattern: PatternKind::Stream,
            offset: 3,
            offset2: 1,
        };
        let notes = vec![
            Note::Tap(Tap { lane: Lane::normalize(6), start_time: 120.0, is_break: false, has_twin: true }),
            Note::Tap(Tap { lane: Lane::normalize(3), start_time: 120.0, is_break: false, has_twin: true }),
        ];

        let decision =
            EventDecision::from_conversion(4, &event, flags, &state, ConversionOutcome::TwinTaps, &notes);

        assert_eq!(decision.event_index, 4);
        assert_eq!(decision.assigned_notes.len(), 2);
        assert_eq!(decision.assigned_notes[0].lane, Some(6));
        assert!(decision.reasoning.contains("twin"));
        assert!(decision.reasoning.contains("reseeded"));
        assert!(decision.reasoning.contains("tap@6, tap@3"));
    }

    #[test]
    fn test_decision_for_dropped_event() {
        let event = HitEvent::sustained(0.0, 20.0);
        let decision = EventDecision::from_conversion(
            0,
            &event,
            SampleFlags::default(),
            &PatternState::default(),
            ConversionOutcome::Dropped,
            &[],
        );

        assert!(decision.assigned_notes.is_empty());
        assert_eq!(decision.duration, Some(20.0));
        assert!(decision.reasoning.contains("no notes"));
    }

    #[test]
    fn test_decision_serializes() {
        let event = HitEvent::instant(0.0, vec![]);
        let decision = EventDecision::from_conversion(
            0,
            &event,
            SampleFlags::default(),
            &PatternState::default(),
            ConversionOutcome::Tap,
            &[],
        );
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["outcome"], "tap");
        assert_eq!(json["pattern"]["pattern"], "stream");
    }
}
