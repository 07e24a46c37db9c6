// Slider event generation
// Produces head/tick/repeat/tail timestamps along a curved event

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Longest path length considered for tick placement
const MAX_PATH_LENGTH: f64 = 100_000.0;

/// Shared cancellation flag for long-running generation
/// Cloning shares the same underlying flag
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a new, uncancelled signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Kind of a generated slider event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderEventKind {
    Head,
    Tick,
    Repeat,
    LegacyLastTick,
    Tail,
}

/// A timestamp along a curved event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderEvent {
    pub time: f64,
    pub kind: SliderEventKind,
}

/// Parameters for one generation request
#[derive(Debug, Clone, PartialEq)]
pub struct TickSpan {
    pub start_time: f64,
    pub span_duration: f64,

    /// Path units per millisecond
    pub velocity: f64,

    /// Path units between ticks
    pub tick_distance: f64,

    pub path_length: f64,
    pub span_count: u32,
    pub legacy_last_tick_offset: f64,
}

/// Producer of intermediate timestamps for a curved event
/// Implementations must stop early once `cancel` is set, returning what was produced so far
pub trait TickGenerator {
    fn generate(&self, span: &TickSpan, cancel: &CancelSignal) -> Vec<SliderEvent>;
}

/// Default generator following the standard slider tick layout
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderEventGenerator;

impl TickGenerator for SliderEventGenerator {
    fn generate(&self, span: &TickSpan, cancel: &CancelSignal) -> Vec<SliderEvent> {
        let mut events = Vec::new();

        // Degenerate paths only get the head and tail structure
        let length = span.path_length.min(MAX_PATH_LENGTH);
        let tick_distance = if length > 0.0 {
            span.tick_distance.clamp(0.0, length)
        } else {
            0.0
        };
        let min_distance_from_end = span.velocity * 10.0;

        events.push(SliderEvent {
            time: span.start_time,
            kind: SliderEventKind::Head,
        });

        if tick_distance > 0.0 {
            for span_index in 0..span.span_count {
                if cancel.is_cancelled() {
                    return events;
                }

                let span_start_time = span.start_time + span_index as f64 * span.span_duration;
                let reversed = span_index % 2 == 1;

                let mut ticks = Vec::new();
                let mut distance = tick_distance;
                while distance <= length {
                    if cancel.is_cancelled() {
                        events.extend(ordered(ticks, reversed));
                        return events;
                    }
                    if distance >= length - min_distance_from_end {
                        break;
                    }

                    let path_progress = distance / length;
                    let time_progress = if reversed { 1.0 - path_progress } else { path_progress };

                    ticks.push(SliderEvent {
                        time: span_start_time + time_progress * span.span_duration,
                        kind: SliderEventKind::Tick,
                    });
                    distance += tick_distance;
                }
                events.extend(ordered(ticks, reversed));

                if span_index + 1 < span.span_count {
                    events.push(SliderEvent {
                        time: span_start_time + span.span_duration,
                        kind: SliderEventKind::Repeat,
                    });
                }
            }
        }

        let span_count = span.span_count.max(1);
        let total_duration = span_count as f64 * span.span_duration;
        let final_span_start = span.start_time + (span_count - 1) as f64 * span.span_duration;
        let legacy_last_tick = (span.start_time + total_duration / 2.0)
            .max(final_span_start + span.span_duration - span.legacy_last_tick_offset);

        events.push(SliderEvent {
            time: legacy_last_tick,
            kind: SliderEventKind::LegacyLastTick,
        });
        events.push(SliderEvent {
            time: span.start_time + total_duration,
            kind: SliderEventKind::Tail,
        });

        events
    }
}

/// Reversed spans emit ticks back-to-front in time order
fn ordered(mut ticks: Vec<SliderEvent>, reversed: bool) -> Vec<SliderEvent> {
    if reversed {
        ticks.reverse();
    }
    ticks
}
