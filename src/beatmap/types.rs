// Source beatmap types
// Hit events, sample tags, difficulty settings and control point lookups

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Beat length used when a beatmap has no timing points (60 BPM)
pub const DEFAULT_BEAT_LENGTH: f64 = 1000.0;

/// Sample tags attached to a hit event
/// The tag set drives note classification during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleTag {
    /// Default hit sound, carries no meaning for conversion
    Normal,

    /// Whistle - triggers slides on curved events and touches on instant events
    Whistle,

    /// Finish - marks a break note
    Finish,

    /// Clap - triggers twin notes
    Clap,
}

impl SampleTag {
    /// Convert from string representation
    /// Accepts both the short names and the "hit" prefixed bank names
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "whistle" | "hitwhistle" => SampleTag::Whistle,
            "finish" | "hitfinish" => SampleTag::Finish,
            "clap" | "hitclap" => SampleTag::Clap,
            _ => SampleTag::Normal, // Default fallback
        }
    }

    /// Convert to string representation
    pub fn to_string(&self) -> &'static str {
        match self {
            SampleTag::Normal => "normal",
            SampleTag::Whistle => "whistle",
            SampleTag::Finish => "finish",
            SampleTag::Clap => "clap",
        }
    }
}

/// Curved (slider-like) event data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    /// Total duration across all spans in milliseconds
    pub duration: f64,

    /// Number of times the path is reversed (0 = single span)
    #[serde(default)]
    pub repeat_count: u32,

    /// Length of the path in osu!pixels
    pub path_distance: f64,

    /// Samples played at each node (head, repeats, tail)
    #[serde(default)]
    pub node_samples: Vec<Vec<SampleTag>>,

    /// Offset of the legacy last tick from the end of the curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_last_tick_offset: Option<f64>,
}

impl CurveData {
    /// Number of spans travelled (repeats + 1)
    pub fn span_count(&self) -> u32 {
        self.repeat_count.saturating_add(1)
    }

    /// Duration of a single span
    pub fn span_duration(&self) -> f64 {
        self.duration / self.span_count() as f64
    }
}

/// Shape of a source hit event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HitEventKind {
    /// Duration-bearing event with a path and repeat structure (slider)
    Curve(CurveData),

    /// Duration-bearing event without a path (spinner / hold)
    Sustained {
        /// Duration in milliseconds
        duration: f64,
    },

    /// Instantaneous hit (circle); unrecognised shapes land here too
    #[serde(other)]
    Instant,
}

/// A timed hit event from the source beatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Start time in milliseconds
    pub start_time: f64,

    /// Event shape and shape-specific data
    #[serde(flatten)]
    pub kind: HitEventKind,

    /// Position on the source playfield, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,

    /// Samples attached directly to the event
    #[serde(default)]
    pub samples: Vec<SampleTag>,

    /// Whether this event starts a new combo
    #[serde(default)]
    pub new_combo: bool,
}

impl HitEvent {
    /// Create an instant event with the given samples
    pub fn instant(start_time: f64, samples: Vec<SampleTag>) -> Self {
        HitEvent {
            start_time,
            kind: HitEventKind::Instant,
            position: None,
            samples,
            new_combo: false,
        }
    }

    /// Create a curved event; direct samples mirror the head node
    pub fn curve(start_time: f64, curve: CurveData) -> Self {
        let samples = curve.node_samples.first().cloned().unwrap_or_default();
        HitEvent {
            start_time,
            kind: HitEventKind::Curve(curve),
            position: None,
            samples,
            new_combo: false,
        }
    }

    /// Create a sustained event without a path
    pub fn sustained(start_time: f64, duration: f64) -> Self {
        HitEvent {
            start_time,
            kind: HitEventKind::Sustained { duration },
            position: None,
            samples: Vec::new(),
            new_combo: false,
        }
    }

    /// Mark this event as a combo start
    pub fn with_new_combo(mut self) -> Self {
        self.new_combo = true;
        self
    }

    /// Duration of the event, if it has one
    pub fn duration(&self) -> Option<f64> {
        match &self.kind {
            HitEventKind::Instant => None,
            HitEventKind::Curve(curve) => Some(curve.duration),
            HitEventKind::Sustained { duration } => Some(*duration),
        }
    }

    /// End time (start time for instant events)
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration().unwrap_or(0.0)
    }
}

/// Difficulty settings of the source beatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    pub drain_rate: f32,
    pub circle_size: f32,
    pub overall_difficulty: f32,
    pub approach_rate: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty {
            drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}

/// Uninherited timing point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    pub time: f64,

    /// Milliseconds per beat
    pub beat_length: f64,
}

/// Inherited (velocity) control point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPoint {
    pub time: f64,

    /// Slider velocity multiplier
    pub speed_multiplier: f64,
}

/// Timing and velocity control points, both sorted by time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    #[serde(default)]
    pub timing: Vec<TimingPoint>,

    #[serde(default)]
    pub difficulty: Vec<DifficultyPoint>,
}

impl ControlPoints {
    /// Beat length in effect at `time`
    pub fn beat_length_at(&self, time: f64) -> f64 {
        point_at(&self.timing, time, |p| p.time)
            .map(|p| p.beat_length)
            .unwrap_or(DEFAULT_BEAT_LENGTH)
    }

    /// Speed multiplier in effect at `time`
    /// Before the first difficulty point the multiplier is 1.0
    pub fn speed_multiplier_at(&self, time: f64) -> f64 {
        point_before(&self.difficulty, time, |p| p.time)
            .map(|p| p.speed_multiplier)
            .unwrap_or(1.0)
    }
}

/// Last point at or before `time`, falling back to the first point
fn point_at<T>(points: &[T], time: f64, time_of: impl Fn(&T) -> f64) -> Option<&T> {
    point_before(points, time, time_of).or_else(|| points.first())
}

/// Last point at or before `time`
fn point_before<T>(points: &[T], time: f64, time_of: impl Fn(&T) -> f64) -> Option<&T> {
    let idx = points.partition_point(|p| time_of(p) <= time);
    idx.checked_sub(1).and_then(|i| points.get(i))
}

/// A complete source beatmap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub control_points: ControlPoints,

    pub hit_events: Vec<HitEvent>,
}
