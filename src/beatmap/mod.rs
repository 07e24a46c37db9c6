// Source beatmap module
// Input hit events, control points, tick generation and loading

pub mod loader;
pub mod ticks;
pub mod types;

pub use loader::{load_beatmap, parse_beatmap, validate_beatmap, BeatmapError, BeatmapResult};
pub use ticks::{
    CancelSignal, SliderEvent, SliderEventGenerator, SliderEventKind, TickGenerator, TickSpan,
};
pub use types::{
    Beatmap, ControlPoints, CurveData, Difficulty, DifficultyPoint, HitEvent, HitEventKind,
    SampleTag, TimingPoint,
};
