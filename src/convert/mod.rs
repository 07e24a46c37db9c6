// Conversion module
// Sample classification, lane patterns, slide paths and the event converter

pub mod config;
pub mod converter;
pub mod decision;
pub mod pattern;
pub mod samples;
pub mod slide_paths;

pub use config::{ConfigError, ConfigResult, ConversionConfig, ConversionExperiments};
pub use converter::{combine_slides, BeatmapConverter, ConvertedNotes};
pub use decision::{AssignedNote, ConversionOutcome, EventDecision};
pub use pattern::{derive_seed, PatternGenerator, PatternKind, PatternRng, PatternState, SeededRng};
pub use samples::{classify_event, SampleFlags};
pub use slide_paths::{select_path, valid_paths, SlidePathEntry, SlideShape, SLIDE_PATHS};
