// Beatmap loading
// Reads a JSON beatmap from disk and validates event ordering

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::types::{Beatmap, HitEventKind};

/// Most reversals a curved event may have
pub const MAX_REPEAT_COUNT: u32 = 10_000;

/// Errors that can occur while loading a beatmap
#[derive(Debug, Error)]
pub enum BeatmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid beatmap JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hit event {index} at {time}ms starts before the previous event")]
    UnorderedEvents { index: usize, time: f64 },

    #[error("Hit event {index} has a negative duration ({duration}ms)")]
    NegativeDuration { index: usize, duration: f64 },

    #[error("Hit event {index} has a negative path distance ({distance})")]
    NegativePathDistance { index: usize, distance: f64 },

    #[error("Hit event {index} repeats {repeats} times (limit {})", MAX_REPEAT_COUNT)]
    TooManyRepeats { index: usize, repeats: u32 },
}

pub type BeatmapResult<T> = Result<T, BeatmapError>;

/// Load and validate a beatmap from a JSON file
pub fn load_beatmap(path: &Path) -> BeatmapResult<Beatmap> {
    let contents = fs::read_to_string(path)?;
    let beatmap = parse_beatmap(&contents)?;
    log::info!(
        "Loaded beatmap {} with {} hit events",
        path.display(),
        beatmap.hit_events.len()
    );
    Ok(beatmap)
}

/// Parse and validate a beatmap from a JSON string
pub fn parse_beatmap(json: &str) -> BeatmapResult<Beatmap> {
    let beatmap: Beatmap = serde_json::from_str(json)?;
    validate_beatmap(&beatmap)?;
    Ok(beatmap)
}

/// Check event ordering and per-event ranges (durations, path distances, repeats)
pub fn validate_beatmap(beatmap: &Beatmap) -> BeatmapResult<()> {
    let mut previous = f64::NEG_INFINITY;

    for (index, event) in beatmap.hit_events.iter().enumerate() {
        if event.start_time < previous {
            return Err(BeatmapError::UnorderedEvents {
                index,
                time: event.start_time,
            });
        }
        previous = event.start_time;

        if let Some(duration) = event.duration() {
            if duration < 0.0 {
                return Err(BeatmapError::NegativeDuration { index, duration });
            }
        }

        if let HitEventKind::Curve(curve) = &event.kind {
            if curve.path_distance < 0.0 {
                return Err(BeatmapError::NegativePathDistance {
                    index,
                    distance: curve.path_distance,
                });
            }
            if curve.repeat_count > MAX_REPEAT_COUNT {
                return Err(BeatmapError::TooManyRepeats {
                    index,
                    repeats: curve.repeat_count,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::types::HitEvent;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BEATMAP_JSON: &str = r#"{
        "difficulty": {
            "drain_rate": 6.0,
            "circle_size": 4.0,
            "overall_difficulty": 8.0,
            "approach_rate": 9.0,
            "slider_multiplier": 1.6,
            "slider_tick_rate": 2.0
        },
        "control_points": {
            "timing": [{ "time": 0.0, "beat_length": 400.0 }]
        },
        "hit_events": [
            { "start_time": 0.0, "type": "instant", "samples": ["clap"], "new_combo": true },
            { "start_time": 400.0, "type": "sustained", "duration": 800.0 }
        ]
    }"#;

    #[test]
    fn test_parse_valid_beatmap() {
        let beatmap = parse_beatmap(BEATMAP_JSON).unwrap();
        assert_eq!(beatmap.hit_events.len(), 2);
        assert_eq!(beatmap.difficulty.slider_tick_rate, 2.0);
        assert_eq!(
            beatmap.hit_events[1].kind,
            HitEventKind::Sustained { duration: 800.0 }
        );
    }

    #[test]
    fn test_load_beatmap_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BEATMAP_JSON.as_bytes()).unwrap();

        let beatmap = load_beatmap(file.path()).unwrap();
        assert!(beatmap.hit_events[0].new_combo);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_beatmap(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(BeatmapError::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let result = parse_beatmap("{ not json");
        assert!(matches!(result, Err(BeatmapError::Json(_))));
    }

    #[test]
    fn test_unordered_events_rejected() {
        let beatmap = Beatmap {
            hit_events: vec![HitEvent::instant(500.0, vec![]), HitEvent::instant(100.0, vec![])],
            ..Default::default()
        };
        let result = validate_beatmap(&beatmap);
        assert!(matches!(result, Err(BeatmapError::UnorderedEvents { index: 1, .. })));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let beatmap = Beatmap {
            hit_events: vec![HitEvent::sustained(0.0, -10.0)],
            ..Default::default()
        };
        let result = validate_beatmap(&beatmap);
        assert!(matches!(result, Err(BeatmapError::NegativeDuration { index: 0, .. })));
    }

    #[test]
    fn test_negative_path_distance_rejected() {
        let json = r#"{
            "hit_events": [
                { "start_time": 0.0, "type": "curve", "duration": 500.0, "path_distance": -5.0 }
            ]
        }"#;
        let result = parse_beatmap(json);
        assert!(matches!(
            result,
            Err(BeatmapError::NegativePathDistance { index: 0, .. })
        ));
    }

    #[test]
    fn test_excessive_repeats_rejected() {
        let json = r#"{
            "hit_events": [
                { "start_time": 0.0, "type": "instant" },
                { "start_time": 10.0, "type": "curve", "duration": 500.0,
                  "path_distance": 100.0, "repeat_count": 4294967295 }
            ]
        }"#;
        let result = parse_beatmap(json);
        assert!(matches!(
            result,
            Err(BeatmapError::TooManyRepeats { index: 1, repeats: u32::MAX })
        ));
    }
}
