// Slide path catalog
// Fixed table of slide shapes with duration-gated random selection

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::PatternRng;
use crate::playfield::{circular_position, Lane, RING_RADIUS};

/// Angular step used to sample arcs, in degrees
const ARC_STEP_DEGREES: f32 = 5.0;

/// Geometric family of a slide path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideShape {
    /// Chord between two lanes
    Straight,

    /// Arc along the ring
    Circle { clockwise: bool },

    /// Into the centre and back out
    VShape,

    /// Zigzag across the centre
    Thunder,

    /// Curve dipping towards the centre
    UShape,
}

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlidePathEntry {
    pub name: &'static str,
    pub shape: SlideShape,

    /// Lanes from the start lane to the end lane, clockwise
    pub end_offset: i32,

    /// Shortest duration this path can be travelled in (ms, inclusive)
    pub min_duration: f64,

    /// Longest duration this path can be travelled in (ms, inclusive)
    pub max_duration: f64,
}

impl SlidePathEntry {
    /// Whether a slide of `duration` may use this path
    pub fn accepts(&self, duration: f64) -> bool {
        self.min_duration <= duration && duration <= self.max_duration
    }

    /// Path control points starting at `start`
    pub fn control_points(&self, start: Lane) -> Vec<Vec2> {
        let end = start.offset(self.end_offset);
        let from = start.ring_position();
        let to = end.ring_position();

        match self.shape {
            SlideShape::Straight => vec![from, to],
            SlideShape::VShape => vec![from, Vec2::ZERO, to],
            SlideShape::Thunder => vec![
                from,
                circular_position(RING_RADIUS * 0.4, start.angle() + 90.0),
                circular_position(RING_RADIUS * 0.4, start.angle() + 270.0),
                to,
            ],
            SlideShape::UShape => vec![
                from,
                circular_position(RING_RADIUS * 0.5, start.angle() + 45.0),
                circular_position(RING_RADIUS * 0.5, end.angle() - 45.0),
                to,
            ],
            SlideShape::Circle { clockwise } => {
                let sweep = 45.0 * self.end_offset.rem_euclid(8) as f32;
                let sweep = if clockwise { sweep } else { sweep - 360.0 };
                let steps = (sweep.abs() / ARC_STEP_DEGREES).ceil().max(1.0) as usize;
                (0..=steps)
                    .map(|i| {
                        let angle = start.angle() + sweep * i as f32 / steps as f32;
                        circular_position(RING_RADIUS, angle)
                    })
                    .collect()
            }
        }
    }

    /// Length of the path in playfield units
    /// All lanes are rotations of each other, so lane 0 stands in for any start lane
    pub fn distance(&self) -> f64 {
        self.control_points(Lane::normalize(0))
            .windows(2)
            .map(|w| w[0].distance(w[1]) as f64)
            .sum()
    }
}

/// The catalog, in identifier order
pub static SLIDE_PATHS: [SlidePathEntry; 12] = [
    SlidePathEntry { name: "straight_2", shape: SlideShape::Straight, end_offset: 2, min_duration: 350.0, max_duration: 1200.0 },
    SlidePathEntry { name: "straight_3", shape: SlideShape::Straight, end_offset: 3, min_duration: 400.0, max_duration: 1500.0 },
    SlidePathEntry { name: "straight_4", shape: SlideShape::Straight, end_offset: 4, min_duration: 450.0, max_duration: 1800.0 },
    SlidePathEntry { name: "circle_cw_2", shape: SlideShape::Circle { clockwise: true }, end_offset: 2, min_duration: 400.0, max_duration: 1500.0 },
    SlidePathEntry { name: "circle_ccw_2", shape: SlideShape::Circle { clockwise: false }, end_offset: 6, min_duration: 400.0, max_duration: 1500.0 },
    SlidePathEntry { name: "circle_cw_4", shape: SlideShape::Circle { clockwise: true }, end_offset: 4, min_duration: 700.0, max_duration: 2500.0 },
    SlidePathEntry { name: "circle_ccw_4", shape: SlideShape::Circle { clockwise: false }, end_offset: 4, min_duration: 700.0, max_duration: 2500.0 },
    SlidePathEntry { name: "circle_cw_7", shape: SlideShape::Circle { clockwise: true }, end_offset: 7, min_duration: 1200.0, max_duration: 4000.0 },
    SlidePathEntry { name: "v_shape_2", shape: SlideShape::VShape, end_offset: 2, min_duration: 450.0, max_duration: 1800.0 },
    SlidePathEntry { name: "v_shape_3", shape: SlideShape::VShape, end_offset: 3, min_duration: 450.0, max_duration: 1800.0 },
    SlidePathEntry { name: "thunder_4", shape: SlideShape::Thunder, end_offset: 4, min_duration: 800.0, max_duration: 2500.0 },
    SlidePathEntry { name: "u_shape_4", shape: SlideShape::UShape, end_offset: 4, min_duration: 800.0, max_duration: 3000.0 },
];

/// Catalog entry by identifier
pub fn entry(id: usize) -> Option<&'static SlidePathEntry> {
    SLIDE_PATHS.get(id)
}

/// Identifiers of every path accepting `duration`, in catalog order
pub fn valid_paths(duration: f64) -> Vec<usize> {
    SLIDE_PATHS
        .iter()
        .enumerate()
        .filter(|(_, p)| p.accepts(duration))
        .map(|(id, _)| id)
        .collect()
}

/// Pick a path for a slide of `duration`
/// Filters first and then makes exactly one draw; no draw happens when nothing fits
pub fn select_path(duration: f64, rng: &mut dyn PatternRng) -> Option<usize> {
    let valid = valid_paths(duration);
    if valid.is_empty() {
        log::debug!("No slide path fits a duration of {}ms", duration);
        return None;
    }
    let pick = rng.next_in(0, valid.len() as i32) as usize;
    Some(valid[pick])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::pattern::tests::ScriptedRng;
    use crate::convert::pattern::SeededRng;

    #[test]
    fn test_catalog_ranges_are_well_formed() {
        for path in SLIDE_PATHS.iter() {
            assert!(path.min_duration <= path.max_duration, "{}", path.name);
            assert!(path.distance() > 0.0, "{}", path.name);
        }
    }

    #[test]
    fn test_straight_distances() {
        // Two lanes apart spans 90 degrees of the ring
        let chord = entry(0).unwrap().distance();
        assert!((chord - 2.0 * 300.0 * (45f64).to_radians().sin()).abs() < 0.5);

        let diameter = entry(2).unwrap().distance();
        assert!((diameter - 600.0).abs() < 0.5);
    }

    #[test]
    fn test_circle_distance_matches_arc_length() {
        let quarter = entry(3).unwrap().distance();
        let expected = 300.0 * std::f64::consts::FRAC_PI_2;
        // Sampled polyline is slightly shorter than the true arc
        assert!(quarter < expected && quarter > expected - 1.0);

        // Counter-clockwise to lane 6 covers the same arc
        assert!((entry(4).unwrap().distance() - quarter).abs() < 0.5);
    }

    #[test]
    fn test_v_shape_goes_through_centre() {
        let points = entry(8).unwrap().control_points(Lane::normalize(3));
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Vec2::ZERO);
        assert!((entry(8).unwrap().distance() - 600.0).abs() < 0.5);
    }

    #[test]
    fn test_valid_paths_filter() {
        assert_eq!(valid_paths(350.0), vec![0]);
        assert!(valid_paths(349.0).is_empty());
        assert!(valid_paths(4001.0).is_empty());
        assert_eq!(valid_paths(4000.0), vec![7]);

        for id in valid_paths(900.0) {
            assert!(entry(id).unwrap().accepts(900.0));
        }
    }

    #[test]
    fn test_select_path_draws_within_filtered_set() {
        // 1000ms fits everything except circle_cw_7
        let mut rng = ScriptedRng::new(&[7]);
        assert_eq!(select_path(1000.0, &mut rng), Some(8));
        assert_eq!(rng.requests, vec![(0, 11)]);

        // 360ms only fits straight_2
        let mut rng = ScriptedRng::new(&[0]);
        assert_eq!(select_path(360.0, &mut rng), Some(0));
        assert_eq!(rng.requests, vec![(0, 1)]);
    }

    #[test]
    fn test_select_path_without_candidates_makes_no_draw() {
        let mut rng = ScriptedRng::new(&[]);
        assert_eq!(select_path(10_000.0, &mut rng), None);
        assert!(rng.requests.is_empty());
    }

    #[test]
    fn test_selected_paths_respect_duration() {
        let mut rng = SeededRng::new(42);
        for duration in (300..4500).step_by(50) {
            let duration = duration as f64;
            if let Some(id) = select_path(duration, &mut rng) {
                assert!(entry(id).unwrap().accepts(duration));
            }
        }
    }
}
