// Lane arithmetic - modular lane indices on the circular playfield
// Every lane produced by pattern generation passes through Lane::normalize

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of lanes around the ring
pub const LANE_COUNT: i32 = 8;

/// Distance from the playfield centre to the judgement ring
pub const RING_RADIUS: f32 = 300.0;

/// A lane index on the ring, always in [0, 8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    /// Wrap an arbitrary (possibly negative) lane value onto the ring
    pub fn normalize(raw: i32) -> Self {
        Lane((((raw % LANE_COUNT) + LANE_COUNT) % LANE_COUNT) as u8)
    }

    /// Lane index as an integer
    pub fn index(self) -> u8 {
        self.0
    }

    /// Lane reached after moving `steps` lanes clockwise
    pub fn offset(self, steps: i32) -> Self {
        Lane::normalize(self.0 as i32 + steps)
    }

    /// Angle of the lane centre in degrees, clockwise from 12 o'clock
    pub fn angle(self) -> f32 {
        22.5 + 45.0 * self.0 as f32
    }

    /// Position of the lane's hit point on the judgement ring
    pub fn ring_position(self) -> Vec2 {
        circular_position(RING_RADIUS, self.angle())
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as i32) < LANE_COUNT {
            Ok(Lane(value))
        } else {
            Err(format!("lane {} is outside of the ring", value))
        }
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> u8 {
        lane.0
    }
}

/// Point at `distance` from the centre, `angle` degrees clockwise from 12 o'clock
pub fn circular_position(distance: f32, angle: f32) -> Vec2 {
    let radians = (angle + 90.0).to_radians();
    Vec2::new(-(distance * radians.cos()), -(distance * radians.sin()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps_positive_and_negative() {
        assert_eq!(Lane::normalize(0).index(), 0);
        assert_eq!(Lane::normalize(7).index(), 7);
        assert_eq!(Lane::normalize(8).index(), 0);
        assert_eq!(Lane::normalize(13).index(), 5);
        assert_eq!(Lane::normalize(-1).index(), 7);
        assert_eq!(Lane::normalize(-9).index(), 7);
        assert_eq!(Lane::normalize(-16).index(), 0);
    }

    #[test]
    fn test_normalize_is_bounded_for_large_offsets() {
        for raw in [i32::MIN + 8, -1_000_003, -17, 1_000_001, i32::MAX] {
            let lane = Lane::normalize(raw);
            assert!((lane.index() as i32) < LANE_COUNT);
        }
    }

    #[test]
    fn test_offset_wraps() {
        assert_eq!(Lane::normalize(6).offset(4).index(), 2);
        assert_eq!(Lane::normalize(1).offset(-3).index(), 6);
    }

    #[test]
    fn test_lane_from_u8_rejects_out_of_range() {
        assert!(Lane::try_from(7u8).is_ok());
        assert!(Lane::try_from(8u8).is_err());
    }

    #[test]
    fn test_circular_position_axes() {
        // 0 degrees points straight up (negative y)
        let up = circular_position(100.0, 0.0);
        assert!(up.x.abs() < 1e-3);
        assert!((up.y + 100.0).abs() < 1e-3);

        let right = circular_position(100.0, 90.0);
        assert!((right.x - 100.0).abs() < 1e-3);
        assert!(right.y.abs() < 1e-3);
    }

    #[test]
    fn test_ring_positions_lie_on_ring() {
        for i in 0..8 {
            let pos = Lane::normalize(i).ring_position();
            assert!((pos.length() - RING_RADIUS).abs() < 1e-2);
        }
    }
}
