// Playfield geometry
// Lane arithmetic and positions on the 8-lane ring

pub mod lanes;

pub use lanes::{circular_position, Lane, LANE_COUNT, RING_RADIUS};
