// Pattern generation
// Seeded lane pattern state machine, reseeded at every combo start

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::beatmap::Difficulty;
use crate::playfield::Lane;

/// Lanes between a note and its twin on the stream pattern
const TWIN_LANE_OFFSET: i32 = 4;

/// Source of random draws for a conversion session
/// All draws share one stream, so the call order must follow event order
pub trait PatternRng {
    /// Uniform integer in [min, max)
    fn next_in(&mut self, min: i32, max: i32) -> i32;
}

/// Production RNG: a PCG32 stream seeded from the beatmap difficulty
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: i32,
    inner: Pcg32,
}

impl SeededRng {
    pub fn new(seed: i32) -> Self {
        SeededRng {
            seed,
            inner: Pcg32::seed_from_u64(seed as u64),
        }
    }

    /// Seed the stream from difficulty settings
    pub fn from_difficulty(difficulty: &Difficulty) -> Self {
        Self::new(derive_seed(difficulty))
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl PatternRng for SeededRng {
    fn next_in(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..max)
    }
}

/// Seed derived from difficulty settings
/// round(HP + CS) * 20 + floor(OD * 41.2) + round(AR), rounding half to even
pub fn derive_seed(difficulty: &Difficulty) -> i32 {
    let hp_cs = (difficulty.drain_rate + difficulty.circle_size).round_ties_even() as i32;
    let od = (difficulty.overall_difficulty as f64 * 41.2).floor() as i32;
    let ar = difficulty.approach_rate.round_ties_even() as i32;
    hp_cs * 20 + od + ar
}

/// Lane pattern used for the current combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Steps by `offset2` each note; twins sit opposite without advancing
    Stream,

    /// Alternates between two lanes `offset2` apart
    BackAndForth,
}

impl PatternKind {
    pub const ALL: [PatternKind; 2] = [PatternKind::Stream, PatternKind::BackAndForth];

    pub fn from_index(index: i32) -> Self {
        match index {
            1 => PatternKind::BackAndForth,
            _ => PatternKind::Stream,
        }
    }

    pub fn index(&self) -> i32 {
        match self {
            PatternKind::Stream => 0,
            PatternKind::BackAndForth => 1,
        }
    }
}

/// Mutable pattern state for one conversion session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternState {
    pub pattern: PatternKind,
    pub offset: i32,
    pub offset2: i32,
}

impl Default for PatternState {
    fn default() -> Self {
        PatternState {
            pattern: PatternKind::Stream,
            offset: 0,
            offset2: 0,
        }
    }
}

impl PatternState {
    /// Draw a fresh state: pattern, then offset, then step
    pub fn random(rng: &mut dyn PatternRng) -> Self {
        let pattern = PatternKind::from_index(rng.next_in(0, PatternKind::ALL.len() as i32));
        let offset = rng.next_in(0, 8);
        let offset2 = rng.next_in(-2, 3);
        PatternState {
            pattern,
            offset,
            offset2,
        }
    }

    /// Raw (unwrapped) lane for the next note
    pub fn next_raw_lane(&mut self, twin: bool) -> i32 {
        match self.pattern {
            PatternKind::Stream => {
                if twin {
                    return self.offset + TWIN_LANE_OFFSET;
                }
                self.offset += self.offset2;
                self.offset
            }
            PatternKind::BackAndForth => {
                if self.offset2 == 0 {
                    self.offset2 = 1;
                }
                self.offset += self.offset2;
                self.offset2 = -self.offset2;
                self.offset
            }
        }
    }
}

/// Pattern state paired with the session RNG
#[derive(Debug, Clone)]
pub struct PatternGenerator<R: PatternRng> {
    state: PatternState,
    rng: R,
}

impl PatternGenerator<SeededRng> {
    /// Generator seeded from difficulty settings
    pub fn from_difficulty(difficulty: &Difficulty) -> Self {
        let rng = SeededRng::from_difficulty(difficulty);
        log::debug!("Pattern generator seeded with {}", rng.seed());
        PatternGenerator::new(rng)
    }
}

impl<R: PatternRng> PatternGenerator<R> {
    pub fn new(rng: R) -> Self {
        PatternGenerator {
            state: PatternState::default(),
            rng,
        }
    }

    /// Reseed the pattern state; called only when an event starts a new combo
    pub fn create_new_pattern(&mut self) {
        self.state = PatternState::random(&mut self.rng);
        log::trace!("New pattern: {:?}", self.state);
    }

    /// Lane for the next note
    pub fn next_lane(&mut self, twin: bool) -> Lane {
        Lane::normalize(self.state.next_raw_lane(twin))
    }

    pub fn state(&self) -> &PatternState {
        &self.state
    }

    /// Shared RNG for non-pattern draws (slide paths, touch positions)
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// RNG returning a scripted sequence and recording every request
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedRng {
        values: VecDeque<i32>,
        pub(crate) requests: Vec<(i32, i32)>,
    }

    impl ScriptedRng {
        pub(crate) fn new(values: &[i32]) -> Self {
            ScriptedRng {
                values: values.iter().copied().collect(),
                requests: Vec::new(),
            }
        }
    }

    impl PatternRng for ScriptedRng {
        fn next_in(&mut self, min: i32, max: i32) -> i32 {
            self.requests.push((min, max));
            let value = self.values.pop_front().unwrap_or(min);
            assert!(value >= min && value < max, "scripted {} outside [{}, {})", value, min, max);
            value
        }
    }

    #[test]
    fn test_derive_seed() {
        let difficulty = Difficulty {
            drain_rate: 5.0,
            circle_size: 4.0,
            overall_difficulty: 8.0,
            approach_rate: 9.0,
            ..Default::default()
        };
        // round(9) * 20 + floor(329.6) + 9
        assert_eq!(derive_seed(&difficulty), 180 + 329 + 9);
    }

    #[test]
    fn test_derive_seed_rounds_half_to_even() {
        let difficulty = Difficulty {
            drain_rate: 2.0,
            circle_size: 0.5, // 2.5 -> 2
            overall_difficulty: 0.0,
            approach_rate: 3.5, // -> 4
            ..Default::default()
        };
        assert_eq!(derive_seed(&difficulty), 2 * 20 + 4);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = SeededRng::new(1234);
        let mut b = SeededRng::new(1234);
        let xs: Vec<i32> = (0..32).map(|_| a.next_in(-2, 3)).collect();
        let ys: Vec<i32> = (0..32).map(|_| b.next_in(-2, 3)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| (-2..3).contains(x)));
    }

    #[test]
    fn test_stream_recurrence() {
        let mut state = PatternState {
            pattern: PatternKind::Stream,
            offset: 3,
            offset2: 2,
        };
        assert_eq!(state.next_raw_lane(false), 5);
        assert_eq!(state.next_raw_lane(true), 9);
        assert_eq!(state.offset, 5); // twin request does not advance
        assert_eq!(state.next_raw_lane(false), 7);
        assert_eq!(state.next_raw_lane(false), 9);
        assert_eq!(state.next_raw_lane(true), 13);
    }

    #[test]
    fn test_back_and_forth_recurrence() {
        let mut state = PatternState {
            pattern: PatternKind::BackAndForth,
            offset: 0,
            offset2: -2,
        };
        assert_eq!(state.next_raw_lane(false), -2);
        assert_eq!(state.next_raw_lane(false), 0);
        // Twin flag is ignored by this pattern
        assert_eq!(state.next_raw_lane(true), -2);
        assert_eq!(state.next_raw_lane(false), 0);
        assert_eq!(state.offset2, -2);
    }

    #[test]
    fn test_back_and_forth_forces_nonzero_step() {
        let mut state = PatternState {
            pattern: PatternKind::BackAndForth,
            offset: 6,
            offset2: 0,
        };
        assert_eq!(state.next_raw_lane(false), 7);
        assert_eq!(state.offset2, -1);
        assert_eq!(state.next_raw_lane(false), 6);
    }

    #[test]
    fn test_new_pattern_draw_order() {
        let mut generator = PatternGenerator::new(ScriptedRng::new(&[1, 5, -1]));
        generator.create_new_pattern();

        assert_eq!(
            *generator.state(),
            PatternState {
                pattern: PatternKind::BackAndForth,
                offset: 5,
                offset2: -1,
            }
        );
        assert_eq!(generator.rng().requests, vec![(0, 2), (0, 8), (-2, 3)]);
    }

    #[test]
    fn test_generator_lanes_are_normalized() {
        let mut generator = PatternGenerator::new(ScriptedRng::new(&[0, 7, 2]));
        generator.create_new_pattern();
        let lanes: Vec<u8> = (0..6).map(|_| generator.next_lane(false).index()).collect();
        assert_eq!(lanes, vec![1, 3, 5, 7, 1, 3]);
        assert_eq!(generator.next_lane(true).index(), 7);
    }

    #[test]
    fn test_default_state_before_first_combo() {
        let mut generator = PatternGenerator::new(ScriptedRng::new(&[]));
        // Stream with zero step stays on lane 0
        assert_eq!(generator.next_lane(false).index(), 0);
        assert_eq!(generator.next_lane(true).index(), 4);
        assert!(generator.rng().requests.is_empty());
    }
}
