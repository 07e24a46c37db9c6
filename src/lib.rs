// Sentakki Convert - osu! beatmap to 8-lane ring converter
// Module declarations and the one-call conversion entry point

pub mod beatmap;
pub mod convert;
pub mod notes;
pub mod pipeline;
pub mod playfield;

use beatmap::Beatmap;
use convert::{BeatmapConverter, ConversionConfig};
use notes::Note;

/// Convert a whole beatmap with a fresh session seeded from its difficulty
///
/// Two calls with the same beatmap and config return identical notes.
pub fn convert_beatmap(beatmap: &Beatmap, config: &ConversionConfig) -> Vec<Note> {
    BeatmapConverter::new(beatmap, config.clone()).convert()
}
