// Beatmap converter
// Turns source hit events into ring notes, one event at a time in order

use std::collections::VecDeque;

use super::config::{ConversionConfig, ConversionExperiments};
use super::decision::{ConversionOutcome, EventDecision};
use super::pattern::{PatternGenerator, PatternRng, SeededRng};
use super::samples::{classify_event, SampleFlags};
use super::slide_paths;
use crate::beatmap::{
    Beatmap, CancelSignal, CurveData, HitEvent, HitEventKind, SliderEventGenerator,
    SliderEventKind, TickGenerator, TickSpan,
};
use crate::notes::{Hold, Note, Slide, SlidePathInfo, Tap, Touch, TouchHold};
use crate::playfield::circular_position;

/// Upper bound (exclusive) of the random touch distance from the centre
const TOUCH_MAX_DISTANCE: i32 = 200;

/// Converts one beatmap; owns the session RNG and pattern state
///
/// Events must be converted strictly in order: every lane request and random
/// draw advances shared state, so the output depends on the call sequence.
pub struct BeatmapConverter<'a, R: PatternRng = SeededRng> {
    beatmap: &'a Beatmap,
    config: ConversionConfig,
    generator: PatternGenerator<R>,
    ticks: Box<dyn TickGenerator + 'a>,
    cancel: CancelSignal,
    events_converted: usize,
    decisions: Vec<EventDecision>,
}

impl<'a> BeatmapConverter<'a, SeededRng> {
    /// Converter seeded from the beatmap's difficulty settings
    pub fn new(beatmap: &'a Beatmap, config: ConversionConfig) -> Self {
        let generator = PatternGenerator::from_difficulty(&beatmap.difficulty);
        Self::with_generator(beatmap, config, generator)
    }
}

impl<'a, R: PatternRng> BeatmapConverter<'a, R> {
    /// Converter drawing from a caller-supplied RNG
    pub fn with_rng(beatmap: &'a Beatmap, config: ConversionConfig, rng: R) -> Self {
        Self::with_generator(beatmap, config, PatternGenerator::new(rng))
    }

    fn with_generator(
        beatmap: &'a Beatmap,
        config: ConversionConfig,
        generator: PatternGenerator<R>,
    ) -> Self {
        BeatmapConverter {
            beatmap,
            config,
            generator,
            ticks: Box::new(SliderEventGenerator),
            cancel: CancelSignal::new(),
            events_converted: 0,
            decisions: Vec::new(),
        }
    }

    /// Replace the tick generator used for approach taps
    pub fn with_tick_generator(mut self, ticks: impl TickGenerator + 'a) -> Self {
        self.ticks = Box::new(ticks);
        self
    }

    /// Share a cancellation signal with the caller
    pub fn with_cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Decisions recorded so far (empty unless enabled in the config)
    pub fn decisions(&self) -> &[EventDecision] {
        &self.decisions
    }

    /// Lazily convert every event of the beatmap
    pub fn notes(&mut self) -> ConvertedNotes<'_, 'a, R> {
        ConvertedNotes {
            converter: self,
            next_event: 0,
            pending: VecDeque::new(),
        }
    }

    /// Convert the whole beatmap
    pub fn convert(&mut self) -> Vec<Note> {
        let notes: Vec<Note> = self.notes().collect();
        log::info!(
            "Converted {} hit events into {} notes",
            self.events_converted,
            notes.len()
        );
        notes
    }

    /// Convert a single event; the caller must feed events in time order
    pub fn convert_event(&mut self, event: &HitEvent) -> Vec<Note> {
        if event.new_combo {
            self.generator.create_new_pattern();
        }

        let flags = classify_event(event);
        let (notes, outcome) = match &event.kind {
            HitEventKind::Curve(curve) => self.convert_curve(event, curve, flags),
            HitEventKind::Sustained { duration } => self.convert_sustained(event, *duration),
            HitEventKind::Instant => self.convert_instant(event, flags),
        };

        log::trace!(
            "Event {} at {}ms -> {:?} ({} notes)",
            self.events_converted,
            event.start_time,
            outcome,
            notes.len()
        );

        if self.config.record_decisions {
            self.decisions.push(EventDecision::from_conversion(
                self.events_converted,
                event,
                flags,
                self.generator.state(),
                outcome,
                &notes,
            ));
        }
        self.events_converted += 1;

        notes
    }

    fn convert_curve(
        &mut self,
        event: &HitEvent,
        curve: &CurveData,
        flags: SampleFlags,
    ) -> (Vec<Note>, ConversionOutcome) {
        if flags.slide_trigger && curve.duration >= self.config.slide_duration_threshold {
            return self.convert_slide(event, curve, flags);
        }

        let mut notes = Vec::new();
        let mut twin = None;

        if self.config.enabled(ConversionExperiments::TWIN_NOTES) {
            if flags.twin_trigger {
                twin = Some(self.create_hold(event, curve, true, flags.is_break));
            } else {
                notes.extend(self.create_taps_from_ticks(event, curve));
            }
        }

        let mut main = self.create_hold(event, curve, false, flags.is_break);
        let outcome = match twin {
            Some(mut twin) => {
                twin.has_twin = true;
                main.has_twin = true;
                notes.push(Note::Hold(twin));
                ConversionOutcome::TwinHolds
            }
            None => ConversionOutcome::Hold,
        };
        notes.push(Note::Hold(main));

        (notes, outcome)
    }

    fn convert_slide(
        &mut self,
        event: &HitEvent,
        curve: &CurveData,
        flags: SampleFlags,
    ) -> (Vec<Note>, ConversionOutcome) {
        let mut notes = Vec::new();
        let mut twin = None;

        if self.config.enabled(ConversionExperiments::TWIN_SLIDES) {
            if flags.twin_trigger {
                twin = self.create_slide(event, curve, true, flags.is_break);
            } else {
                notes.extend(self.create_taps_from_ticks(event, curve));
            }
        }
        let main = self.create_slide(event, curve, false, flags.is_break);

        let (slides, outcome) = combine_slides(twin, main);
        notes.extend(slides.into_iter().map(Note::Slide));
        (notes, outcome)
    }

    fn convert_sustained(&mut self, event: &HitEvent, duration: f64) -> (Vec<Note>, ConversionOutcome) {
        if duration < self.config.touch_hold_min_duration {
            return (Vec::new(), ConversionOutcome::Dropped);
        }

        let note = Note::TouchHold(TouchHold {
            start_time: event.start_time,
            end_time: event.start_time + duration,
        });
        (vec![note], ConversionOutcome::TouchHold)
    }

    fn convert_instant(&mut self, event: &HitEvent, flags: SampleFlags) -> (Vec<Note>, ConversionOutcome) {
        if !flags.is_break
            && self.config.enabled(ConversionExperiments::TOUCH)
            && flags.touch_trigger
        {
            return (vec![self.create_touch(event)], ConversionOutcome::Touch);
        }

        let twin = (self.config.enabled(ConversionExperiments::TWIN_NOTES) && flags.twin_trigger)
            .then(|| self.create_tap(event, true, flags.is_break));
        let mut main = self.create_tap(event, false, flags.is_break);

        match twin {
            Some(mut twin) => {
                twin.has_twin = true;
                main.has_twin = true;
                (vec![Note::Tap(twin), Note::Tap(main)], ConversionOutcome::TwinTaps)
            }
            None => (vec![Note::Tap(main)], ConversionOutcome::Tap),
        }
    }

    /// Lane first, then the path roll; returns None when no path fits the duration
    fn create_slide(
        &mut self,
        event: &HitEvent,
        curve: &CurveData,
        twin: bool,
        is_break: bool,
    ) -> Option<Slide> {
        let lane = self.generator.next_lane(twin);
        let id = slide_paths::select_path(curve.duration, self.generator.rng())?;
        let entry = slide_paths::entry(id)?;

        Some(Slide::new(
            lane,
            event.start_time,
            SlidePathInfo {
                id,
                duration: curve.duration,
            },
            entry.distance(),
            is_break,
        ))
    }

    fn create_hold(&mut self, event: &HitEvent, curve: &CurveData, twin: bool, is_break: bool) -> Hold {
        Hold {
            lane: self.generator.next_lane(twin),
            start_time: event.start_time,
            end_time: event.start_time + curve.duration,
            is_break,
            has_twin: false,
        }
    }

    fn create_tap(&mut self, event: &HitEvent, twin: bool, is_break: bool) -> Tap {
        Tap {
            lane: self.generator.next_lane(twin),
            start_time: event.start_time,
            is_break,
            has_twin: false,
        }
    }

    /// Distance is drawn before angle
    fn create_touch(&mut self, event: &HitEvent) -> Note {
        let rng = self.generator.rng();
        let distance = rng.next_in(0, TOUCH_MAX_DISTANCE);
        let angle = rng.next_in(0, 360);

        Note::Touch(Touch {
            position: circular_position(distance as f32, angle as f32),
            start_time: event.start_time,
        })
    }

    /// Taps on the twin lane at every tick and repeat of the curve
    fn create_taps_from_ticks(&mut self, event: &HitEvent, curve: &CurveData) -> Vec<Note> {
        let lane = self.generator.next_lane(true);

        let span_duration = curve.span_duration();
        if span_duration < self.config.repeat_spam_span && curve.repeat_count > 0 {
            return Vec::new();
        }

        let difficulty = &self.beatmap.difficulty;
        let control_points = &self.beatmap.control_points;

        let scoring_distance = 100.0
            * difficulty.slider_multiplier
            * control_points.speed_multiplier_at(event.start_time);
        let velocity = scoring_distance / control_points.beat_length_at(event.start_time);
        let tick_distance = scoring_distance / difficulty.slider_tick_rate;

        let span = TickSpan {
            start_time: event.start_time,
            span_duration,
            velocity,
            tick_distance,
            path_length: curve.path_distance,
            span_count: curve.span_count(),
            legacy_last_tick_offset: curve.legacy_last_tick_offset.unwrap_or(0.0),
        };

        let taps: Vec<Note> = self
            .ticks
            .generate(&span, &self.cancel)
            .into_iter()
            .filter(|e| matches!(e.kind, SliderEventKind::Tick | SliderEventKind::Repeat))
            .map(|e| {
                Note::Tap(Tap {
                    lane,
                    start_time: e.time,
                    is_break: false,
                    has_twin: false,
                })
            })
            .collect();

        if self.cancel.is_cancelled() {
            log::warn!(
                "Tick generation cancelled at {}ms after {} approach taps",
                event.start_time,
                taps.len()
            );
        }

        taps
    }
}

/// Pair up a twin slide with the main slide, either of which may be missing
///
/// Slides sharing a lane merge into the first one. The pattern draw ranges never
/// put a twin on its primary's lane, so the converter itself does not reach the merge.
pub fn combine_slides(twin: Option<Slide>, main: Option<Slide>) -> (Vec<Slide>, ConversionOutcome) {
    match (twin, main) {
        (Some(mut first), Some(second)) if first.lane == second.lane => {
            if let Some(id) = second.path_id() {
                if !first.has_path(id) {
                    first.paths.extend(second.paths);
                }
            }
            first.has_twin = false;
            (vec![first], ConversionOutcome::MergedSlides)
        }
        (Some(mut first), Some(mut second)) => {
            first.has_twin = true;
            second.has_twin = true;
            (vec![first, second], ConversionOutcome::TwinSlides)
        }
        (Some(only), None) | (None, Some(only)) => (vec![only], ConversionOutcome::Slide),
        (None, None) => (Vec::new(), ConversionOutcome::SlideSkipped),
    }
}

/// Lazy note sequence over a beatmap
/// Each source event is converted only once the previous event's notes are drained
pub struct ConvertedNotes<'c, 'a, R: PatternRng> {
    converter: &'c mut BeatmapConverter<'a, R>,
    next_event: usize,
    pending: VecDeque<Note>,
}

impl<'c, 'a, R: PatternRng> Iterator for ConvertedNotes<'c, 'a, R> {
    type Item = Note;

    fn next(&mut self) -> Option<Note> {
        loop {
            if let Some(note) = self.pending.pop_front() {
                return Some(note);
            }

            let beatmap = self.converter.beatmap;
            let event = beatmap.hit_events.get(self.next_event)?;

            if self.converter.cancel.is_cancelled() {
                log::warn!(
                    "Conversion cancelled with {} of {} events converted",
                    self.next_event,
                    beatmap.hit_events.len()
                );
                return None;
            }

            self.next_event += 1;
            self.pending.extend(self.converter.convert_event(event));
        }
    }
}
