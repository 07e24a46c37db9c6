// Note entity types
// Output notes for the ring playfield, including nested slide nodes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::judgement::JudgementKind;
use crate::playfield::Lane;

/// Length of one chevron along a slide path
pub const SLIDE_CHEVRON_DISTANCE: f64 = 25.0;

/// Chevrons between consecutive slide nodes
pub const CHEVRONS_PER_NODE: u32 = 5;

/// Single-lane tap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tap {
    pub lane: Lane,
    pub start_time: f64,
    pub is_break: bool,
    pub has_twin: bool,
}

/// Held note on a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub lane: Lane,
    pub start_time: f64,
    pub end_time: f64,
    pub is_break: bool,
    pub has_twin: bool,
}

/// A path shape attached to a slide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidePathInfo {
    /// Index into the slide path catalog
    pub id: usize,

    /// Travel duration in milliseconds
    pub duration: f64,
}

/// Role of a nested slide node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideNodeKind {
    /// Intermediate checkpoint, never scored on its own
    Node,

    /// Terminal node judged against timing windows
    Tail,
}

/// Checkpoint along a slide path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideNode {
    /// Fraction of the path travelled, in (0, 1]
    pub progress: f32,

    /// Lane of the owning slide
    pub lane: Lane,

    pub kind: SlideNodeKind,
}

impl SlideNode {
    /// Judgement contract of this node
    pub fn judgement_kind(&self) -> JudgementKind {
        match self.kind {
            SlideNodeKind::Node => JudgementKind::Ignore,
            SlideNodeKind::Tail => JudgementKind::Standard,
        }
    }
}

/// Slide with one or more path shapes and its nested nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub lane: Lane,
    pub start_time: f64,
    pub end_time: f64,

    /// Path shapes starting from this slide's lane, first is the primary path
    pub paths: Vec<SlidePathInfo>,

    pub is_break: bool,
    pub has_twin: bool,

    /// Nodes along the primary path, the last one is the tail
    pub nodes: Vec<SlideNode>,
}

impl Slide {
    /// Create a slide and lay out nodes along a primary path of `path_distance`
    pub fn new(
        lane: Lane,
        start_time: f64,
        path: SlidePathInfo,
        path_distance: f64,
        is_break: bool,
    ) -> Self {
        Slide {
            lane,
            start_time,
            end_time: start_time + path.duration,
            paths: vec![path],
            is_break,
            has_twin: false,
            nodes: build_slide_nodes(path_distance, lane),
        }
    }

    /// Identifier of the primary path; None only for a slide deserialized without paths
    pub fn path_id(&self) -> Option<usize> {
        self.paths.first().map(|p| p.id)
    }

    /// Whether a path with this identifier is already attached
    pub fn has_path(&self, id: usize) -> bool {
        self.paths.iter().any(|p| p.id == id)
    }

    /// Duration of the slide
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// The terminal node
    pub fn tail(&self) -> Option<&SlideNode> {
        self.nodes.last()
    }
}

/// Lay out slide nodes every five chevrons, ending with a tail at progress 1
pub fn build_slide_nodes(path_distance: f64, lane: Lane) -> Vec<SlideNode> {
    let chevrons = ((path_distance / SLIDE_CHEVRON_DISTANCE).ceil() as u32).max(1);

    let mut nodes: Vec<SlideNode> = (1..)
        .map(|k: u32| k * CHEVRONS_PER_NODE)
        .take_while(|&c| c < chevrons)
        .map(|c| SlideNode {
            progress: c as f32 / chevrons as f32,
            lane,
            kind: SlideNodeKind::Node,
        })
        .collect();

    nodes.push(SlideNode {
        progress: 1.0,
        lane,
        kind: SlideNodeKind::Tail,
    });

    nodes
}

/// Free-position touch note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    /// Offset from the playfield centre
    pub position: Vec2,
    pub start_time: f64,
}

/// Centre hold judged by how long it is held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchHold {
    pub start_time: f64,
    pub end_time: f64,
}

impl TouchHold {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Discriminant of a note, for logging and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Tap,
    Hold,
    Slide,
    Touch,
    TouchHold,
}

impl NoteKind {
    pub fn to_string(&self) -> &'static str {
        match self {
            NoteKind::Tap => "tap",
            NoteKind::Hold => "hold",
            NoteKind::Slide => "slide",
            NoteKind::Touch => "touch",
            NoteKind::TouchHold => "touch_hold",
        }
    }
}

/// A converted note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Note {
    Tap(Tap),
    Hold(Hold),
    Slide(Slide),
    Touch(Touch),
    TouchHold(TouchHold),
}

impl Note {
    pub fn kind(&self) -> NoteKind {
        match self {
            Note::Tap(_) => NoteKind::Tap,
            Note::Hold(_) => NoteKind::Hold,
            Note::Slide(_) => NoteKind::Slide,
            Note::Touch(_) => NoteKind::Touch,
            Note::TouchHold(_) => NoteKind::TouchHold,
        }
    }

    /// Lane for lane-bound notes
    pub fn lane(&self) -> Option<Lane> {
        match self {
            Note::Tap(n) => Some(n.lane),
            Note::Hold(n) => Some(n.lane),
            Note::Slide(n) => Some(n.lane),
            Note::Touch(_) | Note::TouchHold(_) => None,
        }
    }

    pub fn start_time(&self) -> f64 {
        match self {
            Note::Tap(n) => n.start_time,
            Note::Hold(n) => n.start_time,
            Note::Slide(n) => n.start_time,
            Note::Touch(n) => n.start_time,
            Note::TouchHold(n) => n.start_time,
        }
    }

    /// End time for duration-bearing notes
    pub fn end_time(&self) -> Option<f64> {
        match self {
            Note::Hold(n) => Some(n.end_time),
            Note::Slide(n) => Some(n.end_time),
            Note::TouchHold(n) => Some(n.end_time),
            Note::Tap(_) | Note::Touch(_) => None,
        }
    }

    pub fn is_break(&self) -> bool {
        match self {
            Note::Tap(n) => n.is_break,
            Note::Hold(n) => n.is_break,
            Note::Slide(n) => n.is_break,
            Note::Touch(_) | Note::TouchHold(_) => false,
        }
    }

    pub fn has_twin(&self) -> bool {
        match self {
            Note::Tap(n) => n.has_twin,
            Note::Hold(n) => n.has_twin,
            Note::Slide(n) => n.has_twin,
            Note::Touch(_) | Note::TouchHold(_) => false,
        }
    }

    /// Mark a lane-bound note as part of a twin pair
    pub fn set_has_twin(&mut self, has_twin: bool) {
        match self {
            Note::Tap(n) => n.has_twin = has_twin,
            Note::Hold(n) => n.has_twin = has_twin,
            Note::Slide(n) => n.has_twin = has_twin,
            Note::Touch(_) | Note::TouchHold(_) => {}
        }
    }

    /// Judgement contract of the note itself
    pub fn judgement_kind(&self) -> JudgementKind {
        JudgementKind::for_break(self.is_break())
    }
}
