// Note model
// Converted note entities and their judging state machines

pub mod judgement;
pub mod slide_judge;
pub mod touch_hold;
pub mod types;

pub use judgement::{HitResult, HitWindows, JudgementKind, StandardHitWindows};
pub use slide_judge::SlideJudgement;
pub use touch_hold::{grade_for_ratio, TouchHoldJudgement};
pub use types::{
    build_slide_nodes, Hold, Note, NoteKind, Slide, SlideNode, SlideNodeKind, SlidePathInfo, Tap,
    Touch, TouchHold,
};
