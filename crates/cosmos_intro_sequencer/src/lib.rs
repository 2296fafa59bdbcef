// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation core for the Cosmos Intro hero scene.
//!
//! This crate provides the interaction sequencing behind the landing scene:
//! - Transform targets shared with the scene through mount slots
//! - Easing curves and tween parameters
//! - Timelines with sequential, overlapping and labelled steps
//! - A frame-driven tween engine with ordered completion callbacks
//! - A trigger-latched sequencer with camera-flight and object-recede presets
//! - Drag-to-rotate and continuous rotation with per-frame arbitration
//!
//! ## Architecture
//!
//! Everything runs on one thread, driven by the host's frame clock. Pointer
//! events run to completion between frames; tweens and rotation advance once
//! per frame.

pub mod config;
pub mod drag;
pub mod ease;
pub mod engine;
pub mod latch;
pub mod preset;
pub mod rotation;
pub mod sequencer;
pub mod timeline;
pub mod transform;
pub mod tween;

pub use config::{SequencerConfig, DEFAULT_DESTINATION};
pub use drag::{DragCoordinator, DragState, PointerEvent, PointerTracker};
pub use ease::{Ease, EaseDirection};
pub use engine::{TimelineEvent, Tweener};
pub use latch::TriggerLatch;
pub use preset::{CameraFlight, GlyphScatter, ObjectRecede, TerminalPreset};
pub use rotation::{arbitrate, RotationController, RotationDriver, WriteAuthority};
pub use sequencer::{
    Navigator, Sequencer, SequencerError, SequencerPhase, SequencerTargets, TriggerOutcome,
};
pub use timeline::{StepState, Timeline, TimelineId, TimelineState, TweenStep};
pub use transform::{Axis, Channel, Property, SharedTransform, TargetId, TargetRef, Transform};
pub use tween::{Callback, Offset, TweenError, TweenValue, TweenVars};
