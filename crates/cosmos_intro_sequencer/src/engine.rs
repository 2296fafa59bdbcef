// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tween engine driven by the frame clock.
//!
//! The engine owns every playing [`Timeline`] and advances them once per
//! frame. Callbacks run on the same call stack, strictly one after another,
//! in timeline insertion order and, within a timeline, in time order.

use crate::timeline::{Timeline, TimelineId, TimelineState};
use crate::transform::{Channel, TargetId, TargetRef};
use crate::tween::{Result, TweenError, TweenVars};
use indexmap::IndexMap;

/// Outcome of a timeline reported by [`Tweener::advance`]
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// All steps finished and callbacks ran
    Completed(TimelineId),
    /// A step failed; the timeline was dropped without running its callbacks
    Failed(TimelineId, TweenError),
}

/// Plays timelines on a single virtual clock
#[derive(Default)]
pub struct Tweener {
    timelines: IndexMap<TimelineId, Timeline>,
    /// Total time advanced
    clock: f32,
    /// Frames advanced
    frame_count: u64,
}

impl Tweener {
    /// Create an idle engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing a timeline from the next frame
    pub fn play(&mut self, timeline: Timeline) -> Result<TimelineId> {
        if timeline.is_empty() {
            return Err(TweenError::EmptyTimeline);
        }
        let id = timeline.id();
        tracing::debug!(
            "Playing timeline '{}' ({} steps, {:.2}s)",
            timeline.name(),
            timeline.len(),
            timeline.duration()
        );
        self.timelines.insert(id, timeline);
        Ok(id)
    }

    /// Fire-and-forget tween of a single target
    pub fn tween(&mut self, name: &str, target: &TargetRef, vars: TweenVars) -> Result<TimelineId> {
        let timeline = Timeline::new(name).to(target, vars)?;
        self.play(timeline)
    }

    /// Advance every playing timeline by `dt` seconds and run due callbacks.
    ///
    /// Finished and failed timelines are removed and reported.
    pub fn advance(&mut self, dt: f32) -> Vec<TimelineEvent> {
        self.clock += dt;
        self.frame_count += 1;

        let mut events = Vec::new();
        for timeline in self.timelines.values_mut() {
            match timeline.advance(dt) {
                Ok(callbacks) => {
                    for callback in callbacks {
                        callback();
                    }
                    if timeline.is_complete() {
                        tracing::debug!("Timeline '{}' completed", timeline.name());
                        events.push(TimelineEvent::Completed(timeline.id()));
                    }
                }
                Err(err) => {
                    tracing::error!("Timeline '{}' failed: {err}", timeline.name());
                    timeline.mark_failed();
                    events.push(TimelineEvent::Failed(timeline.id(), err));
                }
            }
        }

        self.timelines
            .retain(|_, t| !matches!(t.state(), TimelineState::Complete | TimelineState::Failed));
        events
    }

    /// Playing timeline by ID
    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    /// Whether a timeline is still playing
    pub fn is_playing(&self, id: TimelineId) -> bool {
        self.timelines.contains_key(&id)
    }

    /// Whether any playing timeline still has to write `channel` on `target`
    pub fn claims(&self, target: TargetId, channel: Channel) -> bool {
        self.timelines.values().any(|t| t.claims(target, channel))
    }

    /// Number of playing timelines
    pub fn active_count(&self) -> usize {
        self.timelines.len()
    }

    /// Whether nothing is playing
    pub fn is_idle(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Total time advanced
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Frames advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;
    use crate::transform::{Axis, Property, Transform};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_play_rejects_empty_timeline() {
        let mut tweener = Tweener::new();
        assert_eq!(
            tweener.play(Timeline::new("empty")).unwrap_err(),
            TweenError::EmptyTimeline
        );
        assert!(tweener.is_idle());
    }

    #[test]
    fn test_completed_timeline_is_reported_and_removed() {
        let mut tweener = Tweener::new();
        let target = TargetRef::mounted(Transform::default());
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();

        let id = tweener
            .tween(
                "fade",
                &target,
                TweenVars::new(1.0)
                    .prop(Property::scale(Axis::X), 0.0)
                    .ease(Ease::Linear)
                    .on_complete(move || counter.set(counter.get() + 1)),
            )
            .unwrap();
        assert!(tweener.claims(target.id(), Channel::Scale));

        assert!(tweener.advance(0.5).is_empty());
        assert_eq!(target.read().unwrap().scale[0], 0.5);

        assert_eq!(tweener.advance(0.5), vec![TimelineEvent::Completed(id)]);
        assert_eq!(fired.get(), 1);
        assert!(!tweener.is_playing(id));
        assert!(!tweener.claims(target.id(), Channel::Scale));

        tweener.advance(0.5);
        assert_eq!(fired.get(), 1);
        assert_eq!(tweener.frame_count(), 3);
    }

    #[test]
    fn test_failure_drops_callbacks() {
        let mut tweener = Tweener::new();
        let target = TargetRef::mounted(Transform::default());
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();

        let timeline = Timeline::new("doomed")
            .with_on_complete(move || flag.set(true))
            .to(&target, TweenVars::new(1.0).prop(Property::position(Axis::X), 1.0))
            .unwrap();
        let id = tweener.play(timeline).unwrap();

        tweener.advance(0.5);
        target.unmount();
        let events = tweener.advance(1.0);
        assert_eq!(
            events,
            vec![TimelineEvent::Failed(id, TweenError::TargetDetached(target.id()))]
        );
        assert!(tweener.is_idle());
        assert!(!fired.get());
    }
}
