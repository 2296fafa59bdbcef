// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timelines: ordered tween steps placed on a single virtual clock.
//!
//! A step's start time is resolved when it is inserted, so placements can
//! only refer to steps that already exist. Start values are captured lazily,
//! the first time the clock reaches the step, which lets chained steps on the
//! same property pick up where the previous one left off.

use crate::ease::Ease;
use crate::transform::{Channel, Property, TargetId, TargetRef};
use crate::tween::{Callback, Offset, Result, TweenError, TweenValue, TweenVars};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub Uuid);

impl TimelineId {
    /// Create a new random timeline ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimelineId {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress state of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    /// Clock has not reached the step yet
    #[default]
    Pending,
    /// Step is interpolating
    Active,
    /// Step reached full progress
    Complete,
}

/// Progress state of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineState {
    /// Built but not advanced yet
    #[default]
    Pending,
    /// At least one step has not completed
    Running,
    /// All steps complete and callbacks fired
    Complete,
    /// A step failed; no further callbacks will run
    Failed,
}

/// One property being interpolated by a step
#[derive(Debug, Clone, Copy)]
struct PropertyTween {
    property: Property,
    value: TweenValue,
    /// Captured on activation
    from: Option<f32>,
}

/// A scheduled interpolation of one target's properties
pub struct TweenStep {
    target: TargetRef,
    props: Vec<PropertyTween>,
    start: f32,
    duration: f32,
    ease: Ease,
    label: Option<String>,
    on_complete: Option<Callback>,
    state: StepState,
    progress: f32,
}

impl TweenStep {
    /// Start time on the timeline
    pub fn start(&self) -> f32 {
        self.start
    }

    /// End time on the timeline
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Easing curve
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Current state
    pub fn state(&self) -> StepState {
        self.state
    }

    /// ID of the animated target
    pub fn target_id(&self) -> TargetId {
        self.target.id()
    }

    /// Properties animated by this step
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.props.iter().map(|p| p.property)
    }

    /// Whether this step writes any component of `channel` on `target`
    pub fn writes(&self, target: TargetId, channel: Channel) -> bool {
        self.target.id() == target && self.props.iter().any(|p| p.property.channel == channel)
    }

    /// Move the step to linear progress `progress`, writing interpolated values
    fn apply(&mut self, progress: f32) -> Result<()> {
        let id = self.target.id();
        let eased = self.ease.apply(progress);
        let props = &mut self.props;
        self.target
            .with_mut(|transform| {
                for prop in props.iter_mut() {
                    let from = *prop.from.get_or_insert_with(|| transform.get(prop.property));
                    let to = prop.value.resolve(from);
                    let value = if progress >= 1.0 { to } else { from + (to - from) * eased };
                    transform.set(prop.property, value);
                }
            })
            .ok_or(TweenError::TargetDetached(id))?;
        self.progress = progress;
        Ok(())
    }
}

impl fmt::Debug for TweenStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenStep")
            .field("target", &self.target)
            .field("start", &self.start)
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("label", &self.label)
            .field("state", &self.state)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

/// An ordered composition of tween steps with relative timing
pub struct Timeline {
    id: TimelineId,
    name: String,
    steps: Vec<TweenStep>,
    labels: IndexMap<String, usize>,
    time: f32,
    state: TimelineState,
    on_complete: Option<Callback>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TimelineId::new(),
            name: name.into(),
            steps: Vec::new(),
            labels: IndexMap::new(),
            time: 0.0,
            state: TimelineState::Pending,
            on_complete: None,
        }
    }

    /// Run `callback` once after the last step reaches full progress
    pub fn with_on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Chainable form of [`Timeline::push`]
    pub fn to(mut self, target: &TargetRef, vars: TweenVars) -> Result<Self> {
        self.push(target, vars)?;
        Ok(self)
    }

    /// Append a step animating `target`, returning its index
    pub fn push(&mut self, target: &TargetRef, vars: TweenVars) -> Result<usize> {
        if !vars.duration.is_finite() || vars.duration <= 0.0 {
            return Err(TweenError::InvalidDuration(vars.duration));
        }
        if vars.props.is_empty() {
            return Err(TweenError::EmptyTween);
        }
        if let Some(label) = &vars.label {
            if self.labels.contains_key(label) {
                return Err(TweenError::DuplicateLabel(label.clone()));
            }
        }

        let start = self.resolve_start(&vars.offset)?;
        let index = self.steps.len();
        if let Some(label) = &vars.label {
            self.labels.insert(label.clone(), index);
        }

        self.steps.push(TweenStep {
            target: target.clone(),
            props: vars
                .props
                .into_iter()
                .map(|(property, value)| PropertyTween {
                    property,
                    value,
                    from: None,
                })
                .collect(),
            start,
            duration: vars.duration,
            ease: vars.ease,
            label: vars.label,
            on_complete: vars.on_complete,
            state: StepState::Pending,
            progress: 0.0,
        });
        Ok(index)
    }

    fn resolve_start(&self, offset: &Offset) -> Result<f32> {
        let start = match offset {
            Offset::Sequential => self.duration(),
            Offset::FromEnd(delta) => self.duration() + delta,
            Offset::WithPrevious(delta) => self.steps.last().map_or(0.0, TweenStep::start) + delta,
            Offset::At(time) => *time,
            Offset::AfterLabel(label, delta) => {
                let index = self
                    .labels
                    .get(label)
                    .ok_or_else(|| TweenError::UnknownLabel(label.clone()))?;
                self.steps[*index].end() + delta
            }
        };

        if !start.is_finite() || start < 0.0 {
            return Err(TweenError::NegativeStart(start));
        }
        Ok(start)
    }

    /// Timeline ID
    pub fn id(&self) -> TimelineId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// End time of the last-ending step
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(TweenStep::end).fold(0.0, f32::max)
    }

    /// Current clock time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current state
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// All steps in insertion order
    pub fn steps(&self) -> &[TweenStep] {
        &self.steps
    }

    /// Step by index
    pub fn step(&self, index: usize) -> Option<&TweenStep> {
        self.steps.get(index)
    }

    /// Step by label
    pub fn step_by_label(&self, label: &str) -> Option<&TweenStep> {
        self.labels.get(label).map(|&index| &self.steps[index])
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the timeline has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether all steps have completed
    pub fn is_complete(&self) -> bool {
        self.state == TimelineState::Complete
    }

    /// Whether an unfinished step writes `channel` on `target`
    pub fn claims(&self, target: TargetId, channel: Channel) -> bool {
        matches!(self.state, TimelineState::Pending | TimelineState::Running)
            && self
                .steps
                .iter()
                .any(|s| s.state != StepState::Complete && s.writes(target, channel))
    }

    pub(crate) fn mark_failed(&mut self) {
        self.state = TimelineState::Failed;
        self.on_complete = None;
        for step in &mut self.steps {
            step.on_complete = None;
        }
    }

    /// Advance the clock by `dt`, returning the callbacks that became due in
    /// the order they must run. The caller runs them.
    pub(crate) fn advance(&mut self, dt: f32) -> Result<Vec<Callback>> {
        if matches!(self.state, TimelineState::Complete | TimelineState::Failed) {
            return Ok(Vec::new());
        }
        self.state = TimelineState::Running;
        self.time += dt.max(0.0);
        let now = self.time;

        // (end time, insertion index) of every step completing this tick
        let mut finished: Vec<(f32, usize)> = Vec::new();
        for (index, step) in self.steps.iter_mut().enumerate() {
            if step.state == StepState::Complete || now < step.start {
                continue;
            }
            step.state = StepState::Active;
            let progress = ((now - step.start) / step.duration).min(1.0);
            step.apply(progress)?;
            if progress >= 1.0 {
                step.state = StepState::Complete;
                finished.push((step.end(), index));
            }
        }

        finished.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let mut callbacks: Vec<Callback> = finished
            .into_iter()
            .filter_map(|(_, index)| self.steps[index].on_complete.take())
            .collect();

        if self.steps.iter().all(|s| s.state == StepState::Complete) {
            self.state = TimelineState::Complete;
            callbacks.extend(self.on_complete.take());
        }
        Ok(callbacks)
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("time", &self.time)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
