// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tween parameters: target values, placement on a timeline, callbacks.

use crate::ease::Ease;
use crate::transform::{Axis, Channel, Property, TargetId};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or advancing tweens
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    /// Property name does not name a transform scalar
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Ease name is not in the catalogue
    #[error("Unknown ease: {0}")]
    UnknownEase(String),

    /// Value string is neither a number nor a relative `+=`/`-=` value
    #[error("Invalid tween value: {0}")]
    InvalidValue(String),

    /// Position parameter string could not be parsed
    #[error("Invalid position parameter: {0}")]
    InvalidOffset(String),

    /// Duration is zero, negative or not finite
    #[error("Invalid duration: {0}")]
    InvalidDuration(f32),

    /// Offset refers to a label that has not been inserted yet
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Label is already used by an earlier step
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    /// Resolved start time lies before the timeline origin
    #[error("Step would start at {0}, before the timeline origin")]
    NegativeStart(f32),

    /// Tween animates nothing
    #[error("Tween has no properties")]
    EmptyTween,

    /// Timeline has no steps
    #[error("Timeline has no steps")]
    EmptyTimeline,

    /// Target was unmounted while one of its steps was running
    #[error("Target {0:?} is not mounted")]
    TargetDetached(TargetId),
}

/// Result type for tween operations
pub type Result<T> = std::result::Result<T, TweenError>;

/// Destination of a tweened property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    /// Absolute end value
    Absolute(f32),
    /// Offset added to the value captured when the step starts
    Relative(f32),
}

impl TweenValue {
    /// End value given the start value
    pub fn resolve(self, start: f32) -> f32 {
        match self {
            Self::Absolute(value) => value,
            Self::Relative(delta) => start + delta,
        }
    }
}

impl From<f32> for TweenValue {
    fn from(value: f32) -> Self {
        Self::Absolute(value)
    }
}

fn parse_number(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Split a `+=N` / `-=N` suffix into its signed amount
fn parse_relative(s: &str) -> Option<f32> {
    if let Some(rest) = s.strip_prefix("+=") {
        parse_number(rest)
    } else if let Some(rest) = s.strip_prefix("-=") {
        parse_number(rest).map(|v| -v)
    } else {
        None
    }
}

impl FromStr for TweenValue {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("+=") || s.starts_with("-=") {
            return parse_relative(s)
                .map(Self::Relative)
                .ok_or_else(|| TweenError::InvalidValue(s.to_string()));
        }
        parse_number(s)
            .map(Self::Absolute)
            .ok_or_else(|| TweenError::InvalidValue(s.to_string()))
    }
}

/// Placement of a step on its timeline
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Offset {
    /// At the current end of the timeline
    #[default]
    Sequential,
    /// Relative to the current end of the timeline (`"+=1"`, `"-=1"`)
    FromEnd(f32),
    /// Relative to the start of the previously inserted step (`"<"`)
    WithPrevious(f32),
    /// Absolute time on the timeline
    At(f32),
    /// Relative to the end of an already inserted, labelled step
    AfterLabel(String, f32),
}

impl FromStr for Offset {
    type Err = TweenError;

    /// Accepts `""`, `"+=N"`, `"-=N"`, `"<"`, `"<+=N"`, a plain number, or a
    /// label optionally followed by `+=N` / `-=N`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || TweenError::InvalidOffset(s.to_string());

        if s.is_empty() {
            return Ok(Self::Sequential);
        }
        if let Some(rest) = s.strip_prefix('<') {
            if rest.is_empty() {
                return Ok(Self::WithPrevious(0.0));
            }
            return parse_relative(rest).map(Self::WithPrevious).ok_or_else(invalid);
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return parse_relative(s).map(Self::FromEnd).ok_or_else(invalid);
        }
        if let Some(time) = parse_number(s) {
            return Ok(Self::At(time));
        }

        match s.find("+=").or_else(|| s.find("-=")) {
            Some(split) => {
                let (label, delta) = s.split_at(split);
                let delta = parse_relative(delta).ok_or_else(invalid)?;
                if label.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::AfterLabel(label.to_string(), delta))
            }
            None => Ok(Self::AfterLabel(s.to_string(), 0.0)),
        }
    }
}

/// Completion callback, consumed when it runs
pub type Callback = Box<dyn FnOnce()>;

/// Parameters of a single `to` tween
pub struct TweenVars {
    pub(crate) props: IndexMap<Property, TweenValue>,
    pub(crate) duration: f32,
    pub(crate) ease: Ease,
    pub(crate) offset: Offset,
    pub(crate) label: Option<String>,
    pub(crate) on_complete: Option<Callback>,
}

impl TweenVars {
    /// Create tween parameters with the given duration and the default ease
    pub fn new(duration: f32) -> Self {
        Self {
            props: IndexMap::new(),
            duration,
            ease: Ease::default(),
            offset: Offset::Sequential,
            label: None,
            on_complete: None,
        }
    }

    /// Animate one property
    pub fn prop(mut self, property: Property, value: impl Into<TweenValue>) -> Self {
        self.props.insert(property, value.into());
        self
    }

    /// Animate one property given by name, with a value string such as `"0"` or `"+=2"`
    pub fn prop_named(self, name: &str, value: &str) -> Result<Self> {
        let property: Property = name.parse()?;
        let value: TweenValue = value.parse()?;
        Ok(self.prop(property, value))
    }

    /// Animate every component of a channel to absolute values
    pub fn channel(mut self, channel: Channel, values: [f32; 3]) -> Self {
        for axis in Axis::ALL {
            self.props
                .insert(Property::new(channel, axis), TweenValue::Absolute(values[axis.index()]));
        }
        self
    }

    /// Animate all position components
    pub fn position(self, position: [f32; 3]) -> Self {
        self.channel(Channel::Position, position)
    }

    /// Animate all scale components to the same value
    pub fn uniform_scale(self, scale: f32) -> Self {
        self.channel(Channel::Scale, [scale; 3])
    }

    /// Set the easing curve
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set the easing curve by name
    pub fn ease_named(self, name: &str) -> Result<Self> {
        Ok(self.ease(name.parse()?))
    }

    /// Set the placement on the timeline
    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// Delay relative to the current end of the timeline
    pub fn delay(self, seconds: f32) -> Self {
        self.offset(Offset::FromEnd(seconds))
    }

    /// Name the step so later steps can be placed after it
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Run `callback` once when this step reaches full progress
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for TweenVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenVars")
            .field("props", &self.props)
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("offset", &self.offset)
            .field("label", &self.label)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}
