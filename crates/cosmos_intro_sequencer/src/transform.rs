// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transform targets shared between the scene and the animation core.
//!
//! The scene owns every [`Transform`]. Animation code only ever holds a
//! [`TargetRef`], a mount slot that stays empty until the owning object is
//! mounted and is cleared again on unmount.

use crate::tween::TweenError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a transform target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    /// Create a new random target ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Cartesian axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes in component order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Transform channel (a group of three scalars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Position
    Position,
    /// Euler rotation in radians
    Rotation,
    /// Scale
    Scale,
}

impl Channel {
    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }
}

/// A single animatable scalar on a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    /// Channel the scalar lives in
    pub channel: Channel,
    /// Component within the channel
    pub axis: Axis,
}

impl Property {
    /// Create a property from channel and axis
    pub const fn new(channel: Channel, axis: Axis) -> Self {
        Self { channel, axis }
    }

    /// Position component
    pub const fn position(axis: Axis) -> Self {
        Self::new(Channel::Position, axis)
    }

    /// Rotation component
    pub const fn rotation(axis: Axis) -> Self {
        Self::new(Channel::Rotation, axis)
    }

    /// Scale component
    pub const fn scale(axis: Axis) -> Self {
        Self::new(Channel::Scale, axis)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.channel.name(), self.axis.name())
    }
}

impl FromStr for Property {
    type Err = TweenError;

    /// Parses `"position.x"`, `"rotation.y"`, `"scale.z"` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TweenError::UnknownProperty(s.to_string());
        let (channel, axis) = s.trim().split_once('.').ok_or_else(unknown)?;
        let channel = match channel {
            "position" => Channel::Position,
            "rotation" => Channel::Rotation,
            "scale" => Channel::Scale,
            _ => return Err(unknown()),
        };
        let axis = match axis {
            "x" => Axis::X,
            "y" => Axis::Y,
            "z" => Axis::Z,
            _ => return Err(unknown()),
        };
        Ok(Self::new(channel, axis))
    }
}

/// Position, rotation and scale of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in euler angles (radians, unbounded)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Transform at a position with identity rotation and unit scale
    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set a uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }

    fn channel(&self, channel: Channel) -> &[f32; 3] {
        match channel {
            Channel::Position => &self.position,
            Channel::Rotation => &self.rotation,
            Channel::Scale => &self.scale,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut [f32; 3] {
        match channel {
            Channel::Position => &mut self.position,
            Channel::Rotation => &mut self.rotation,
            Channel::Scale => &mut self.scale,
        }
    }

    /// Read a single property
    pub fn get(&self, property: Property) -> f32 {
        self.channel(property.channel)[property.axis.index()]
    }

    /// Write a single property
    pub fn set(&mut self, property: Property, value: f32) {
        self.channel_mut(property.channel)[property.axis.index()] = value;
    }
}

/// Shared handle to a mounted transform
pub type SharedTransform = Rc<RefCell<Transform>>;

/// Mount slot referring to a transform owned elsewhere.
///
/// Clones share the same slot, so a sequencer created before the scene mounts
/// observes the transform as soon as it is mounted.
#[derive(Clone, Default)]
pub struct TargetRef {
    id: TargetId,
    slot: Rc<RefCell<Option<SharedTransform>>>,
}

impl TargetRef {
    /// Create an empty (unmounted) target reference
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reference that is already mounted to a fresh transform
    pub fn mounted(transform: Transform) -> Self {
        let target = Self::new();
        target.mount(Rc::new(RefCell::new(transform)));
        target
    }

    /// Target ID
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Attach the slot to a transform
    pub fn mount(&self, transform: SharedTransform) {
        *self.slot.borrow_mut() = Some(transform);
    }

    /// Detach the slot, returning the previously mounted transform
    pub fn unmount(&self) -> Option<SharedTransform> {
        self.slot.borrow_mut().take()
    }

    /// Whether a transform is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Shared handle to the mounted transform
    pub fn get(&self) -> Option<SharedTransform> {
        self.slot.borrow().clone()
    }

    /// Copy of the current transform
    pub fn read(&self) -> Option<Transform> {
        self.slot.borrow().as_ref().map(|t| *t.borrow())
    }

    /// Mutate the mounted transform, returning `None` when unmounted
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Transform) -> R) -> Option<R> {
        let transform = self.get()?;
        let mut guard = transform.borrow_mut();
        Some(f(&mut guard))
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRef")
            .field("id", &self.id)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_parsing() {
        let property: Property = "rotation.y".parse().unwrap();
        assert_eq!(property, Property::rotation(Axis::Y));
        assert_eq!(property.to_string(), "rotation.y");

        assert!(matches!(
            "colour.x".parse::<Property>(),
            Err(TweenError::UnknownProperty(_))
        ));
        assert!("position".parse::<Property>().is_err());
        assert!("scale.w".parse::<Property>().is_err());
    }

    #[test]
    fn test_transform_get_set() {
        let mut transform = Transform::default();
        transform.set(Property::scale(Axis::Z), 0.5);
        transform.set(Property::position(Axis::X), 3.0);
        assert_eq!(transform.scale, [1.0, 1.0, 0.5]);
        assert_eq!(transform.get(Property::position(Axis::X)), 3.0);
    }

    #[test]
    fn test_target_ref_shares_slot() {
        let target = TargetRef::new();
        let alias = target.clone();
        assert!(!alias.is_mounted());
        assert!(alias.with_mut(|t| t.position[0] = 1.0).is_none());

        target.mount(Rc::new(RefCell::new(Transform::default())));
        assert!(alias.is_mounted());
        alias.with_mut(|t| t.position[0] = 1.0);
        assert_eq!(target.read().unwrap().position[0], 1.0);
        assert_eq!(alias.id(), target.id());

        target.unmount();
        assert!(!alias.is_mounted());
    }
}
