// SPDX-License-Identifier: MIT OR Apache-2.0
//! Continuous rotation and per-frame write arbitration.
//!
//! Three sources may want to write a target's rotation: the continuous
//! driver, a drag, and the tween engine. [`arbitrate`] picks exactly one per
//! frame; the others stay hands-off until the next evaluation.

use crate::drag::{DragCoordinator, PointerEvent};
use crate::transform::{Axis, Channel, Property, TargetRef};

/// Which source may write a target's rotation this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteAuthority {
    /// Target not mounted; nobody writes
    #[default]
    Unmounted,
    /// A tween still has to write the rotation
    Tween,
    /// A drag is in progress
    Drag,
    /// Continuous rotation driver
    Driver,
}

/// Decide who writes rotation this frame. Tweens win over drags, drags over the driver.
pub fn arbitrate(mounted: bool, tweening: bool, dragging: bool) -> WriteAuthority {
    if !mounted {
        WriteAuthority::Unmounted
    } else if tweening {
        WriteAuthority::Tween
    } else if dragging {
        WriteAuthority::Drag
    } else {
        WriteAuthority::Driver
    }
}

/// Advances a target's rotation about one axis at a constant angular velocity
#[derive(Debug, Clone)]
pub struct RotationDriver {
    target: TargetRef,
    axis: Axis,
    /// Radians per second
    pub angular_velocity: f32,
}

impl RotationDriver {
    /// Rotate `target` about Y
    pub fn new(target: TargetRef, angular_velocity: f32) -> Self {
        Self {
            target,
            axis: Axis::Y,
            angular_velocity,
        }
    }

    /// Rotate about a different axis
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Advance by one frame. The angle is left unbounded.
    pub fn frame(&self, dt: f32) -> bool {
        let property = Property::rotation(self.axis);
        let step = self.angular_velocity * dt;
        self.target
            .with_mut(|t| t.set(property, t.get(property) + step))
            .is_some()
    }

    /// Rotated target
    pub fn target(&self) -> &TargetRef {
        &self.target
    }
}

/// Continuous rotation plus optional drag for one target, arbitrated per frame
#[derive(Debug, Clone)]
pub struct RotationController {
    driver: RotationDriver,
    drag: Option<DragCoordinator>,
    authority: WriteAuthority,
    tween_claim: bool,
    drag_writes: bool,
}

impl RotationController {
    /// Controller without drag support
    pub fn new(driver: RotationDriver) -> Self {
        Self {
            driver,
            drag: None,
            authority: WriteAuthority::Unmounted,
            tween_claim: false,
            drag_writes: true,
        }
    }

    /// Allow dragging the driver's target
    pub fn with_drag(mut self, sensitivity: f32) -> Self {
        self.drag = Some(DragCoordinator::new(self.driver.target.clone(), sensitivity));
        self
    }

    /// Evaluate authority for this frame and run the driver if it holds it.
    ///
    /// `tweening` tells whether an animation still claims this target's rotation.
    pub fn frame(&mut self, dt: f32, tweening: bool) -> WriteAuthority {
        self.tween_claim = tweening;
        self.authority = arbitrate(self.driver.target.is_mounted(), tweening, self.is_dragging());
        if self.authority == WriteAuthority::Driver {
            self.driver.frame(dt);
        }
        self.authority
    }

    /// Route a pointer event to the drag coordinator.
    ///
    /// Drags write only while drag writes are enabled, the target is mounted
    /// and the last frame saw no tween claiming the rotation.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<[f32; 2]> {
        let may_write = self.drag_writes
            && arbitrate(self.driver.target.is_mounted(), self.tween_claim, true) == WriteAuthority::Drag;
        self.drag.as_mut()?.handle(event, may_write)
    }

    /// Enable or disable drag writes. Pointer events are still tracked while
    /// disabled, so an ongoing drag ends cleanly on release.
    pub fn set_drag_writes(&mut self, enabled: bool) {
        self.drag_writes = enabled;
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(DragCoordinator::is_dragging)
    }

    /// Authority from the last evaluation
    pub fn authority(&self) -> WriteAuthority {
        self.authority
    }

    /// Channel this controller writes
    pub fn channel(&self) -> Channel {
        Channel::Rotation
    }

    /// Controlled target
    pub fn target(&self) -> &TargetRef {
        &self.driver.target
    }
}
