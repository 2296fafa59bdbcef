// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer tracking and drag-to-rotate.

use crate::transform::{Axis, Property, TargetRef};
use serde::{Deserialize, Serialize};

/// Raw pointer event in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed
    Down {
        /// Pointer position
        position: [f32; 2],
    },
    /// Pointer moved
    Move {
        /// Pointer position
        position: [f32; 2],
    },
    /// Button released
    Up {
        /// Pointer position
        position: [f32; 2],
    },
}

/// Drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// Dragging
    Dragging {
        /// Last recorded pointer position
        last: [f32; 2],
    },
}

/// Turns pointer events into drag deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    state: DragState,
}

impl PointerTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an event, returning the movement since the last recorded position
    pub fn handle(&mut self, event: PointerEvent) -> Option<[f32; 2]> {
        match (event, self.state) {
            (PointerEvent::Down { position }, _) => {
                self.state = DragState::Dragging { last: position };
                None
            }
            (PointerEvent::Move { position }, DragState::Dragging { last }) => {
                self.state = DragState::Dragging { last: position };
                Some([position[0] - last[0], position[1] - last[1]])
            }
            (PointerEvent::Move { .. }, DragState::Idle) => None,
            (PointerEvent::Up { .. }, _) => {
                self.state = DragState::Idle;
                None
            }
        }
    }

    /// Current state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }
}

/// Applies drag deltas as incremental rotation of a target.
///
/// Horizontal movement turns the target around Y, vertical movement around X.
#[derive(Debug, Clone)]
pub struct DragCoordinator {
    tracker: PointerTracker,
    target: TargetRef,
    sensitivity: f32,
}

impl DragCoordinator {
    /// Create a coordinator rotating `target` by `sensitivity` radians per pixel
    pub fn new(target: TargetRef, sensitivity: f32) -> Self {
        Self {
            tracker: PointerTracker::new(),
            target,
            sensitivity,
        }
    }

    /// Handle a pointer event. When `may_write` is false the drag state is
    /// still tracked but the target is left untouched.
    ///
    /// Returns the rotation delta applied, if any.
    pub fn handle(&mut self, event: PointerEvent, may_write: bool) -> Option<[f32; 2]> {
        let was_dragging = self.tracker.is_dragging();
        let delta = self.tracker.handle(event);
        match (was_dragging, self.tracker.is_dragging()) {
            (false, true) => tracing::debug!("Drag started"),
            (true, false) => tracing::debug!("Drag ended"),
            _ => {}
        }

        let [dx, dy] = delta?;
        if !may_write {
            return None;
        }
        let rotation = [dx * self.sensitivity, dy * self.sensitivity];
        self.target.with_mut(|transform| {
            let yaw = Property::rotation(Axis::Y);
            let pitch = Property::rotation(Axis::X);
            transform.set(yaw, transform.get(yaw) + rotation[0]);
            transform.set(pitch, transform.get(pitch) + rotation[1]);
        })?;
        Some(rotation)
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    /// Dragged target
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Radians per pixel
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn drag(coordinator: &mut DragCoordinator, path: &[[f32; 2]]) {
        coordinator.handle(PointerEvent::Down { position: path[0] }, true);
        for &position in &path[1..] {
            coordinator.handle(PointerEvent::Move { position }, true);
        }
        let last = path[path.len() - 1];
        coordinator.handle(PointerEvent::Up { position: last }, true);
    }

    #[test]
    fn test_tracker_state_machine() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.handle(PointerEvent::Move { position: [5.0, 5.0] }), None);
        assert!(!tracker.is_dragging());

        tracker.handle(PointerEvent::Down { position: [10.0, 10.0] });
        assert_eq!(tracker.state(), DragState::Dragging { last: [10.0, 10.0] });
        assert_eq!(
            tracker.handle(PointerEvent::Move { position: [13.0, 6.0] }),
            Some([3.0, -4.0])
        );
        tracker.handle(PointerEvent::Up { position: [13.0, 6.0] });
        assert_eq!(tracker.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_rotation_is_path_independent() {
        for path in [
            vec![[100.0, 100.0], [150.0, 100.0]],
            vec![[100.0, 100.0], [110.0, 100.0], [125.0, 100.0], [150.0, 100.0]],
            vec![[100.0, 100.0], [180.0, 100.0], [90.0, 100.0], [150.0, 100.0]],
        ] {
            let target = TargetRef::mounted(Transform::default());
            let mut coordinator = DragCoordinator::new(target.clone(), 0.01);
            drag(&mut coordinator, &path);
            let rotation = target.read().unwrap().rotation;
            assert!((rotation[1] - 0.5).abs() < 1e-5, "{path:?} -> {rotation:?}");
            assert_eq!(rotation[0], 0.0);
        }
    }

    #[test]
    fn test_blocked_drag_tracks_without_writing() {
        let target = TargetRef::mounted(Transform::default());
        let mut coordinator = DragCoordinator::new(target.clone(), 0.01);
        coordinator.handle(PointerEvent::Down { position: [0.0, 0.0] }, true);
        assert_eq!(coordinator.handle(PointerEvent::Move { position: [40.0, 0.0] }, false), None);
        assert!(coordinator.is_dragging());
        assert_eq!(target.read().unwrap().rotation, [0.0; 3]);

        // the blocked span is not replayed later
        coordinator.handle(PointerEvent::Move { position: [50.0, 0.0] }, true);
        assert!((target.read().unwrap().rotation[1] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_unmounted_target_is_ignored() {
        let mut coordinator = DragCoordinator::new(TargetRef::new(), 0.01);
        coordinator.handle(PointerEvent::Down { position: [0.0, 0.0] }, true);
        assert_eq!(coordinator.handle(PointerEvent::Move { position: [1.0, 0.0] }, true), None);
        assert!(coordinator.is_dragging());
    }
}
