// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trigger-gated terminal animation.
//!
//! The [`Sequencer`] owns its trigger latch and its tween engine. The first
//! accepted trigger builds the configured preset, plays it, and hands the
//! navigator a single completion callback. Since the callback is an `FnOnce`
//! owned by one timeline, navigation can happen at most once.

use crate::config::SequencerConfig;
use crate::engine::{TimelineEvent, Tweener};
use crate::latch::TriggerLatch;
use crate::preset::TerminalPreset;
use crate::timeline::{Timeline, TimelineId};
use crate::transform::{Channel, TargetId, TargetRef};
use crate::tween::{Callback, TweenError};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

/// Sequencer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequencerError {
    /// Tween engine rejected or failed the timeline
    #[error("Tween error: {0}")]
    Tween(#[from] TweenError),

    /// Configuration cannot be scheduled
    #[error("Invalid sequencer configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;

/// Navigation capability consumed by the sequencer
pub trait Navigator {
    /// Navigate to `path`. Fire-and-forget.
    fn navigate(&self, path: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Lifecycle of the terminal animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerPhase {
    /// Waiting for a trigger
    #[default]
    Idle,
    /// Terminal timeline playing
    Running,
    /// Terminal timeline finished and navigation fired
    Completed,
    /// Terminal timeline failed before completion
    Failed,
}

/// Result of [`Sequencer::on_trigger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Terminal timeline started
    Started(TimelineId),
    /// Latch already set, nothing happened
    AlreadyTriggered,
    /// A required target is not mounted yet; latch left unset
    Unmounted,
}

/// Scene objects the presets animate
#[derive(Debug, Clone, Default)]
pub struct SequencerTargets {
    /// Camera
    pub camera: TargetRef,
    /// Scene root
    pub scene: TargetRef,
    /// Focus object (the planet)
    pub object: TargetRef,
    /// Label glyphs, in reading order
    pub glyphs: Vec<TargetRef>,
}

/// Trigger-gated terminal animation sequencer
pub struct Sequencer {
    config: SequencerConfig,
    targets: SequencerTargets,
    navigator: Rc<dyn Navigator>,
    latch: TriggerLatch,
    tweener: Tweener,
    terminal: Option<TimelineId>,
    phase: Rc<Cell<SequencerPhase>>,
}

impl Sequencer {
    /// Create a sequencer. The configuration is validated up front.
    pub fn new(
        config: SequencerConfig,
        targets: SequencerTargets,
        navigator: Rc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            targets,
            navigator,
            latch: TriggerLatch::new(),
            tweener: Tweener::new(),
            terminal: None,
            phase: Rc::new(Cell::new(SequencerPhase::Idle)),
        })
    }

    /// Handle a trigger event.
    ///
    /// Idempotent: once the latch is set further calls do nothing. When a
    /// required target is not mounted the trigger is ignored and may be
    /// retried. Tween errors propagate and leave the latch unset.
    pub fn on_trigger(&mut self) -> Result<TriggerOutcome> {
        if self.latch.is_set() {
            tracing::debug!("Trigger ignored: sequence already started");
            return Ok(TriggerOutcome::AlreadyTriggered);
        }
        if !self.targets_mounted() {
            tracing::warn!("Trigger ignored: {} targets not mounted", self.config.preset.name());
            return Ok(TriggerOutcome::Unmounted);
        }

        let timeline = self.build_terminal()?;
        let id = self.tweener.play(timeline)?;
        self.latch.set();
        self.terminal = Some(id);
        self.phase.set(SequencerPhase::Running);
        tracing::info!(
            "Started {} sequence ({:.2}s) toward {}",
            self.config.preset.name(),
            self.config.preset.duration(),
            self.config.destination
        );

        self.scatter_glyphs();
        Ok(TriggerOutcome::Started(id))
    }

    fn targets_mounted(&self) -> bool {
        match &self.config.preset {
            TerminalPreset::CameraFlight(_) => {
                self.targets.camera.is_mounted() && self.targets.scene.is_mounted()
            }
            TerminalPreset::ObjectRecede(_) => self.targets.object.is_mounted(),
        }
    }

    fn build_terminal(&self) -> std::result::Result<Timeline, TweenError> {
        let navigator = Rc::clone(&self.navigator);
        let phase = Rc::clone(&self.phase);
        let destination = self.config.destination.clone();
        let on_complete: Callback = Box::new(move || {
            phase.set(SequencerPhase::Completed);
            tracing::info!("Sequence complete, navigating to {destination}");
            navigator.navigate(&destination);
        });

        match &self.config.preset {
            TerminalPreset::CameraFlight(preset) => {
                preset.build(&self.targets.camera, &self.targets.scene, on_complete)
            }
            TerminalPreset::ObjectRecede(preset) => preset.build(&self.targets.object, on_complete),
        }
    }

    /// Fire-and-forget label animation. Failures are logged, never propagated.
    fn scatter_glyphs(&mut self) {
        let Some(scatter) = &self.config.glyph_scatter else {
            return;
        };
        let mut started = 0;
        for (index, glyph) in self.targets.glyphs.iter().enumerate() {
            if !glyph.is_mounted() {
                continue;
            }
            match self.tweener.tween("glyph-scatter", glyph, scatter.vars(index)) {
                Ok(_) => started += 1,
                Err(err) => tracing::warn!("Glyph {index} not animated: {err}"),
            }
        }
        tracing::debug!("Scattering {started} glyphs");
    }

    /// Advance all animations by one frame.
    ///
    /// Returns an error if the terminal timeline failed during this frame; the
    /// navigation callback is dropped in that case.
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        let mut failure = None;
        for event in self.tweener.advance(dt) {
            if let TimelineEvent::Failed(id, err) = event {
                if Some(id) == self.terminal {
                    failure = Some(err);
                } else {
                    tracing::warn!("Auxiliary animation failed: {err}");
                }
            }
        }

        match failure {
            Some(err) => {
                self.phase.set(SequencerPhase::Failed);
                Err(err.into())
            }
            None => Ok(()),
        }
    }

    /// Whether the trigger latch is set
    pub fn is_triggered(&self) -> bool {
        self.latch.is_set()
    }

    /// Current phase
    pub fn phase(&self) -> SequencerPhase {
        self.phase.get()
    }

    /// Terminal timeline while it is playing
    pub fn terminal_timeline(&self) -> Option<&Timeline> {
        self.terminal.and_then(|id| self.tweener.timeline(id))
    }

    /// Whether any animation still has to write `channel` on `target`
    pub fn claims(&self, target: TargetId, channel: Channel) -> bool {
        self.tweener.claims(target, channel)
    }

    /// Tween engine
    pub fn tweener(&self) -> &Tweener {
        &self.tweener
    }

    /// Configuration
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Animated targets
    pub fn targets(&self) -> &SequencerTargets {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;
    use crate::preset::{labels, CameraFlight, ObjectRecede};
    use crate::timeline::StepState;
    use crate::transform::{Axis, Transform};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: RefCell<Vec<(String, f32)>>,
        clock: Cell<f32>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visits.borrow_mut().push((path.to_string(), self.clock.get()));
        }
    }

    fn mounted_targets() -> SequencerTargets {
        SequencerTargets {
            camera: TargetRef::mounted(Transform::from_position([0.0, 0.0, 5.0])),
            scene: TargetRef::mounted(Transform::default()),
            object: TargetRef::mounted(Transform::default()),
            glyphs: (0..5).map(|_| TargetRef::mounted(Transform::default())).collect(),
        }
    }

    fn sequencer(config: SequencerConfig, targets: SequencerTargets) -> (Sequencer, Rc<RecordingNavigator>) {
        let navigator = Rc::new(RecordingNavigator::default());
        let sequencer = Sequencer::new(config, targets, navigator.clone()).unwrap();
        (sequencer, navigator)
    }

    /// Advance in fixed steps, keeping the navigator's clock in sync
    fn run(sequencer: &mut Sequencer, navigator: &RecordingNavigator, dt: f32, frames: usize) {
        for _ in 0..frames {
            navigator.clock.set(navigator.clock.get() + dt);
            sequencer.advance(dt).unwrap();
        }
    }

    fn flight(durations: [f32; 3], overlap: f32) -> SequencerConfig {
        SequencerConfig {
            preset: TerminalPreset::CameraFlight(CameraFlight {
                approach_duration: durations[0],
                spin_duration: durations[1],
                dive_duration: durations[2],
                spin_overlap: overlap,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_repeated_triggers_start_one_timeline() {
        let (mut sequencer, navigator) = sequencer(SequencerConfig::default(), mounted_targets());

        let first = sequencer.on_trigger().unwrap();
        assert!(matches!(first, TriggerOutcome::Started(_)));
        let timelines = sequencer.tweener().active_count();
        for _ in 0..5 {
            assert_eq!(sequencer.on_trigger().unwrap(), TriggerOutcome::AlreadyTriggered);
        }
        assert_eq!(sequencer.tweener().active_count(), timelines);

        run(&mut sequencer, &navigator, 0.25, 40);
        for _ in 0..3 {
            sequencer.on_trigger().unwrap();
        }
        run(&mut sequencer, &navigator, 0.25, 40);

        assert_eq!(navigator.visits.borrow().len(), 1);
        assert_eq!(navigator.visits.borrow()[0].0, "/next-page");
        assert_eq!(sequencer.phase(), SequencerPhase::Completed);
    }

    #[test]
    fn test_camera_flight_scenario() {
        let targets = mounted_targets();
        let camera = targets.camera.clone();
        let scene = targets.scene.clone();
        let (mut sequencer, navigator) = sequencer(flight([2.0, 3.0, 1.0], 1.0), targets);
        sequencer.on_trigger().unwrap();

        let progress = |s: &Sequencer, label: &str| {
            let step = s.terminal_timeline().unwrap().step_by_label(label).unwrap();
            (step.state(), step.progress())
        };

        // t = 1.0: spin is exactly at its start
        run(&mut sequencer, &navigator, 0.25, 4);
        assert_eq!(progress(&sequencer, labels::SPIN).1, 0.0);
        run(&mut sequencer, &navigator, 0.25, 1);
        assert!(progress(&sequencer, labels::SPIN).1 > 0.0);
        assert_eq!(progress(&sequencer, labels::APPROACH).0, StepState::Active);

        // t = 2.0: approach finished at its absolute position
        run(&mut sequencer, &navigator, 0.25, 3);
        assert_eq!(camera.read().unwrap().position, [0.0, 0.0, 50.0]);

        // t = 4.0: dive has not progressed while the spin was running
        while sequencer.terminal_timeline().unwrap().time() < 4.0 {
            assert_eq!(progress(&sequencer, labels::DIVE).1, 0.0);
            run(&mut sequencer, &navigator, 0.25, 1);
        }
        assert_eq!(progress(&sequencer, labels::SPIN).0, StepState::Complete);
        let rotation = scene.read().unwrap().rotation;
        assert_eq!(rotation[0], std::f32::consts::TAU);
        assert_eq!(rotation[1], std::f32::consts::TAU);
        assert!(navigator.visits.borrow().is_empty());

        // t = 4.75: not yet
        run(&mut sequencer, &navigator, 0.25, 3);
        assert!(navigator.visits.borrow().is_empty());

        // t = 5.0: exactly once
        run(&mut sequencer, &navigator, 0.25, 1);
        assert_eq!(*navigator.visits.borrow(), vec![("/next-page".to_string(), 5.0)]);
        assert_eq!(camera.read().unwrap().position[2], 0.0);

        run(&mut sequencer, &navigator, 0.25, 8);
        assert_eq!(navigator.visits.borrow().len(), 1);
    }

    #[test]
    fn test_object_recede_single_completion() {
        let targets = mounted_targets();
        let object = targets.object.clone();
        let config = SequencerConfig {
            preset: TerminalPreset::ObjectRecede(ObjectRecede {
                duration: 1.5,
                ease: Ease::POWER2_IN,
                ..Default::default()
            }),
            glyph_scatter: None,
            ..Default::default()
        };
        let (mut sequencer, navigator) = sequencer(config, targets);
        sequencer.on_trigger().unwrap();

        run(&mut sequencer, &navigator, 0.25, 5);
        assert!(navigator.visits.borrow().is_empty());

        run(&mut sequencer, &navigator, 0.25, 1);
        assert_eq!(*navigator.visits.borrow(), vec![("/next-page".to_string(), 1.5)]);
        let transform = object.read().unwrap();
        assert_eq!(transform.position[2], -10.0);
        assert_eq!(transform.scale, [0.01; 3]);

        run(&mut sequencer, &navigator, 0.25, 4);
        assert_eq!(navigator.visits.borrow().len(), 1);
    }

    #[test]
    fn test_unmounted_trigger_is_retryable() {
        let targets = SequencerTargets::default();
        let camera = targets.camera.clone();
        let scene = targets.scene.clone();
        let (mut sequencer, navigator) = sequencer(SequencerConfig::default(), targets);

        assert_eq!(sequencer.on_trigger().unwrap(), TriggerOutcome::Unmounted);
        assert!(!sequencer.is_triggered());
        assert!(sequencer.tweener().is_idle());
        assert_eq!(sequencer.phase(), SequencerPhase::Idle);

        run(&mut sequencer, &navigator, 0.5, 20);
        assert!(navigator.visits.borrow().is_empty());

        camera.mount(Rc::new(RefCell::new(Transform::default())));
        scene.mount(Rc::new(RefCell::new(Transform::default())));
        assert!(matches!(sequencer.on_trigger().unwrap(), TriggerOutcome::Started(_)));
        assert!(sequencer.is_triggered());
    }

    #[test]
    fn test_never_triggered_never_navigates() {
        let (mut sequencer, navigator) = sequencer(SequencerConfig::default(), mounted_targets());
        run(&mut sequencer, &navigator, 0.5, 40);
        assert!(navigator.visits.borrow().is_empty());
        assert_eq!(sequencer.phase(), SequencerPhase::Idle);
    }

    #[test]
    fn test_failure_mid_flight_suppresses_navigation() {
        let targets = mounted_targets();
        let scene = targets.scene.clone();
        let (mut sequencer, navigator) = sequencer(SequencerConfig::default(), targets);
        sequencer.on_trigger().unwrap();
        run(&mut sequencer, &navigator, 0.5, 3);

        scene.unmount();
        let err = sequencer.advance(0.5).unwrap_err();
        assert_eq!(err, SequencerError::Tween(TweenError::TargetDetached(scene.id())));
        assert_eq!(sequencer.phase(), SequencerPhase::Failed);

        scene.mount(Rc::new(RefCell::new(Transform::default())));
        run(&mut sequencer, &navigator, 0.5, 20);
        assert!(navigator.visits.borrow().is_empty());
        assert_eq!(sequencer.on_trigger().unwrap(), TriggerOutcome::AlreadyTriggered);
    }

    #[test]
    fn test_glyphs_scatter_without_delaying_completion() {
        let targets = mounted_targets();
        let glyphs = targets.glyphs.clone();
        let config = SequencerConfig {
            preset: TerminalPreset::ObjectRecede(ObjectRecede {
                duration: 0.5,
                ..Default::default()
            }),
            ..Default::default()
        };
        let (mut sequencer, navigator) = sequencer(config, targets);
        sequencer.on_trigger().unwrap();
        assert_eq!(sequencer.tweener().active_count(), 1 + glyphs.len());

        run(&mut sequencer, &navigator, 0.25, 2);
        assert_eq!(navigator.visits.borrow().len(), 1);
        // glyph scatter still running after navigation
        assert!(!sequencer.tweener().is_idle());

        run(&mut sequencer, &navigator, 0.25, 8);
        assert!(sequencer.tweener().is_idle());
        for glyph in &glyphs {
            let transform = glyph.read().unwrap();
            assert_eq!(transform.position[Axis::Y.index()], 2.0);
            assert_eq!(transform.scale, [0.0; 3]);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = flight([2.0, 0.0, 1.0], 1.0);
        let result = Sequencer::new(config, mounted_targets(), Rc::new(|_: &str| {}));
        assert!(matches!(result, Err(SequencerError::InvalidConfig(_))));
    }
}
