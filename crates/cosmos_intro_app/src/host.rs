// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless frame loop.
//!
//! Stands in for the browser's render loop: mounts the scene, replays a
//! scripted input sequence at fixed frame numbers and steps the hero scene
//! with a fixed delta until navigation happens or the frame cap is reached.

use crate::config::ConfigError;
use crate::hero::{HeroInput, HeroScene, Hit};
use crate::navigation::RecordingNavigator;
use cosmos_intro_sequencer::{PointerEvent, SequencerError, SequencerPhase, TriggerOutcome};
use serde::{Deserialize, Serialize};

/// Input delivered before a given frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Frame number the input arrives before
    pub frame: u64,
    /// Input event
    pub input: HeroInput,
}

impl ScriptedInput {
    /// Create a scripted input
    pub fn new(frame: u64, input: HeroInput) -> Self {
        Self { frame, input }
    }
}

/// Host loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Seconds per frame
    pub frame_delta: f32,
    /// Hard stop
    pub max_frames: u64,
    /// Frame at which the scene mounts
    pub mount_frame: u64,
    /// Stop as soon as navigation happened
    pub stop_after_navigation: bool,
    /// Inputs to replay
    pub script: Vec<ScriptedInput>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_delta: 1.0 / 60.0,
            max_frames: 1800,
            mount_frame: 0,
            stop_after_navigation: true,
            script: default_script(),
        }
    }
}

impl HostConfig {
    /// Check the loop can run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_delta.is_finite() && self.frame_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "frame_delta must be positive, got {}",
                self.frame_delta
            )));
        }
        if self.max_frames == 0 {
            return Err(ConfigError::Invalid("max_frames must be at least 1".into()));
        }
        Ok(())
    }
}

/// A short drag across the planet followed by a double click on the backdrop
fn default_script() -> Vec<ScriptedInput> {
    let mut script = vec![ScriptedInput::new(
        30,
        HeroInput::Pointer {
            event: PointerEvent::Down {
                position: [400.0, 300.0],
            },
            hit: Hit::Planet,
        },
    )];
    script.extend((1..=10).map(|step| {
        ScriptedInput::new(
            30 + step,
            HeroInput::Pointer {
                event: PointerEvent::Move {
                    position: [400.0 + 8.0 * step as f32, 300.0],
                },
                hit: Hit::Planet,
            },
        )
    }));
    script.push(ScriptedInput::new(
        41,
        HeroInput::Pointer {
            event: PointerEvent::Up {
                position: [480.0, 300.0],
            },
            hit: Hit::Planet,
        },
    ));
    script.push(ScriptedInput::new(60, HeroInput::Click { hit: Hit::Backdrop }));
    script.push(ScriptedInput::new(61, HeroInput::Click { hit: Hit::Backdrop }));
    script
}

/// Summary of a host run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
    /// Frames stepped
    pub frames: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Frame on which the terminal sequence started
    pub triggered_at: Option<u64>,
    /// Triggers ignored by the latch
    pub ignored_triggers: usize,
    /// Paths navigated to
    pub navigations: Vec<String>,
    /// Final sequencer phase
    pub phase: SequencerPhase,
}

/// Drives a [`HeroScene`] without a window
pub struct HeadlessHost<'a> {
    config: &'a HostConfig,
    navigator: &'a RecordingNavigator,
}

impl<'a> HeadlessHost<'a> {
    /// Create a host reading navigations from `navigator`
    pub fn new(config: &'a HostConfig, navigator: &'a RecordingNavigator) -> Self {
        Self { config, navigator }
    }

    /// Run until navigation (if configured) or the frame cap
    pub fn run(&self, hero: &mut HeroScene) -> Result<RunReport, SequencerError> {
        let mut script: Vec<&ScriptedInput> = self.config.script.iter().collect();
        script.sort_by_key(|s| s.frame);
        let mut pending = script.into_iter().peekable();

        let mut report = RunReport::default();
        for frame in 0..self.config.max_frames {
            if frame == self.config.mount_frame {
                hero.mount();
            }

            while let Some(scripted) = pending.next_if(|s| s.frame <= frame) {
                match hero.input(scripted.input)? {
                    Some(TriggerOutcome::Started(_)) => report.triggered_at = Some(frame),
                    Some(TriggerOutcome::AlreadyTriggered) => report.ignored_triggers += 1,
                    Some(TriggerOutcome::Unmounted) => {
                        tracing::warn!("Frame {frame}: click before the scene mounted");
                    }
                    None => {}
                }
            }

            hero.frame(self.config.frame_delta)?;
            report.frames = frame + 1;
            report.elapsed += self.config.frame_delta;

            if self.config.stop_after_navigation && self.navigator.last().is_some() {
                break;
            }
        }

        report.navigations = self.navigator.visits();
        report.phase = hero.phase();
        tracing::debug!("Host stopped after {} frames", report.frames);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneConfig;
    use cosmos_intro_sequencer::SequencerConfig;
    use std::rc::Rc;

    fn run(config: &HostConfig) -> RunReport {
        let navigator = Rc::new(RecordingNavigator::new());
        let mut hero =
            HeroScene::new(&SceneConfig::default(), SequencerConfig::default(), navigator.clone())
                .unwrap();
        HeadlessHost::new(config, &navigator).run(&mut hero).unwrap()
    }

    #[test]
    fn test_default_script_navigates_once() {
        let config = HostConfig {
            frame_delta: 0.25,
            script: default_script(),
            ..Default::default()
        };
        let report = run(&config);
        assert_eq!(report.triggered_at, Some(60));
        assert_eq!(report.ignored_triggers, 1);
        assert_eq!(report.navigations, vec!["/next-page".to_string()]);
        assert_eq!(report.phase, SequencerPhase::Completed);
        // 5 s flight at 4 frames per second, starting on frame 60
        assert_eq!(report.frames, 80);
    }

    #[test]
    fn test_click_before_mount_is_retried() {
        let config = HostConfig {
            frame_delta: 0.5,
            mount_frame: 2,
            script: vec![
                ScriptedInput::new(0, HeroInput::Click { hit: Hit::Backdrop }),
                ScriptedInput::new(3, HeroInput::Click { hit: Hit::Backdrop }),
            ],
            ..Default::default()
        };
        let report = run(&config);
        assert_eq!(report.triggered_at, Some(3));
        assert_eq!(report.ignored_triggers, 0);
        assert_eq!(report.navigations.len(), 1);
    }

    #[test]
    fn test_no_click_runs_to_frame_cap() {
        let config = HostConfig {
            max_frames: 10,
            script: Vec::new(),
            ..Default::default()
        };
        let report = run(&config);
        assert_eq!(report.frames, 10);
        assert!(report.navigations.is_empty());
        assert_eq!(report.phase, SequencerPhase::Idle);
    }

    #[test]
    fn test_validate() {
        assert!(HostConfig::default().validate().is_ok());
        let zero = HostConfig {
            frame_delta: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));
        let capped = HostConfig {
            max_frames: 0,
            ..Default::default()
        };
        assert!(matches!(capped.validate(), Err(ConfigError::Invalid(_))));
    }
}
