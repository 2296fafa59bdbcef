// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hero scene: composition, input routing and the per-frame update.

use crate::scene::{compose, HeroNodes, SceneConfig, SceneGraph};
use cosmos_intro_sequencer::{
    Channel, Navigator, PointerEvent, RotationController, RotationDriver, Sequencer,
    SequencerConfig, SequencerError, SequencerPhase, SequencerTargets, TriggerOutcome,
    WriteAuthority,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// What a pointer event hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hit {
    /// The planet sphere
    Planet,
    /// The click-catcher sphere
    Backdrop,
    /// Nothing pickable
    #[default]
    Nothing,
}

/// Input delivered by the host between frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeroInput {
    /// Raw pointer event
    Pointer {
        /// Event
        event: PointerEvent,
        /// Picked object
        #[serde(default)]
        hit: Hit,
    },
    /// Completed click
    Click {
        /// Picked object
        #[serde(default)]
        hit: Hit,
    },
}

/// Per-frame authority of both rotating objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Planet rotation authority
    pub planet: WriteAuthority,
    /// Starfield rotation authority
    pub stars: WriteAuthority,
}

/// The landing page's 3D hero section
pub struct HeroScene {
    graph: SceneGraph,
    nodes: HeroNodes,
    sequencer: Sequencer,
    planet: RotationController,
    stars: RotationController,
}

impl HeroScene {
    /// Compose the scene and wire the sequencer to its nodes.
    ///
    /// The graph starts unmounted; call [`HeroScene::mount`] before input.
    pub fn new(
        scene: &SceneConfig,
        sequencer: SequencerConfig,
        navigator: Rc<dyn Navigator>,
    ) -> Result<Self, SequencerError> {
        let mut graph = SceneGraph::new(scene.camera_position);
        let nodes = compose(&mut graph, scene);

        let targets = SequencerTargets {
            camera: graph.target(graph.camera()),
            scene: graph.target(graph.root()),
            object: graph.target(nodes.planet),
            glyphs: nodes.glyphs.iter().map(|id| graph.target(*id)).collect(),
        };
        let drag_sensitivity = sequencer.drag_sensitivity;
        let sequencer = Sequencer::new(sequencer, targets, navigator)?;

        let planet = RotationController::new(RotationDriver::new(
            graph.target(nodes.planet),
            scene.planet.angular_velocity,
        ))
        .with_drag(drag_sensitivity);
        let stars = RotationController::new(RotationDriver::new(
            graph.target(nodes.stars),
            scene.starfield.angular_velocity,
        ));

        tracing::debug!(
            "Composed hero scene: {} nodes, {} glyphs",
            graph.len(),
            nodes.glyphs.len()
        );

        Ok(Self {
            graph,
            nodes,
            sequencer,
            planet,
            stars,
        })
    }

    /// Attach the scene's transforms
    pub fn mount(&mut self) {
        self.graph.mount();
    }

    /// Detach the scene's transforms
    pub fn unmount(&mut self) {
        self.graph.unmount();
    }

    /// Advance one frame: arbitrate and drive rotation, then step animations.
    pub fn frame(&mut self, dt: f32) -> Result<FrameReport, SequencerError> {
        let planet_claimed = self
            .sequencer
            .claims(self.planet.target().id(), Channel::Rotation);
        let stars_claimed = self
            .sequencer
            .claims(self.stars.target().id(), Channel::Rotation);

        let report = FrameReport {
            planet: self.planet.frame(dt, planet_claimed),
            stars: self.stars.frame(dt, stars_claimed),
        };
        self.sequencer.advance(dt)?;
        Ok(report)
    }

    /// Route one input event.
    ///
    /// Drags start only on the planet and only while controls are enabled.
    /// Once controls are disabled an ongoing drag stops writing but still
    /// ends on release. Any click triggers the terminal sequence.
    pub fn input(&mut self, input: HeroInput) -> Result<Option<TriggerOutcome>, SequencerError> {
        match input {
            HeroInput::Pointer { event, hit } => {
                let enabled = self.controls_enabled();
                let starts_drag = matches!(event, PointerEvent::Down { .. });
                if starts_drag && (hit != Hit::Planet || !enabled) {
                    return Ok(None);
                }
                self.planet.set_drag_writes(enabled);
                self.planet.pointer(event);
                Ok(None)
            }
            HeroInput::Click { hit } => {
                tracing::debug!("Click on {hit:?}");
                self.sequencer.on_trigger().map(Some)
            }
        }
    }

    /// Whether user camera controls are still active
    pub fn controls_enabled(&self) -> bool {
        !self.sequencer.is_triggered()
    }

    /// Terminal sequence phase
    pub fn phase(&self) -> SequencerPhase {
        self.sequencer.phase()
    }

    /// Scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Node IDs of the hero parts
    pub fn nodes(&self) -> &HeroNodes {
        &self.nodes
    }

    /// Sequencer
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Whether the planet is being dragged
    pub fn is_dragging(&self) -> bool {
        self.planet.is_dragging()
    }
}
