// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named timeline presets for the terminal animation and the label scatter.

use crate::ease::{Ease, EaseDirection};
use crate::timeline::Timeline;
use crate::transform::{Axis, Channel, Property, TargetRef};
use crate::tween::{Callback, Offset, Result, TweenValue, TweenVars};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Step labels used by the camera-flight preset
pub mod labels {
    /// Camera approach
    pub const APPROACH: &str = "approach";
    /// Scene spin
    pub const SPIN: &str = "spin";
    /// Final camera dive
    pub const DIVE: &str = "dive";
    /// Object recede along an axis
    pub const RECEDE: &str = "recede";
    /// Object shrink
    pub const SHRINK: &str = "shrink";
}

/// Camera flies out, the scene spins, then the camera dives in.
///
/// The timeline's own completion callback carries the terminal side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFlight {
    /// Absolute camera position reached by the first step
    pub approach_position: [f32; 3],
    /// Duration of the approach
    pub approach_duration: f32,
    /// Ease of the approach
    pub approach_ease: Ease,
    /// How long before the approach ends the spin starts
    pub spin_overlap: f32,
    /// Scene rotation reached by the spin, per axis
    pub spin_rotation: Vec<(Axis, f32)>,
    /// Duration of the spin
    pub spin_duration: f32,
    /// Ease of the spin
    pub spin_ease: Ease,
    /// Camera components animated by the dive
    pub dive_position: Vec<(Axis, f32)>,
    /// Duration of the dive
    pub dive_duration: f32,
    /// Ease of the dive
    pub dive_ease: Ease,
}

impl Default for CameraFlight {
    fn default() -> Self {
        Self {
            approach_position: [0.0, 0.0, 50.0],
            approach_duration: 2.0,
            approach_ease: Ease::POWER2_IN_OUT,
            spin_overlap: 1.0,
            spin_rotation: vec![(Axis::X, TAU), (Axis::Y, TAU)],
            spin_duration: 3.0,
            spin_ease: Ease::POWER2_IN_OUT,
            dive_position: vec![(Axis::Z, 0.0)],
            dive_duration: 1.0,
            dive_ease: Ease::POWER2_IN,
        }
    }
}

impl CameraFlight {
    /// Build the three-step timeline. `on_complete` runs after the dive ends.
    ///
    /// The dive starts once both the approach and the spin are over, so it never
    /// overlaps the approach's writes to the camera position.
    pub fn build(&self, camera: &TargetRef, scene: &TargetRef, on_complete: Callback) -> Result<Timeline> {
        let spin = self.spin_rotation.iter().fold(
            TweenVars::new(self.spin_duration),
            |vars, &(axis, angle)| vars.prop(Property::rotation(axis), angle),
        );
        let dive = self.dive_position.iter().fold(
            TweenVars::new(self.dive_duration),
            |vars, &(axis, value)| vars.prop(Property::position(axis), value),
        );

        Timeline::new("camera-flight")
            .with_on_complete(on_complete)
            .to(
                camera,
                TweenVars::new(self.approach_duration)
                    .position(self.approach_position)
                    .ease(self.approach_ease)
                    .label(labels::APPROACH),
            )?
            .to(
                scene,
                spin.ease(self.spin_ease)
                    .offset(Offset::FromEnd(-self.spin_overlap))
                    .label(labels::SPIN),
            )?
            .to(
                camera,
                dive.ease(self.dive_ease)
                    .offset(Offset::Sequential)
                    .label(labels::DIVE),
            )
    }
}

/// Object slides along one axis while shrinking toward zero.
///
/// Both steps start together and share duration and ease; only the shrink
/// step carries the terminal side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRecede {
    /// Axis the object moves along
    pub axis: Axis,
    /// Absolute position reached on that axis
    pub position: f32,
    /// Uniform scale reached at the end
    pub scale: f32,
    /// Shared duration
    pub duration: f32,
    /// Shared ease
    pub ease: Ease,
}

impl Default for ObjectRecede {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            position: -10.0,
            scale: 0.01,
            duration: 2.0,
            ease: Ease::POWER2_IN_OUT,
        }
    }
}

impl ObjectRecede {
    /// Build the two concurrent steps. `on_complete` is attached to the shrink step.
    pub fn build(&self, object: &TargetRef, on_complete: Callback) -> Result<Timeline> {
        Timeline::new("object-recede")
            .to(
                object,
                TweenVars::new(self.duration)
                    .prop(Property::position(self.axis), self.position)
                    .ease(self.ease)
                    .label(labels::RECEDE),
            )?
            .to(
                object,
                TweenVars::new(self.duration)
                    .uniform_scale(self.scale)
                    .ease(self.ease)
                    .offset(Offset::WithPrevious(0.0))
                    .label(labels::SHRINK)
                    .on_complete(on_complete),
            )
    }
}

/// Terminal animation played once the scene is triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminalPreset {
    /// Camera flight through a spinning scene
    CameraFlight(CameraFlight),
    /// Object recedes and shrinks
    ObjectRecede(ObjectRecede),
}

impl Default for TerminalPreset {
    fn default() -> Self {
        Self::CameraFlight(CameraFlight::default())
    }
}

impl TerminalPreset {
    /// Preset name
    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraFlight(_) => "camera-flight",
            Self::ObjectRecede(_) => "object-recede",
        }
    }

    /// Total duration of the preset's timeline
    pub fn duration(&self) -> f32 {
        match self {
            Self::CameraFlight(p) => {
                let spin_end = p.approach_duration - p.spin_overlap + p.spin_duration;
                p.approach_duration.max(spin_end) + p.dive_duration
            }
            Self::ObjectRecede(p) => p.duration,
        }
    }
}

/// Per-glyph displacement of the label, staggered by glyph index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphScatter {
    /// Vertical displacement added to each glyph
    pub rise: f32,
    /// Depth displacement added to each glyph
    pub drift: f32,
    /// Scale reached by each glyph
    pub scale: f32,
    /// Duration per glyph
    pub duration: f32,
    /// Delay between consecutive glyphs
    pub stagger: f32,
    /// Ease per glyph
    pub ease: Ease,
}

impl Default for GlyphScatter {
    fn default() -> Self {
        Self {
            rise: 2.0,
            drift: 1.0,
            scale: 0.0,
            duration: 1.0,
            stagger: 0.05,
            ease: Ease::Power(2, EaseDirection::Out),
        }
    }
}

impl GlyphScatter {
    /// Tween parameters for the glyph at `index`
    pub fn vars(&self, index: usize) -> TweenVars {
        TweenVars::new(self.duration)
            .prop(Property::position(Axis::Y), TweenValue::Relative(self.rise))
            .prop(Property::position(Axis::Z), TweenValue::Relative(self.drift))
            .channel(Channel::Scale, [self.scale; 3])
            .ease(self.ease)
            .delay(index as f32 * self.stagger)
    }
}
