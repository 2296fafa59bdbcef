// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer configuration.

use crate::preset::{CameraFlight, GlyphScatter, ObjectRecede, TerminalPreset};
use crate::sequencer::SequencerError;
use serde::{Deserialize, Serialize};

/// Default destination of the terminal navigation
pub const DEFAULT_DESTINATION: &str = "/next-page";

/// Configuration of a [`Sequencer`](crate::Sequencer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Path handed to the navigator once the terminal animation completes
    pub destination: String,
    /// Terminal animation
    pub preset: TerminalPreset,
    /// Label scatter fired alongside the terminal animation, if any
    pub glyph_scatter: Option<GlyphScatter>,
    /// Radians of rotation per pixel of drag
    pub drag_sensitivity: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            preset: TerminalPreset::default(),
            glyph_scatter: Some(GlyphScatter::default()),
            drag_sensitivity: 0.01,
        }
    }
}

fn check_duration(what: &str, duration: f32) -> Result<(), SequencerError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(SequencerError::InvalidConfig(format!(
            "{what} duration must be positive, got {duration}"
        )))
    }
}

impl SequencerConfig {
    /// Reject values the presets cannot schedule
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.destination.is_empty() {
            return Err(SequencerError::InvalidConfig("destination is empty".into()));
        }
        if !self.drag_sensitivity.is_finite() {
            return Err(SequencerError::InvalidConfig(
                "drag sensitivity must be finite".into(),
            ));
        }

        match &self.preset {
            TerminalPreset::CameraFlight(CameraFlight {
                approach_duration,
                spin_overlap,
                spin_duration,
                dive_duration,
                ..
            }) => {
                check_duration("approach", *approach_duration)?;
                check_duration("spin", *spin_duration)?;
                check_duration("dive", *dive_duration)?;
                if !spin_overlap.is_finite() || *spin_overlap > *approach_duration {
                    return Err(SequencerError::InvalidConfig(format!(
                        "spin overlap {spin_overlap} exceeds approach duration {approach_duration}"
                    )));
                }
            }
            TerminalPreset::ObjectRecede(ObjectRecede { duration, .. }) => {
                check_duration("recede", *duration)?;
            }
        }

        if let Some(scatter) = &self.glyph_scatter {
            check_duration("glyph", scatter.duration)?;
            if !scatter.stagger.is_finite() || scatter.stagger < 0.0 {
                return Err(SequencerError::InvalidConfig(format!(
                    "glyph stagger must be non-negative, got {}",
                    scatter.stagger
                )));
            }
        }
        Ok(())
    }
}
