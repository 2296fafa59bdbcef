// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application entry: builds the hero scene from config and runs the host.

use crate::config::{ConfigError, HeroConfig};
use crate::hero::HeroScene;
use crate::host::{HeadlessHost, RunReport};
use crate::navigation::RecordingNavigator;
use cosmos_intro_sequencer::SequencerError;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Top-level application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal animation failed
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

/// Load the config at `path`, or use defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<HeroConfig, ConfigError> {
    match path {
        Some(path) => HeroConfig::load(path),
        None => {
            tracing::info!("No config given, using defaults");
            Ok(HeroConfig::default())
        }
    }
}

/// Build the scene and run it headless
pub fn run(config: &HeroConfig) -> Result<RunReport, AppError> {
    config.validate()?;
    let navigator = Rc::new(RecordingNavigator::new());
    let mut hero = HeroScene::new(&config.scene, config.sequencer.clone(), navigator.clone())?;

    tracing::info!(
        "Running {} preset at {:.1} fps",
        config.sequencer.preset.name(),
        1.0 / config.host.frame_delta
    );
    let report = HeadlessHost::new(&config.host, &navigator).run(&mut hero)?;
    Ok(report)
}
