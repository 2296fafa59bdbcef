// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cosmos Intro - interactive hero scene for a landing page
//!
//! Runs the hero scene headless:
//! - Composes the starfield, planet and title label
//! - Replays a scripted drag and click sequence
//! - Plays the terminal animation and reports the navigation
//!
//! ## Usage
//!
//! `cosmos_intro [config.ron]`. Without a path the built-in defaults are used.
//! Log verbosity follows `RUST_LOG`.

mod app;
mod config;
mod hero;
mod host;
mod navigation;
mod scene;

use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cosmos_intro=debug,cosmos_intro_sequencer=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cosmos Intro v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let result = app::load_config(path.as_deref())
        .map_err(app::AppError::from)
        .and_then(|config| app::run(&config));

    match result {
        Ok(report) => tracing::info!(
            "Finished after {} frames ({:.2}s), phase {:?}, navigated to {:?}",
            report.frames,
            report.elapsed,
            report.phase,
            report.navigations
        ),
        Err(e) => {
            tracing::error!("Cosmos Intro failed: {e}");
            std::process::exit(1);
        }
    }
}
