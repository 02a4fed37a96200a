//! The caller-owned frame loop.

use std::time::Duration;

use anyhow::{Context, Result};
use neogrid_core::{MatrixDisplay, Mode, Scene, Simulation};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::mode::ModeConfig;

/// Whether the loop keeps going after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Run the next frame.
    Continue,
    /// An interrupt arrived; blank the display and stop.
    Stop,
}

/// Sits between frames. The pause is the only place a run can be
/// interrupted.
pub trait Pacer {
    /// Waits for `delay`, reporting any interrupt seen meanwhile.
    fn pause(&mut self, delay: Duration) -> Result<Control>;
}

/// Never waits and never interrupts. Used for headless runs.
#[derive(Debug, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn pause(&mut self, _delay: Duration) -> Result<Control> {
        Ok(Control::Continue)
    }
}

/// How long each frame lasts and how many to show.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Pause after each presented frame.
    pub delay: Duration,
    /// Frames per mode; `None` runs until interrupted.
    pub frames: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(100),
            frames: None,
        }
    }
}

/// What happened during one mode's run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Mode name.
    pub name: String,
    /// Frames presented, not counting the final blank frame.
    pub frames: u64,
    /// Resets reported by the simulation.
    pub resets: u64,
    /// Whether the run ended on an interrupt.
    pub interrupted: bool,
}

/// Runs `mode` on `display` until the frame limit or an interrupt.
///
/// Every frame is tick, draw, present, pause. The display is cleared and
/// presented on every exit, including when a present or pause fails; the
/// first error is the one returned.
pub fn run(
    mode: &mut dyn Mode,
    display: &mut dyn MatrixDisplay,
    pacer: &mut dyn Pacer,
    options: &RunOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary {
        name: mode.name().to_string(),
        frames: 0,
        resets: 0,
        interrupted: false,
    };
    info!(mode = %summary.name, "mode started");

    let outcome = drive(mode, display, pacer, options, &mut summary);
    display.clear();
    let blanked = display.present().context("failed to blank display");
    if let Err(err) = &outcome {
        warn!(mode = %summary.name, frames = summary.frames, error = %err, "mode aborted");
    }
    outcome?;
    blanked?;

    info!(
        mode = %summary.name,
        frames = summary.frames,
        resets = summary.resets,
        interrupted = summary.interrupted,
        "mode finished"
    );
    Ok(summary)
}

fn drive(
    mode: &mut dyn Mode,
    display: &mut dyn MatrixDisplay,
    pacer: &mut dyn Pacer,
    options: &RunOptions,
    summary: &mut RunSummary,
) -> Result<()> {
    while options.frames.is_none_or(|limit| summary.frames < limit) {
        let tick = mode.tick();
        if let Some(reason) = tick.reset_reason() {
            summary.resets += 1;
            debug!(mode = %summary.name, %reason, frame = mode.frame(), "mode reset");
        }
        mode.draw(display);
        display.present().context("failed to present frame")?;
        summary.frames += 1;

        if pacer.pause(options.delay)? == Control::Stop {
            summary.interrupted = true;
            break;
        }
    }
    Ok(())
}

/// Builds and runs each mode in turn, stopping early on an interrupt.
pub fn run_sequence(
    modes: &[ModeConfig],
    display: &mut dyn MatrixDisplay,
    pacer: &mut dyn Pacer,
    options: &RunOptions,
) -> Result<Vec<RunSummary>> {
    let mut summaries = Vec::with_capacity(modes.len());
    for config in modes {
        let mut mode = config
            .build()
            .with_context(|| format!("invalid {} configuration", config.name()))?;
        let summary = run(mode.as_mut(), display, pacer, options)?;
        let interrupted = summary.interrupted;
        summaries.push(summary);
        if interrupted {
            break;
        }
    }
    Ok(summaries)
}
