use std::time::Duration;

use anyhow::Result;
use neogrid_app::{Control, ModeConfig, Pacer, RunOptions, Unpaced, run_sequence, showcase};
use neogrid_core::FrameBuffer;
use neogrid_sand::HourglassConfig;
use neogrid_water::WaterConfig;

fn options(frames: u64) -> RunOptions {
    RunOptions {
        delay: Duration::ZERO,
        frames: Some(frames),
    }
}

/// Stops on the `n`-th pause.
struct InterruptAfter(u64);

impl Pacer for InterruptAfter {
    fn pause(&mut self, _delay: Duration) -> Result<Control> {
        self.0 = self.0.saturating_sub(1);
        Ok(if self.0 == 0 {
            Control::Stop
        } else {
            Control::Continue
        })
    }
}

#[test]
fn test_showcase_runs_every_mode_in_turn() {
    let modes = showcase(8, 8, 42);
    let mut display = FrameBuffer::new(8, 8);
    let summaries = run_sequence(&modes, &mut display, &mut Unpaced, &options(60)).unwrap();

    assert_eq!(summaries.len(), modes.len());
    for (summary, mode) in summaries.iter().zip(&modes) {
        assert_eq!(summary.name, mode.name());
        assert_eq!(summary.frames, 60);
        assert!(!summary.interrupted);
    }
    // One presented frame per tick plus a blank frame after each mode.
    assert_eq!(display.presents(), 61 * modes.len() as u64);
    assert_eq!(display.lit_cells(), 0);
}

#[test]
fn test_interrupt_ends_the_whole_sequence() {
    let modes = showcase(8, 8, 1);
    let mut display = FrameBuffer::new(8, 8);
    let summaries =
        run_sequence(&modes, &mut display, &mut InterruptAfter(4), &options(100)).unwrap();

    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].interrupted);
    assert_eq!(summaries[0].frames, 4);
    assert_eq!(display.lit_cells(), 0);
}

#[test]
fn test_hourglass_flips_during_run() {
    let config = HourglassConfig::default().with_timing(2, 5, 2).with_seed(3);
    let modes = [ModeConfig::Hourglass { config }];
    let mut display = FrameBuffer::new(8, 8);
    let summaries = run_sequence(&modes, &mut display, &mut Unpaced, &options(2000)).unwrap();
    assert!(summaries[0].resets >= 1);
}

#[test]
fn test_invalid_mode_fails_before_running() {
    let modes = [ModeConfig::Water {
        config: WaterConfig::default().with_damping(1.5),
        palette: Default::default(),
    }];
    let mut display = FrameBuffer::new(8, 8);
    let err = run_sequence(&modes, &mut display, &mut Unpaced, &options(10)).unwrap_err();
    assert!(err.to_string().contains("water"));
    assert_eq!(display.presents(), 0);
}
