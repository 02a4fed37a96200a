use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use neogrid_ant::AntConfig;
use neogrid_app::{
    DEFAULT_BRIGHTNESS, DEFAULT_HEADLESS_FRAMES, KeyPacer, LogTarget, ModeConfig, RunOptions,
    RunSummary, SHOWCASE_FRAMES, StripLayout, TerminalDisplay, TerminalSession, Unpaced,
    init_tracing, run_sequence, showcase,
};
use neogrid_core::{Addressing, DEFAULT_SIZE, FrameBuffer};
use neogrid_life::LifeConfig;
use neogrid_render::{AntStyle, LifeStyle, WaterPalette};
use neogrid_sand::{HourglassConfig, SandColors, SandConfig};
use neogrid_water::{DropPattern, WaterConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "neogrid",
    version,
    about = "LED-matrix simulations drawn in the terminal"
)]
struct Cli {
    /// Matrix width in cells.
    #[arg(long, global = true, env = "NEOGRID_WIDTH", default_value_t = DEFAULT_SIZE)]
    width: usize,

    /// Matrix height in cells.
    #[arg(long, global = true, env = "NEOGRID_HEIGHT", default_value_t = DEFAULT_SIZE)]
    height: usize,

    /// Pause between frames in milliseconds.
    #[arg(long = "delay", global = true, env = "NEOGRID_DELAY_MS", default_value_t = 100)]
    delay_ms: u64,

    /// RNG seed shared by every simulation.
    #[arg(long, global = true, env = "NEOGRID_SEED", default_value_t = 0)]
    seed: u64,

    /// LED brightness in [0, 1].
    #[arg(long, global = true, env = "NEOGRID_BRIGHTNESS", default_value_t = DEFAULT_BRIGHTNESS)]
    brightness: f32,

    /// Frames per mode. Interactive runs default to running until `q`.
    #[arg(long, global = true)]
    frames: Option<u64>,

    /// Render into memory instead of the terminal and print a JSON summary.
    #[arg(long, global = true)]
    headless: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long, global = true)]
    dump_config: bool,

    /// Every row wired left to right instead of serpentine.
    #[arg(long, global = true)]
    progressive: bool,

    /// Write logs to this file. Without it, logs go to stderr in headless
    /// runs and are dropped while the terminal is drawing.
    #[arg(long, global = true, env = "NEOGRID_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Conway's Game of Life cycling through classic patterns.
    Life(LifeArgs),
    /// Langton's Ant and its multi-state relatives.
    Ant(AntArgs),
    /// Sand falling into a pile until it fills up.
    Sand(SandArgs),
    /// An hourglass that flips itself.
    Hourglass(HourglassArgs),
    /// A rainbow stream sliding down a slope.
    Waterfall,
    /// Ripples on a damped water surface.
    Water(WaterArgs),
    /// Every mode in turn.
    Showcase,
}

#[derive(Args, Debug)]
struct LifeArgs {
    /// First pattern: a catalog name or `random`.
    #[arg(long)]
    pattern: Option<String>,

    /// Cell coloring. Rotates on every reseed when omitted.
    #[arg(long, value_enum)]
    style: Option<LifeStyleArg>,

    /// Generations before a forced reseed.
    #[arg(long, default_value_t = 200)]
    max_generations: u32,

    /// Dead edges instead of a torus.
    #[arg(long)]
    bounded: bool,
}

#[derive(Args, Debug)]
struct AntArgs {
    /// Rule string, e.g. `RL` or `LLRR`. Repeat to rotate rules on reset.
    #[arg(long = "rule", default_value = "RL")]
    rules: Vec<String>,

    /// Rotate through every preset rule.
    #[arg(long, conflicts_with = "rules")]
    chaos: bool,

    /// Ants sharing the grid.
    #[arg(long, default_value_t = 1)]
    ants: usize,

    /// Steps before a forced reset.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Keep running through repeating trails.
    #[arg(long)]
    no_cycle_detection: bool,

    /// Bounce off the walls instead of wrapping.
    #[arg(long)]
    bounded: bool,

    /// Trail coloring. Picked from the rule when omitted.
    #[arg(long, value_enum)]
    style: Option<AntStyleArg>,
}

#[derive(Args, Debug)]
struct SandArgs {
    /// Chance of a new grain each frame.
    #[arg(long, default_value_t = 0.3)]
    spawn_rate: f32,

    /// Grains spawned before the pile resets.
    #[arg(long, default_value_t = 50)]
    max_grains: usize,

    /// Grain coloring.
    #[arg(long, value_enum, default_value_t = SandColorsArg::Layered)]
    colors: SandColorsArg,
}

#[derive(Args, Debug)]
struct HourglassArgs {
    /// Grains in the glass.
    #[arg(long, default_value_t = 20)]
    grains: usize,
}

#[derive(Args, Debug)]
struct WaterArgs {
    /// Drop schedule.
    #[arg(long, value_enum, default_value_t = DropArg::Random)]
    pattern: DropArg,

    /// Per-frame drop chance for the random schedule.
    #[arg(long, default_value_t = 0.03)]
    chance: f32,

    /// Pull toward the neighbor average, in (0, 2).
    #[arg(long, default_value_t = 0.5)]
    wave_speed: f32,

    /// Velocity kept each frame, in (0, 1).
    #[arg(long, default_value_t = 0.96)]
    damping: f32,

    /// Height colors.
    #[arg(long, value_enum, default_value_t = PaletteArg::Water)]
    palette: PaletteArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LifeStyleArg {
    Classic,
    Rainbow,
    Heat,
    Age,
}

impl From<LifeStyleArg> for LifeStyle {
    fn from(arg: LifeStyleArg) -> Self {
        match arg {
            LifeStyleArg::Classic => LifeStyle::Classic,
            LifeStyleArg::Rainbow => LifeStyle::Rainbow,
            LifeStyleArg::Heat => LifeStyle::Heat,
            LifeStyleArg::Age => LifeStyle::Age,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AntStyleArg {
    Classic,
    Rainbow,
    Heat,
    MultiState,
}

impl From<AntStyleArg> for AntStyle {
    fn from(arg: AntStyleArg) -> Self {
        match arg {
            AntStyleArg::Classic => AntStyle::Classic,
            AntStyleArg::Rainbow => AntStyle::Rainbow,
            AntStyleArg::Heat => AntStyle::Heat,
            AntStyleArg::MultiState => AntStyle::MultiState,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SandColorsArg {
    Layered,
    Random,
    Rainbow,
}

impl From<SandColorsArg> for SandColors {
    fn from(arg: SandColorsArg) -> Self {
        match arg {
            SandColorsArg::Layered => SandColors::Layered,
            SandColorsArg::Random => SandColors::Random,
            SandColorsArg::Rainbow => SandColors::Rainbow,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DropArg {
    Random,
    Rain,
    CenterPulse,
    CornerDrops,
    WaveMachine,
    Interference,
}

impl DropArg {
    fn pattern(self, chance: f32) -> DropPattern {
        match self {
            DropArg::Random => DropPattern::Random { chance },
            DropArg::Rain => DropPattern::Rain,
            DropArg::CenterPulse => DropPattern::CenterPulse,
            DropArg::CornerDrops => DropPattern::CornerDrops,
            DropArg::WaveMachine => DropPattern::WaveMachine,
            DropArg::Interference => DropPattern::Interference,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PaletteArg {
    Water,
    Sunset,
    Neon,
}

impl From<PaletteArg> for WaterPalette {
    fn from(arg: PaletteArg) -> Self {
        match arg {
            PaletteArg::Water => WaterPalette::Water,
            PaletteArg::Sunset => WaterPalette::Sunset,
            PaletteArg::Neon => WaterPalette::Neon,
        }
    }
}

fn addressing(bounded: bool) -> Addressing {
    if bounded {
        Addressing::Bounded
    } else {
        Addressing::Wrap
    }
}

impl Cli {
    fn modes(&self) -> Vec<ModeConfig> {
        let (width, height, seed) = (self.width, self.height, self.seed);
        let mode = match &self.command {
            Command::Showcase => return showcase(width, height, seed),
            Command::Life(args) => {
                let mut config = LifeConfig::default()
                    .with_size(width, height)
                    .with_addressing(addressing(args.bounded))
                    .with_max_generations(args.max_generations)
                    .with_seed(seed);
                if let Some(pattern) = &args.pattern {
                    config = config.with_pattern(pattern.clone());
                }
                ModeConfig::Life {
                    config,
                    style: args.style.map(LifeStyle::from),
                }
            }
            Command::Ant(args) => {
                let base = if args.chaos {
                    AntConfig::chaos()
                } else {
                    AntConfig {
                        rules: args.rules.clone(),
                        ..AntConfig::default()
                    }
                };
                let mut config = base
                    .with_size(width, height)
                    .with_addressing(addressing(args.bounded))
                    .with_ants(args.ants)
                    .with_seed(seed);
                if let Some(max_steps) = args.max_steps {
                    config = config.with_max_steps(max_steps);
                }
                if args.no_cycle_detection {
                    config = config.with_cycle_detection(false);
                }
                ModeConfig::Ant {
                    config,
                    style: args.style.map(AntStyle::from),
                }
            }
            Command::Sand(args) => ModeConfig::Sand {
                config: SandConfig::default()
                    .with_size(width, height)
                    .with_spawn_rate(args.spawn_rate)
                    .with_max_grains(args.max_grains)
                    .with_colors(args.colors.into())
                    .with_seed(seed),
            },
            Command::Hourglass(args) => ModeConfig::Hourglass {
                config: HourglassConfig {
                    width,
                    height,
                    ..HourglassConfig::default()
                }
                .with_grains(args.grains)
                .with_seed(seed),
            },
            Command::Waterfall => ModeConfig::Waterfall {
                width,
                height,
                seed,
            },
            Command::Water(args) => ModeConfig::Water {
                config: WaterConfig::default()
                    .with_size(width, height)
                    .with_pattern(args.pattern.pattern(args.chance))
                    .with_wave_speed(args.wave_speed)
                    .with_damping(args.damping)
                    .with_seed(seed),
                palette: args.palette.into(),
            },
        };
        vec![mode]
    }

    fn options(&self) -> RunOptions {
        let frames = self.frames.or(match (&self.command, self.headless) {
            (Command::Showcase, _) => Some(SHOWCASE_FRAMES),
            (_, true) => Some(DEFAULT_HEADLESS_FRAMES),
            (_, false) => None,
        });
        RunOptions {
            delay: Duration::from_millis(self.delay_ms),
            frames,
        }
    }
}

fn run_headless(cli: &Cli, modes: &[ModeConfig], options: &RunOptions) -> Result<Vec<RunSummary>> {
    let mut display = FrameBuffer::new(cli.width, cli.height);
    run_sequence(modes, &mut display, &mut Unpaced, options)
}

fn run_terminal(cli: &Cli, modes: &[ModeConfig], options: &RunOptions) -> Result<Vec<RunSummary>> {
    let _session = TerminalSession::start()?;
    let layout = StripLayout::new(cli.width, cli.height, !cli.progressive);
    let mut display = TerminalDisplay::new(io::stdout(), layout).with_brightness(cli.brightness);
    run_sequence(modes, &mut display, &mut KeyPacer, options)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_target = LogTarget::select(cli.headless || cli.dump_config, cli.log_file.as_deref());
    init_tracing(&log_target)?;
    let modes = cli.modes();

    if cli.dump_config {
        let json = serde_json::to_string_pretty(&modes).context("failed to encode configuration")?;
        println!("{json}");
        return Ok(());
    }

    for mode in &modes {
        mode.build()
            .with_context(|| format!("invalid {} configuration", mode.name()))?;
    }

    let options = cli.options();
    info!(
        modes = modes.len(),
        frames = ?options.frames,
        delay_ms = cli.delay_ms,
        headless = cli.headless,
        "starting neogrid"
    );

    if cli.headless {
        let summaries = run_headless(&cli, &modes, &options)?;
        let json =
            serde_json::to_string_pretty(&summaries).context("failed to encode run summary")?;
        println!("{json}");
    } else {
        let summaries = run_terminal(&cli, &modes, &options)?;
        let interrupted = summaries.iter().any(|s| s.interrupted);
        info!(runs = summaries.len(), interrupted, "neogrid finished");
    }
    Ok(())
}
