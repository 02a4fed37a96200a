//! Serializable descriptions of runnable modes.

use neogrid_ant::{AntConfig, AntSim};
use neogrid_core::{ConfigError, Mode};
use neogrid_life::{LifeConfig, LifeSim};
use neogrid_render::{
    AntScene, AntStyle, HourglassScene, LifeScene, LifeStyle, SandScene, WaterPalette,
    WaterScene, WaterfallScene,
};
use neogrid_sand::{HourglassConfig, HourglassSim, SandColors, SandConfig, SandSim, WaterfallSim};
use neogrid_water::{DropPattern, WaterConfig, WaterSim};
use serde::{Deserialize, Serialize};

/// One mode and everything needed to build it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeConfig {
    /// Game of Life. Without a style the style rotates on every reseed.
    Life {
        /// Simulation settings.
        config: LifeConfig,
        /// Fixed style.
        style: Option<LifeStyle>,
    },
    /// Langton's Ant. Without a style one is picked from the rule's states.
    Ant {
        /// Simulation settings.
        config: AntConfig,
        /// Fixed style.
        style: Option<AntStyle>,
    },
    /// Continuous falling sand.
    Sand {
        /// Simulation settings.
        config: SandConfig,
    },
    /// Self-flipping hourglass.
    Hourglass {
        /// Simulation settings.
        config: HourglassConfig,
    },
    /// Rainbow waterfall.
    Waterfall {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
        /// RNG seed.
        seed: u64,
    },
    /// Water ripples.
    Water {
        /// Simulation settings.
        config: WaterConfig,
        /// Height colors.
        palette: WaterPalette,
    },
}

impl ModeConfig {
    /// Short name, matching the CLI subcommand.
    pub fn name(&self) -> &'static str {
        match self {
            ModeConfig::Life { .. } => "life",
            ModeConfig::Ant { .. } => "ant",
            ModeConfig::Sand { .. } => "sand",
            ModeConfig::Hourglass { .. } => "hourglass",
            ModeConfig::Waterfall { .. } => "waterfall",
            ModeConfig::Water { .. } => "water",
        }
    }

    /// Validates the settings and builds a ready-to-run mode.
    pub fn build(&self) -> Result<Box<dyn Mode>, ConfigError> {
        let mode: Box<dyn Mode> = match self {
            ModeConfig::Life { config, style } => {
                let sim = LifeSim::new(config.clone())?;
                match style {
                    Some(style) => Box::new(LifeScene::new(sim, *style)),
                    None => Box::new(LifeScene::rotating(sim)),
                }
            }
            ModeConfig::Ant { config, style } => {
                let sim = AntSim::new(config.clone())?;
                let style = style.unwrap_or_else(|| AntStyle::for_states(sim.rule().states()));
                Box::new(AntScene::new(sim, style))
            }
            ModeConfig::Sand { config } => Box::new(SandScene::new(SandSim::new(config.clone())?)),
            ModeConfig::Hourglass { config } => {
                Box::new(HourglassScene::new(HourglassSim::new(config.clone())?))
            }
            ModeConfig::Waterfall {
                width,
                height,
                seed,
            } => Box::new(WaterfallScene::new(WaterfallSim::new(*width, *height, *seed)?)),
            ModeConfig::Water { config, palette } => {
                Box::new(WaterScene::new(WaterSim::new(config.clone())?, *palette))
            }
        };
        Ok(mode)
    }
}

/// The showcase playlist: every mode, a few variations each.
pub fn showcase(width: usize, height: usize, seed: u64) -> Vec<ModeConfig> {
    let water = |pattern: DropPattern, palette: WaterPalette| ModeConfig::Water {
        config: WaterConfig::default()
            .with_size(width, height)
            .with_pattern(pattern)
            .with_seed(seed),
        palette,
    };

    vec![
        ModeConfig::Life {
            config: LifeConfig::default().with_size(width, height).with_seed(seed),
            style: None,
        },
        ModeConfig::Ant {
            config: AntConfig::default().with_size(width, height).with_seed(seed),
            style: None,
        },
        ModeConfig::Ant {
            config: AntConfig::default()
                .with_size(width, height)
                .with_ants(3)
                .with_seed(seed),
            style: Some(AntStyle::Rainbow),
        },
        ModeConfig::Ant {
            config: AntConfig::chaos().with_size(width, height).with_seed(seed),
            style: Some(AntStyle::MultiState),
        },
        ModeConfig::Sand {
            config: SandConfig::default()
                .with_size(width, height)
                .with_colors(SandColors::Rainbow)
                .with_seed(seed),
        },
        ModeConfig::Hourglass {
            config: HourglassConfig {
                width,
                height,
                ..HourglassConfig::default()
            }
            .with_seed(seed),
        },
        ModeConfig::Waterfall {
            width,
            height,
            seed,
        },
        water(DropPattern::CenterPulse, WaterPalette::Water),
        water(DropPattern::Rain, WaterPalette::Sunset),
        water(DropPattern::Interference, WaterPalette::Neon),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use neogrid_core::Simulation;

    #[test]
    fn test_showcase_builds_every_mode() {
        let modes = showcase(8, 8, 7);
        let names: Vec<_> = modes.iter().map(ModeConfig::name).collect();
        for expected in ["life", "ant", "sand", "hourglass", "waterfall", "water"] {
            assert!(names.contains(&expected), "{expected}");
        }
        for mode in &modes {
            let built = mode.build().unwrap();
            assert_eq!(built.frame(), 0);
        }
    }

    #[test]
    fn test_ant_rule_checked_on_build() {
        let config = ModeConfig::Ant {
            config: AntConfig::default().with_rule("LLRR"),
            style: None,
        };
        assert!(config.build().is_ok());
        let bad = ModeConfig::Ant {
            config: AntConfig::default().with_rule("LXR"),
            style: None,
        };
        assert!(matches!(bad.build(), Err(ConfigError::RuleSymbol { .. })));
    }

    #[test]
    fn test_json_tags_mode() {
        let config = ModeConfig::Waterfall {
            width: 8,
            height: 8,
            seed: 1,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["mode"], "waterfall");
        let back: ModeConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let config = ModeConfig::Hourglass {
            config: HourglassConfig {
                width: 1,
                ..HourglassConfig::default()
            },
        };
        assert!(config.build().is_err());
    }
}
