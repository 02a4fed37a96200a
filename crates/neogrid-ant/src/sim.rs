use neogrid_core::{
    Addressing, ConfigError, DEFAULT_SIZE, ResetReason, Simulation, Tick, validate_dimensions,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Ant, AntRule, DEFAULT_CYCLE_WINDOW, DEFAULT_HISTORY, Direction, LangtonsAnt, rules};

/// Most cells pre-painted by a random start.
pub const MAX_RANDOM_PAINT: usize = 10;

/// Configuration for [`AntSim`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntConfig {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// `Wrap` for a torus, `Bounded` to bounce ants off the walls.
    pub addressing: Addressing,
    /// Rule strings. With more than one, each reset moves to the next.
    pub rules: Vec<String>,
    /// Number of ants sharing the grid.
    pub ants: usize,
    /// Steps per run before a forced reset.
    pub max_steps: u64,
    /// Reset early when the run starts repeating itself.
    pub detect_cycles: bool,
    /// Fingerprints kept for cycle detection.
    pub history_len: usize,
    /// Length of the run compared when looking for cycles.
    pub cycle_window: usize,
    /// After a reset, start from a random position and facing with a few
    /// pre-painted cells instead of the center.
    pub random_start: bool,
    /// RNG seed.
    pub seed: u64,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            addressing: Addressing::Wrap,
            rules: vec![rules::LANGTON.to_string()],
            ants: 1,
            max_steps: 2000,
            detect_cycles: true,
            history_len: DEFAULT_HISTORY,
            cycle_window: DEFAULT_CYCLE_WINDOW,
            random_start: true,
            seed: 0,
        }
    }
}

impl AntConfig {
    /// Rotates through every preset, switching every 500 steps.
    pub fn chaos() -> Self {
        Self {
            rules: rules::CHAOS.iter().map(|r| r.to_string()).collect(),
            max_steps: 500,
            detect_cycles: false,
            random_start: false,
            ..Self::default()
        }
    }

    /// Sets the grid size.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the edge behavior.
    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// Uses a single rule.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules = vec![rule.into()];
        self
    }

    /// Sets the number of ants.
    pub fn with_ants(mut self, ants: usize) -> Self {
        self.ants = ants;
        self
    }

    /// Sets the steps per run.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Enables or disables early reset on cycles.
    pub fn with_cycle_detection(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// Enables or disables random restarts.
    pub fn with_random_start(mut self, random_start: bool) -> Self {
        self.random_start = random_start;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parses every rule string.
    pub fn parse_rules(&self) -> Result<Vec<AntRule>, ConfigError> {
        if self.rules.is_empty() {
            return Err(ConfigError::Zero { name: "rules" });
        }
        self.rules.iter().map(|rule| rule.parse()).collect()
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        self.parse_rules()?;
        if self.ants == 0 {
            return Err(ConfigError::Zero { name: "ants" });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Zero { name: "max_steps" });
        }
        if self.detect_cycles {
            if self.cycle_window == 0 {
                return Err(ConfigError::Zero {
                    name: "cycle_window",
                });
            }
            let needed = self.cycle_window * 2;
            if self.history_len < needed {
                return Err(ConfigError::WindowTooLarge {
                    name: "cycle_window",
                    window: self.cycle_window,
                    needed,
                    capacity: self.history_len,
                });
            }
        }
        Ok(())
    }
}

/// Self-restarting Langton's Ant.
///
/// Each tick steps every ant once. A run ends after `max_steps` ticks or,
/// with cycle detection on, as soon as the recent states repeat. The next
/// run starts on a clean grid, optionally with the next rule and a random
/// start.
#[derive(Debug, Clone)]
pub struct AntSim {
    config: AntConfig,
    rules: Vec<AntRule>,
    rule_index: usize,
    ant: LangtonsAnt,
    rng: SmallRng,
    frame: u64,
    runs: u64,
}

impl AntSim {
    /// Validates `config` and sets up the first run.
    pub fn new(config: AntConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.parse_rules()?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let ant = build_run(&config, rules[0].clone(), &mut rng, false);
        info!(rule = %rules[0], ants = config.ants, "ant run started");

        Ok(Self {
            config,
            rules,
            rule_index: 0,
            ant,
            rng,
            frame: 0,
            runs: 1,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AntConfig {
        &self.config
    }

    /// Returns the current run.
    pub fn ant(&self) -> &LangtonsAnt {
        &self.ant
    }

    /// Returns the current run mutably.
    pub fn ant_mut(&mut self) -> &mut LangtonsAnt {
        &mut self.ant
    }

    /// Rule of the current run.
    pub fn rule(&self) -> &AntRule {
        self.ant.rule()
    }

    /// Runs started since construction, including the first.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Why the current run should end, if it should.
    pub fn reset_reason(&self) -> Option<ResetReason> {
        if self.ant.step_count() >= self.config.max_steps {
            Some(ResetReason::StepLimit)
        } else if self.config.detect_cycles && self.ant.is_cycling() {
            Some(ResetReason::Cycling)
        } else {
            None
        }
    }

    /// Starts the next run.
    pub fn restart(&mut self) {
        if self.rules.len() > 1 {
            self.rule_index = (self.rule_index + 1) % self.rules.len();
        }
        let rule = self.rules[self.rule_index].clone();
        self.ant = build_run(&self.config, rule, &mut self.rng, self.config.random_start);
        self.runs += 1;
        info!(rule = %self.ant.rule(), run = self.runs, "ant run started");
    }
}

/// Builds a fresh grid with ants placed for a new run.
///
/// A single ant starts at the center facing north unless `random` is set.
/// Several ants always get random positions and facings.
fn build_run(config: &AntConfig, rule: AntRule, rng: &mut SmallRng, random: bool) -> LangtonsAnt {
    let mut ant = LangtonsAnt::new(config.width, config.height, config.addressing, rule)
        .with_history(config.history_len, config.cycle_window);

    if config.ants > 1 || random {
        let placed: Vec<Ant> = (0..config.ants).map(|_| random_ant(config, rng)).collect();
        ant = ant.with_ants(placed);
    }

    if random {
        let painted = rng.random_range(0..=MAX_RANDOM_PAINT);
        for _ in 0..painted {
            let x = rng.random_range(0..config.width);
            let y = rng.random_range(0..config.height);
            ant.paint(x, y, 1);
        }
    }
    ant
}

fn random_ant(config: &AntConfig, rng: &mut SmallRng) -> Ant {
    let x = rng.random_range(0..config.width) as i32;
    let y = rng.random_range(0..config.height) as i32;
    let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    Ant::new(x, y, direction)
}

impl Simulation for AntSim {
    fn name(&self) -> &str {
        "ant"
    }

    fn tick(&mut self) -> Tick {
        self.frame += 1;
        self.ant.step();

        if let Some(reason) = self.reset_reason() {
            info!(
                steps = self.ant.step_count(),
                rule = %self.ant.rule(),
                %reason,
                "ant run ended"
            );
            self.restart();
            return Tick::Reset { reason };
        }

        debug!(steps = self.ant.step_count(), "ant step");
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_starts_at_center() {
        let sim = AntSim::new(AntConfig::default()).unwrap();
        let ant = sim.ant().ants()[0];
        assert_eq!((ant.position.x, ant.position.y), (4, 4));
        assert_eq!(ant.direction, Direction::North);
        assert_eq!(sim.ant().grid().count(|&s| s != 0), 0);
    }

    #[test]
    fn test_step_limit_resets() {
        let config = AntConfig::default()
            .with_max_steps(30)
            .with_cycle_detection(false);
        let mut sim = AntSim::new(config).unwrap();
        for _ in 0..29 {
            assert_eq!(sim.tick(), Tick::Advanced);
        }
        assert_eq!(
            sim.tick(),
            Tick::Reset {
                reason: ResetReason::StepLimit
            }
        );
        assert_eq!(sim.ant().step_count(), 0);
        assert_eq!(sim.runs(), 2);
        assert!(sim.ant().grid().count(|&s| s != 0) <= MAX_RANDOM_PAINT);
    }

    #[test]
    fn test_chaos_rotates_rules() {
        let mut sim = AntSim::new(AntConfig::chaos().with_max_steps(5)).unwrap();
        let mut seen = vec![sim.rule().to_string()];
        for _ in 0..5 * rules::CHAOS.len() {
            if sim.tick().reset_reason().is_some() {
                seen.push(sim.rule().to_string());
            }
        }
        let mut expected: Vec<String> = rules::CHAOS.iter().map(|r| r.to_string()).collect();
        expected.push(rules::LANGTON.to_string());
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_cycle_detection_resets_early() {
        let config = AntConfig::default()
            .with_rule("NN")
            .with_random_start(false)
            .with_max_steps(10_000);
        let mut sim = AntSim::new(config).unwrap();
        let mut reason = None;
        for _ in 0..500 {
            if let Tick::Reset { reason: r } = sim.tick() {
                reason = Some(r);
                break;
            }
        }
        assert_eq!(reason, Some(ResetReason::Cycling));
    }

    #[test]
    fn test_multi_ant_random_placement() {
        let sim = AntSim::new(AntConfig::default().with_ants(3).with_seed(9)).unwrap();
        assert_eq!(sim.ant().ants().len(), 3);
        for ant in sim.ant().ants() {
            assert!(sim.ant().grid().contains(ant.position.x, ant.position.y));
        }
    }

    #[test]
    fn test_seeded_runs_match() {
        let config = AntConfig::default().with_ants(2).with_seed(11);
        let mut a = AntSim::new(config.clone()).unwrap();
        let mut b = AntSim::new(config).unwrap();
        for _ in 0..300 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.ant().grid(), b.ant().grid());
        assert_eq!(a.ant().ants(), b.ant().ants());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert!(matches!(
            AntSim::new(AntConfig::default().with_rule("RLQ")),
            Err(ConfigError::RuleSymbol { symbol: 'Q', .. })
        ));
        assert!(matches!(
            AntSim::new(AntConfig::default().with_ants(0)),
            Err(ConfigError::Zero { name: "ants" })
        ));
        let mut config = AntConfig::default();
        config.history_len = 60;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooLarge { needed: 100, .. })
        ));
    }
}
