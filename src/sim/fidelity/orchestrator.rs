use std::collections::VecDeque;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::level::FidelityLevel;
use super::schedule::FidelitySchedule;
use crate::error::{SimError, check_positive, check_range};

/// Confidence reported until the history holds enough entries to judge stability.
pub const WARMUP_CONFIDENCE: f64 = 0.85;
/// Minimum number of history entries before switching is scored.
pub const WARMUP_ENTRIES: usize = 5;
/// Number of trailing history entries inspected by [`FidelityOrchestrator::confidence`].
pub const CONFIDENCE_WINDOW: usize = 10;
/// Upper bound on [`OrchestratorConfig::history_limit`].
pub const MAX_HISTORY_LIMIT: usize = 10_000;

const BASE_CONFIDENCE: f64 = 0.95;
const SWITCH_PENALTY: f64 = 0.02;
const MIN_CONFIDENCE: f64 = 0.80;
const MAX_CONFIDENCE: f64 = 0.99;

/// How the simulation clock advances on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClockMode {
    /// Fixed increment per tick.
    FixedStep { step: f64 },
    /// Real elapsed seconds since the previous tick (or since construction).
    WallClock,
}

impl Default for ClockMode {
    fn default() -> Self {
        Self::FixedStep { step: 1.0 }
    }
}

/// Configuration of the fidelity orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub clock: ClockMode,
    pub schedule: FidelitySchedule,
    /// Maximum number of retained history entries.
    pub history_limit: usize,
    /// Half-width of the uniform jitter added to the confidence score.
    ///
    /// The jitter is a non-deterministic diagnostic, not a physical quantity.
    /// Set to `0.0` for reproducible scores.
    pub confidence_jitter: f64,
    /// Seed for the jitter RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self {
            clock: ClockMode::default(),
            schedule: FidelitySchedule::default(),
            history_limit: 100,
            confidence_jitter: 0.02,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if let ClockMode::FixedStep { step } = self.clock {
            check_positive("clock.step", step)?;
        }
        self.schedule.validate()?;
        if !(CONFIDENCE_WINDOW..=MAX_HISTORY_LIMIT).contains(&self.history_limit) {
            return Err(SimError::invalid(
                "history_limit",
                self.history_limit as f64,
                format!("expected {CONFIDENCE_WINDOW} to {MAX_HISTORY_LIMIT} entries"),
            ));
        }
        check_range("confidence_jitter", self.confidence_jitter, 0.0, 0.1)?;
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks simulation time and picks the fidelity for each tick.
///
/// This is plain single-owner state. Sharing it across request handlers is done by
/// the caller (see [`crate::service::Simulator`], which keeps it behind one mutex).
pub struct FidelityOrchestrator {
    config: OrchestratorConfig,
    time: f64,
    last_update: Instant,
    history: VecDeque<FidelityLevel>,
    total_ticks: u64,
    rng: StdRng,
}

impl FidelityOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            history: VecDeque::new(),
            config,
            time: 0.0,
            last_update: Instant::now(),
            total_ticks: 0,
            rng,
        })
    }

    /// Advances the clock by one tick and returns the fidelity for that tick.
    pub fn advance_tick(&mut self) -> FidelityLevel {
        let now = Instant::now();
        let dt = match self.config.clock {
            ClockMode::FixedStep { step } => step,
            ClockMode::WallClock => now.duration_since(self.last_update).as_secs_f64(),
        };
        self.last_update = now;
        self.time += dt;
        self.total_ticks += 1;

        let level = self.config.schedule.level_at(self.time);
        self.history.push_back(level);
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        tracing::trace!(time = self.time, ?level, "fidelity tick");
        level
    }

    /// Stability score over the recent fidelity history, in `[0.80, 0.99]`.
    pub fn confidence(&mut self) -> f64 {
        if self.history.len() < WARMUP_ENTRIES {
            return WARMUP_CONFIDENCE;
        }
        let mut score = BASE_CONFIDENCE - SWITCH_PENALTY * self.recent_switches() as f64;
        let jitter = self.config.confidence_jitter;
        if jitter > 0.0 {
            score += self.rng.gen_range(-jitter..=jitter);
        }
        score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }

    /// Number of adjacent differing pairs in the confidence window.
    pub fn recent_switches(&self) -> usize {
        let start = self.history.len().saturating_sub(CONFIDENCE_WINDOW);
        let recent: Vec<FidelityLevel> = self.history.iter().skip(start).copied().collect();
        recent.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn history(&self) -> &VecDeque<FidelityLevel> {
        &self.history
    }

    /// Total ticks since construction. Not truncated with the history.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic() -> FidelityOrchestrator {
        let config = OrchestratorConfig {
            confidence_jitter: 0.0,
            ..OrchestratorConfig::new()
        };
        FidelityOrchestrator::new(config).unwrap()
    }

    #[test]
    fn test_advance_follows_ramp_cycle() {
        let mut orch = deterministic();
        for tick in 1..=60 {
            let level = orch.advance_tick();
            let expected = match (tick / 10) % 3 {
                0 => FidelityLevel::Low,
                1 => FidelityLevel::Medium,
                _ => FidelityLevel::High,
            };
            assert_eq!(level, expected, "tick {tick}");
            assert!((orch.time() - tick as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut orch = deterministic();
        for _ in 0..250 {
            orch.advance_tick();
        }
        assert_eq!(orch.history().len(), 100);
        assert_eq!(orch.total_ticks(), 250);
        // Last entry is tick 250 -> (250 / 10) % 3 == 1
        assert_eq!(orch.history().back(), Some(&FidelityLevel::Medium));
    }

    #[test]
    fn test_warmup_confidence() {
        let mut orch = FidelityOrchestrator::new(OrchestratorConfig::new()).unwrap();
        assert_eq!(orch.confidence(), WARMUP_CONFIDENCE);
        for _ in 0..4 {
            orch.advance_tick();
            assert_eq!(orch.confidence(), WARMUP_CONFIDENCE);
        }
    }

    #[test]
    fn test_confidence_without_switches() {
        let mut orch = deterministic();
        for _ in 0..8 {
            orch.advance_tick();
        }
        assert_eq!(orch.recent_switches(), 0);
        assert!((orch.confidence() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_penalizes_switches() {
        let config = OrchestratorConfig {
            schedule: FidelitySchedule::Ramp { band_width: 1.0 },
            confidence_jitter: 0.0,
            ..OrchestratorConfig::new()
        };
        let mut orch = FidelityOrchestrator::new(config).unwrap();
        for _ in 0..20 {
            orch.advance_tick();
        }
        // Every tick switches: 9 switches in a window of 10.
        assert_eq!(orch.recent_switches(), 9);
        let c = orch.confidence();
        assert!((c - 0.80).abs() < 1e-12, "0.95 - 0.18 clamps to 0.80, got {c}");
    }

    #[test]
    fn test_confidence_jitter_stays_in_bounds() {
        let config = OrchestratorConfig {
            seed: Some(7),
            ..OrchestratorConfig::new()
        };
        let mut orch = FidelityOrchestrator::new(config).unwrap();
        for _ in 0..200 {
            orch.advance_tick();
            let c = orch.confidence();
            assert!((0.80..=0.99).contains(&c), "confidence {c} out of bounds");
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let config = OrchestratorConfig {
            seed: Some(42),
            ..OrchestratorConfig::new()
        };
        let mut a = FidelityOrchestrator::new(config.clone()).unwrap();
        let mut b = FidelityOrchestrator::new(config).unwrap();
        for _ in 0..30 {
            a.advance_tick();
            b.advance_tick();
            assert_eq!(a.confidence(), b.confidence());
        }
    }

    #[test]
    fn test_wall_clock_is_non_decreasing() {
        let config = OrchestratorConfig {
            clock: ClockMode::WallClock,
            ..OrchestratorConfig::new()
        };
        let mut orch = FidelityOrchestrator::new(config).unwrap();
        let mut last = orch.time();
        for _ in 0..10 {
            orch.advance_tick();
            assert!(orch.time() >= last);
            last = orch.time();
        }
        assert_eq!(orch.history().len(), 10);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_step = OrchestratorConfig {
            clock: ClockMode::FixedStep { step: 0.0 },
            ..OrchestratorConfig::new()
        };
        assert!(FidelityOrchestrator::new(bad_step).is_err());

        let short_history = OrchestratorConfig {
            history_limit: 3,
            ..OrchestratorConfig::new()
        };
        assert!(matches!(
            FidelityOrchestrator::new(short_history),
            Err(SimError::InvalidParameter {
                name: "history_limit",
                ..
            })
        ));
    }

    #[test]
    fn test_history_limit_upper_bound() {
        let at_cap = OrchestratorConfig {
            history_limit: MAX_HISTORY_LIMIT,
            ..OrchestratorConfig::new()
        };
        assert!(FidelityOrchestrator::new(at_cap).is_ok());

        for limit in [MAX_HISTORY_LIMIT + 1, usize::MAX] {
            let huge = OrchestratorConfig {
                history_limit: limit,
                ..OrchestratorConfig::new()
            };
            assert!(
                matches!(
                    FidelityOrchestrator::new(huge),
                    Err(SimError::InvalidParameter {
                        name: "history_limit",
                        ..
                    })
                ),
                "history_limit {limit} should be rejected"
            );
        }
    }
}
