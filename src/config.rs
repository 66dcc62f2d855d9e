use crate::constants::*;
use log::{info, warn};
use serde::Deserialize;

/// Runtime-tunable simulation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `constants.rs`. Override any subset by setting the value in a TOML file
/// passed on the command line; missing keys keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // World
    pub world_width: f64,
    pub world_height: f64,
    pub tick_rate: f64,
    pub max_duration: f64,
    pub friction_per_second: f64,

    // Player
    pub player_size: f64,
    pub player_acc_amplitude: f64,
    pub acc_rotation_per_scroll: f64,

    // Engine
    pub engine_thrust_normal: f64,
    pub engine_thrust_speedup: f64,
    pub fuel_capacity: f64,
    pub oxidizer_capacity: f64,
    pub fuel_drain_per_second: f64,
    pub oxidizer_drain_per_second: f64,
    pub idle_burn_fraction: f64,

    // Boosters
    pub booster_size: f64,
    pub booster_lifetime: f64,
    pub booster_min_amount: f64,
    pub booster_max_amount: f64,

    // Scheduling
    pub cleanup_interval: f64,
    pub spawn_interval_min: f64,
    pub spawn_interval_max: f64,
    pub pilot_interval_min: f64,
    pub pilot_interval_max: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            tick_rate: TICK_RATE,
            max_duration: MAX_DURATION,
            friction_per_second: FRICTION_PER_SECOND,
            player_size: PLAYER_SIZE,
            player_acc_amplitude: PLAYER_ACC_AMPLITUDE,
            acc_rotation_per_scroll: ACC_ROTATION_PER_SCROLL,
            engine_thrust_normal: ENGINE_THRUST_NORMAL,
            engine_thrust_speedup: ENGINE_THRUST_SPEEDUP,
            fuel_capacity: FUEL_CAPACITY,
            oxidizer_capacity: OXIDIZER_CAPACITY,
            fuel_drain_per_second: FUEL_DRAIN_PER_SECOND,
            oxidizer_drain_per_second: OXIDIZER_DRAIN_PER_SECOND,
            idle_burn_fraction: IDLE_BURN_FRACTION,
            booster_size: BOOSTER_SIZE,
            booster_lifetime: BOOSTER_LIFETIME,
            booster_min_amount: BOOSTER_MIN_AMOUNT,
            booster_max_amount: BOOSTER_MAX_AMOUNT,
            cleanup_interval: CLEANUP_INTERVAL,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            spawn_interval_max: SPAWN_INTERVAL_MAX,
            pilot_interval_min: PILOT_INTERVAL_MIN,
            pilot_interval_max: PILOT_INTERVAL_MAX,
        }
    }
}

impl SimConfig {
    /// Per-tick velocity decay factor, calibrated so that one second of
    /// ticks at `tick_rate` removes `friction_per_second` of the velocity
    /// amplitude. Precomputed once; see DESIGN.md for the off-rate caveat.
    pub fn friction_coefficient(&self) -> f64 {
        (1.0 - self.friction_per_second).powf(1.0 / self.tick_rate)
    }

    /// Panic on values the simulation cannot run with. Construction-time
    /// contract check, not a recoverable error.
    pub fn validate(&self) {
        assert!(self.world_width > 0.0, "world_width must be positive");
        assert!(self.world_height > 0.0, "world_height must be positive");
        assert!(self.tick_rate > 0.0, "tick_rate must be positive");
        assert!(
            (0.0..1.0).contains(&self.friction_per_second),
            "friction_per_second must be in [0, 1)"
        );
        assert!(
            self.spawn_interval_min > 0.0 && self.spawn_interval_max >= self.spawn_interval_min,
            "spawn interval range must be positive and ordered"
        );
        assert!(
            self.booster_min_amount > 0.0 && self.booster_max_amount >= self.booster_min_amount,
            "booster amount range must be positive and ordered"
        );
        assert!(
            self.pilot_interval_min > 0.0 && self.pilot_interval_max >= self.pilot_interval_min,
            "pilot interval range must be positive and ordered"
        );
        assert!(self.cleanup_interval > 0.0, "cleanup_interval must be positive");
        assert!(self.booster_lifetime > 0.0, "booster_lifetime must be positive");
        assert!(self.max_duration >= 0.0, "max_duration must be non-negative");
    }
}

/// Load a config file, falling back to compiled defaults when the file is
/// absent or unparseable.
pub fn load(path: &str) -> SimConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                warn!("Failed to parse {}: {}; using defaults", path, e);
                SimConfig::default()
            }
        },
        Err(_) => {
            info!("No config file at {}; using defaults", path);
            SimConfig::default()
        }
    }
}
