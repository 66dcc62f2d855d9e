// --- Simulation Constants ---
// Authoritative defaults; any of these can be overridden via a TOML config
// file (see config.rs).
pub const WORLD_WIDTH: f64 = 1280.0;
pub const WORLD_HEIGHT: f64 = 720.0;
pub const TICK_RATE: f64 = 60.0; // Target ticks per second
pub const MAX_DURATION: f64 = 120.0; // Seconds until a run ends on its own
pub const FRICTION_PER_SECOND: f64 = 0.05; // Velocity amplitude lost per second of wall-clock time

pub const PLAYER_SIZE: f64 = 12.0; // Collision radius
pub const PLAYER_ACC_AMPLITUDE: f64 = 500.0;
pub const ACC_ROTATION_PER_SCROLL: f64 = 20.0; // Degrees per rotate event

pub const ENGINE_THRUST_NORMAL: f64 = 3.0;
pub const ENGINE_THRUST_SPEEDUP: f64 = 9.0;
pub const FUEL_CAPACITY: f64 = 1.0;
pub const OXIDIZER_CAPACITY: f64 = 1.0;
pub const FUEL_DRAIN_PER_SECOND: f64 = 0.05; // At speedup burn
pub const OXIDIZER_DRAIN_PER_SECOND: f64 = 0.03;
pub const IDLE_BURN_FRACTION: f64 = 0.1; // Share of the speedup drain while on without speedup

pub const BOOSTER_SIZE: f64 = 8.0; // Collision radius
pub const BOOSTER_LIFETIME: f64 = 10.0; // Seconds before an uncollected booster expires
pub const BOOSTER_MIN_AMOUNT: f64 = 0.1;
pub const BOOSTER_MAX_AMOUNT: f64 = 0.4;

pub const CLEANUP_INTERVAL: f64 = 1.0; // Seconds between dead-booster compaction passes
pub const SPAWN_INTERVAL_MIN: f64 = 2.0;
pub const SPAWN_INTERVAL_MAX: f64 = 7.0;

pub const PILOT_INTERVAL_MIN: f64 = 0.2; // Scripted pilot decision cadence
pub const PILOT_INTERVAL_MAX: f64 = 1.0;
