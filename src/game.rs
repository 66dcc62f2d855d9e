use std::f64::consts::TAU;

use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::boosters::{Booster, PropellantKind};
use crate::config::SimConfig;
use crate::entities::Player;
use crate::gauge::Timer;
use crate::types::{Vector2D, wrap_coordinate};

/// Discrete control input, delivered by the hosting loop between ticks.
#[derive(Clone, Copy, Debug)]
pub enum ControlEvent {
    EngineOn,
    EngineOff,
    Speedup(bool),
    RotateAcc(f64),
    AimAcc(Vector2D),
}

/// Which control style drives the ship. The physics core is shared; only
/// the event source differs. RandomPilot generates its own events on a
/// randomized cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlScheme {
    ScrollRotate,
    CursorAim,
    RandomPilot,
}

/// The simulation world: owns the player and all boosters, advances one
/// tick at a time, and terminates when the player dies or the configured
/// duration runs out.
pub struct Game {
    config: SimConfig,
    friction_coeff: f64,
    pub player: Player,
    boosters: Vec<Booster>,
    clean_timer: Timer,
    spawn_timer: Timer,
    pilot_timer: Timer,
    scheme: ControlScheme,
    elapsed: f64,
    running: bool,
    rng: StdRng,
}

impl Game {
    /// The random source is injected so that a seeded rng replays exactly.
    pub fn new(config: SimConfig, scheme: ControlScheme, mut rng: StdRng) -> Self {
        config.validate();

        let start = Vector2D::new(config.world_width / 2.0, config.world_height / 2.0);
        let acc = random_unit_vector(&mut rng).scale(config.player_acc_amplitude);
        let player = Player::new(start, acc, &config);

        let spawn_period = rng.gen_range(config.spawn_interval_min..=config.spawn_interval_max);
        let pilot_period = rng.gen_range(config.pilot_interval_min..=config.pilot_interval_max);

        Game {
            friction_coeff: config.friction_coefficient(),
            player,
            boosters: Vec::new(),
            clean_timer: Timer::new(config.cleanup_interval),
            spawn_timer: Timer::new(spawn_period),
            pilot_timer: Timer::new(pilot_period),
            scheme,
            elapsed: 0.0,
            running: true,
            rng,
            config,
        }
    }

    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::EngineOn => self.player.engine.on(),
            ControlEvent::EngineOff => self.player.engine.off(),
            ControlEvent::Speedup(speedup) => self.player.engine.set_speedup(speedup),
            ControlEvent::RotateAcc(degrees) => self.player.rotate_acc(degrees),
            ControlEvent::AimAcc(target) => {
                if !self.player.aim_acc(target) {
                    warn!("aim target coincides with the player; direction undefined");
                }
            }
        }
    }

    /// Advance one tick. No-op once terminated.
    pub fn update(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "time cannot run backwards");
        if !self.running {
            return;
        }
        self.elapsed += dt;

        self.player.update(self.friction_coeff, dt);
        self.wrap_player();
        self.resolve_collisions();
        self.run_cleanup_timer(dt);
        self.run_spawn_timer(dt);
        if self.scheme == ControlScheme::RandomPilot {
            self.run_pilot_timer(dt);
        }

        if !self.player.is_alive() || self.elapsed >= self.config.max_duration {
            info!("simulation ended after {:.2}s", self.elapsed);
            self.running = false;
        }
    }

    /// Snap an out-of-bounds player to the opposite edge, each axis on its
    /// own. Checked once per tick; a body fast enough to cross the world
    /// twice in one tick is out of scope.
    fn wrap_player(&mut self) {
        let body = &mut self.player.body;
        body.pos.x = wrap_coordinate(body.pos.x, self.config.world_width);
        body.pos.y = wrap_coordinate(body.pos.y, self.config.world_height);
    }

    fn resolve_collisions(&mut self) {
        for booster in &mut self.boosters {
            if !booster.is_alive() || !self.player.body.collides_with(&booster.body) {
                continue;
            }
            let gauge = match booster.kind {
                PropellantKind::Fuel => &mut self.player.engine.fuel,
                PropellantKind::Oxidizer => &mut self.player.engine.oxidizer,
            };
            let applied = gauge.change(booster.amount);
            debug!(
                "collected {:?} booster: applied {:.3} of {:.3}, tank at {:.3}",
                booster.kind,
                applied,
                booster.amount,
                gauge.value()
            );
            // Spent on first contact, even when the gauge had no room left.
            booster.body.kill();
        }
    }

    fn run_cleanup_timer(&mut self, dt: f64) {
        self.clean_timer.tick(dt);
        if self.clean_timer.running() {
            return;
        }
        let before = self.boosters.len();
        self.boosters.retain(|booster| booster.is_alive());
        let pruned = before - self.boosters.len();
        if pruned > 0 {
            debug!("pruned {} dead boosters", pruned);
        }
        self.clean_timer.reset();
    }

    fn run_spawn_timer(&mut self, dt: f64) {
        self.spawn_timer.tick(dt);
        if self.spawn_timer.running() {
            return;
        }
        let booster = Booster::spawn_random(&mut self.rng, &self.config);
        info!(
            "spawned {:?} booster ({:.2}) at ({:.0}, {:.0})",
            booster.kind, booster.amount, booster.body.pos.x, booster.body.pos.y
        );
        self.boosters.push(booster);
        let period = self
            .rng
            .gen_range(self.config.spawn_interval_min..=self.config.spawn_interval_max);
        self.spawn_timer.reset_with(period);
    }

    fn run_pilot_timer(&mut self, dt: f64) {
        self.pilot_timer.tick(dt);
        if self.pilot_timer.running() {
            return;
        }
        let event = self.random_pilot_event();
        debug!("pilot: {:?}", event);
        self.apply(event);
        let period = self
            .rng
            .gen_range(self.config.pilot_interval_min..=self.config.pilot_interval_max);
        self.pilot_timer.reset_with(period);
    }

    /// The scripted pilot toggles the engine or speedup, or nudges the
    /// thrust direction either way.
    fn random_pilot_event(&mut self) -> ControlEvent {
        match self.rng.gen_range(0..4) {
            0 => {
                if self.player.engine.is_on() {
                    ControlEvent::EngineOff
                } else {
                    ControlEvent::EngineOn
                }
            }
            1 => ControlEvent::Speedup(!self.player.engine.is_speedup()),
            2 => ControlEvent::RotateAcc(self.config.acc_rotation_per_scroll),
            _ => ControlEvent::RotateAcc(-self.config.acc_rotation_per_scroll),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn time_left(&self) -> f64 {
        (self.config.max_duration - self.elapsed).max(0.0)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    /// Boosters that still matter. Dead entries pending compaction are
    /// filtered out here; the raw storage is an implementation detail.
    pub fn live_boosters(&self) -> impl Iterator<Item = &Booster> {
        self.boosters.iter().filter(|booster| booster.is_alive())
    }
}

fn random_unit_vector(rng: &mut impl Rng) -> Vector2D {
    let alpha = rng.gen_range(0.0..TAU);
    Vector2D::new(alpha.cos(), alpha.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn new_game(scheme: ControlScheme) -> Game {
        Game::new(SimConfig::default(), scheme, StdRng::seed_from_u64(42))
    }

    fn plant_booster(game: &mut Game, pos: Vector2D, kind: PropellantKind, amount: f64) {
        let booster = Booster::new(pos, kind, amount, game.config());
        game.boosters.push(booster);
    }

    #[test]
    fn test_friction_decays_five_percent_over_one_second() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.player.body.vel = Vector2D::new(100.0, 0.0);
        let dt = 1.0 / game.config().tick_rate;
        for _ in 0..60 {
            game.update(dt);
        }
        assert!(approx_eq(game.player.body.vel.x, 95.0));
        assert!(approx_eq(game.player.body.vel.y, 0.0));
    }

    #[test]
    fn test_wrap_right_edge_to_zero() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let width = game.config().world_width;
        game.player.body.pos = Vector2D::new(width - 1.0, 100.0);
        game.player.body.vel = Vector2D::new(2.0, 0.0);
        game.update(1.0);
        assert!(approx_eq(game.player.body.pos.x, 0.0));
    }

    #[test]
    fn test_wrap_left_edge_to_width() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let width = game.config().world_width;
        game.player.body.pos = Vector2D::new(1.0, 100.0);
        game.player.body.vel = Vector2D::new(-2.0, 0.0);
        game.update(1.0);
        assert!(approx_eq(game.player.body.pos.x, width));
    }

    #[test]
    fn test_booster_transfer_clamps_and_kills() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.player.engine.fuel.set_percent_full(0.8);
        let pos = game.player.body.pos;
        plant_booster(&mut game, pos, PropellantKind::Fuel, 0.3);

        game.update(0.001);
        assert!(approx_eq(game.player.engine.fuel.value(), 1.0));
        assert!(!game.boosters[0].is_alive());
    }

    #[test]
    fn test_booster_transfers_only_once() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.player.engine.fuel.set_percent_full(0.5);
        let pos = game.player.body.pos;
        plant_booster(&mut game, pos, PropellantKind::Fuel, 0.2);

        game.update(0.001);
        game.update(0.001);
        assert!(approx_eq(game.player.engine.fuel.value(), 0.7));
    }

    // The deliberate waste rule: a booster is consumed on contact even when
    // the matching gauge is already full and nothing transfers.
    #[test]
    fn test_booster_wasted_on_full_gauge() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let pos = game.player.body.pos;
        plant_booster(&mut game, pos, PropellantKind::Oxidizer, 0.3);

        game.update(0.001);
        assert!(approx_eq(
            game.player.engine.oxidizer.value(),
            game.config().oxidizer_capacity
        ));
        assert!(!game.boosters[0].is_alive());
    }

    #[test]
    fn test_cleanup_compacts_dead_boosters() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let pos = game.player.body.pos;
        plant_booster(&mut game, pos, PropellantKind::Fuel, 0.2);

        game.update(0.001);
        assert_eq!(game.boosters.len(), 1);
        assert_eq!(game.live_boosters().count(), 0);

        // Cross the 1s cleanup threshold.
        game.update(game.config().cleanup_interval);
        assert_eq!(game.boosters.len(), 0);
    }

    #[test]
    fn test_spawn_timer_eventually_spawns_within_bounds() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let steps = (10.0 * game.config().tick_rate) as usize;
        let dt = 1.0 / game.config().tick_rate;
        for _ in 0..steps {
            game.update(dt);
        }
        assert!(game.live_boosters().count() > 0);
        for booster in game.live_boosters() {
            assert!(booster.body.pos.x >= 0.0 && booster.body.pos.x < game.config.world_width);
            assert!(booster.body.pos.y >= 0.0 && booster.body.pos.y < game.config.world_height);
        }
    }

    // Edge-triggered expiry: one oversized tick produces one spawn, with no
    // catch-up for the intervals it skipped over.
    #[test]
    fn test_spawn_timer_fires_once_per_expiry() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.update(30.0);
        assert_eq!(game.boosters.len(), 1);
    }

    #[test]
    fn test_zero_max_duration_terminates_on_first_tick() {
        let mut config = SimConfig::default();
        config.max_duration = 0.0;
        let mut game = Game::new(config, ControlScheme::ScrollRotate, StdRng::seed_from_u64(1));
        assert!(game.is_running());
        game.update(0.016);
        assert!(!game.is_running());
    }

    #[test]
    fn test_update_is_noop_after_termination() {
        let mut config = SimConfig::default();
        config.max_duration = 0.0;
        let mut game = Game::new(config, ControlScheme::ScrollRotate, StdRng::seed_from_u64(1));
        game.update(0.016);
        let pos = game.player.body.pos;
        let elapsed = game.elapsed();
        game.update(1.0);
        assert_eq!(game.player.body.pos, pos);
        assert!(approx_eq(game.elapsed(), elapsed));
    }

    #[test]
    fn test_player_death_terminates() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.player.body.kill();
        game.update(0.016);
        assert!(!game.is_running());
    }

    #[test]
    fn test_engine_depletion_stops_velocity_gain() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        game.apply(ControlEvent::EngineOn);
        game.apply(ControlEvent::Speedup(true));
        let fuel = game.player.engine.fuel.value();
        game.player.engine.fuel.change(-fuel);

        let vel_before = game.player.body.vel.length();
        game.update(0.016);
        // Friction only; no thrust without propellant.
        assert!(game.player.body.vel.length() <= vel_before);
        assert!(approx_eq(game.player.engine.thrust_level(), 0.0));
    }

    #[test]
    fn test_rotate_event_spins_acceleration() {
        let mut game = new_game(ControlScheme::ScrollRotate);
        let before = game.player.body.acc;
        game.apply(ControlEvent::RotateAcc(20.0));
        let after = game.player.body.acc;
        assert!(approx_eq(before.length(), after.length()));
        assert!(before != after);
    }

    #[test]
    fn test_aim_event_at_player_position_changes_nothing() {
        let mut game = new_game(ControlScheme::CursorAim);
        let before = game.player.body.acc;
        game.apply(ControlEvent::AimAcc(game.player.body.pos));
        assert_eq!(game.player.body.acc, before);
    }

    #[test]
    fn test_random_pilot_takes_actions() {
        let mut game = new_game(ControlScheme::RandomPilot);
        let initial_acc = game.player.body.acc;
        let dt = 1.0 / game.config().tick_rate;
        for _ in 0..(5.0 * game.config().tick_rate) as usize {
            game.update(dt);
        }
        let engine = &game.player.engine;
        assert!(
            engine.is_on() || engine.is_speedup() || game.player.body.acc != initial_acc,
            "pilot made no observable move in five seconds"
        );
    }
}
