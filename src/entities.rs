use crate::config::SimConfig;
use crate::gauge::{Gauge, Timer};
use crate::types::Vector2D;
use log::debug;

/// Common state of anything that moves through the world: kinematics, a
/// collision radius, a lifetime and a liveness flag.
pub struct Body {
    pub pos: Vector2D,
    pub vel: Vector2D,
    pub acc: Vector2D,
    pub size: f64,
    pub lifetime: Timer,
    alive: bool,
}

impl Body {
    /// Body that never expires on its own.
    pub fn new(pos: Vector2D, vel: Vector2D, acc: Vector2D, size: f64) -> Self {
        Body {
            pos,
            vel,
            acc,
            size,
            lifetime: Timer::new(f64::INFINITY),
            alive: true,
        }
    }

    pub fn with_lifetime(
        pos: Vector2D,
        vel: Vector2D,
        acc: Vector2D,
        size: f64,
        lifetime_seconds: f64,
    ) -> Self {
        let mut body = Body::new(pos, vel, acc, size);
        body.lifetime = Timer::new(lifetime_seconds);
        body
    }

    /// One tick of motion. Order matters: position from the old velocity,
    /// then thrust-scaled acceleration, then friction decay. The lifetime
    /// ticks every update, dead or not.
    pub fn integrate(&mut self, thrust: f64, friction_coeff: f64, dt: f64) {
        self.pos = self.pos.add(self.vel.scale(dt));
        self.vel = self.vel.add(self.acc.scale(thrust * dt));
        self.vel = self.vel.scale(friction_coeff);
        self.lifetime.tick(dt);
    }

    pub fn is_alive(&self) -> bool {
        self.alive && self.lifetime.running()
    }

    /// Idempotent.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Circle overlap by squared distance, strict inequality.
    pub fn collides_with(&self, other: &Body) -> bool {
        let reach = self.size + other.size;
        self.pos.distance_squared(other.pos) < reach * reach
    }
}

/// Propellant-gated thrust state machine. The on/speedup flags select a
/// thrust level; either gauge running dry forces the level to zero until
/// the gauges are refilled.
pub struct Engine {
    on: bool,
    speedup: bool,
    pub fuel: Gauge,
    pub oxidizer: Gauge,
    thrust_normal: f64,
    thrust_speedup: f64,
    fuel_drain: f64,
    oxidizer_drain: f64,
    idle_burn_fraction: f64,
}

impl Engine {
    pub fn new(config: &SimConfig) -> Self {
        Engine {
            on: false,
            speedup: false,
            fuel: Gauge::new(config.fuel_capacity),
            oxidizer: Gauge::new(config.oxidizer_capacity),
            thrust_normal: config.engine_thrust_normal,
            thrust_speedup: config.engine_thrust_speedup,
            fuel_drain: config.fuel_drain_per_second,
            oxidizer_drain: config.oxidizer_drain_per_second,
            idle_burn_fraction: config.idle_burn_fraction,
        }
    }

    pub fn on(&mut self) {
        self.on = true;
        debug!("engine on");
    }

    pub fn off(&mut self) {
        self.on = false;
        debug!("engine off");
    }

    /// Latched even while the engine is off.
    pub fn set_speedup(&mut self, speedup: bool) {
        self.speedup = speedup;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_speedup(&self) -> bool {
        self.speedup
    }

    pub fn has_propellants(&self) -> bool {
        self.fuel.is_alive() && self.oxidizer.is_alive()
    }

    /// Acceleration multiplier for the current tick. Zero while off or dry.
    pub fn thrust_level(&self) -> f64 {
        if !self.on || !self.has_propellants() {
            return 0.0;
        }
        if self.speedup {
            self.thrust_speedup
        } else {
            self.thrust_normal
        }
    }

    /// Burn propellant for dt seconds. Idle burn (on, no speedup) consumes
    /// a fixed fraction of the speedup rates.
    pub fn update(&mut self, dt: f64) {
        if !self.on || !self.has_propellants() {
            return;
        }
        let rate = if self.speedup {
            1.0
        } else {
            self.idle_burn_fraction
        };
        self.fuel.change(-self.fuel_drain * rate * dt);
        self.oxidizer.change(-self.oxidizer_drain * rate * dt);
    }
}

/// The ship: a Body driven by an Engine. The engine's thrust level scales
/// the acceleration during integration; controls steer the acceleration
/// direction without touching its magnitude.
pub struct Player {
    pub body: Body,
    pub engine: Engine,
}

impl Player {
    pub fn new(pos: Vector2D, acc: Vector2D, config: &SimConfig) -> Self {
        Player {
            body: Body::new(pos, Vector2D::zero(), acc, config.player_size),
            engine: Engine::new(config),
        }
    }

    pub fn update(&mut self, friction_coeff: f64, dt: f64) {
        let thrust = self.engine.thrust_level();
        self.body.integrate(thrust, friction_coeff, dt);
        self.engine.update(dt);
    }

    /// Rotate the thrust direction by the given angle in degrees.
    pub fn rotate_acc(&mut self, angle_degrees: f64) {
        self.body.acc = self.body.acc.rotated(angle_degrees);
    }

    /// Point the thrust direction at a world-space target, preserving the
    /// acceleration magnitude. Returns false (and changes nothing) when the
    /// target coincides with the ship, which has no defined direction.
    pub fn aim_acc(&mut self, target: Vector2D) -> bool {
        let magnitude = self.body.acc.length();
        match target.sub(self.body.pos).normalized() {
            Some(direction) => {
                self.body.acc = direction.scale(magnitude);
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn test_config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_body_integration_order() {
        let mut body = Body::new(
            Vector2D::zero(),
            Vector2D::new(10.0, 0.0),
            Vector2D::new(100.0, 0.0),
            1.0,
        );
        body.integrate(1.0, 0.9, 0.1);
        // Position moves by the pre-update velocity only.
        assert!(approx_eq(body.pos.x, 1.0));
        // Velocity gains acceleration, then decays: (10 + 100*0.1) * 0.9.
        assert!(approx_eq(body.vel.x, 18.0));
    }

    #[test]
    fn test_body_thrust_scalar_scales_acceleration() {
        let mut body = Body::new(
            Vector2D::zero(),
            Vector2D::zero(),
            Vector2D::new(100.0, 0.0),
            1.0,
        );
        body.integrate(3.0, 1.0, 0.1);
        assert!(approx_eq(body.vel.x, 30.0));
    }

    #[test]
    fn test_body_default_lifetime_is_infinite() {
        let mut body = Body::new(Vector2D::zero(), Vector2D::zero(), Vector2D::zero(), 1.0);
        body.integrate(0.0, 1.0, 1e9);
        assert!(body.is_alive());
    }

    #[test]
    fn test_body_lifetime_expiry() {
        let mut body =
            Body::with_lifetime(Vector2D::zero(), Vector2D::zero(), Vector2D::zero(), 1.0, 2.0);
        body.integrate(0.0, 1.0, 1.5);
        assert!(body.is_alive());
        body.integrate(0.0, 1.0, 0.5);
        assert!(!body.is_alive());
    }

    #[test]
    fn test_body_lifetime_ticks_while_dead() {
        let mut body =
            Body::with_lifetime(Vector2D::zero(), Vector2D::zero(), Vector2D::zero(), 1.0, 5.0);
        body.kill();
        body.integrate(0.0, 1.0, 1.0);
        assert!(approx_eq(body.lifetime.elapsed(), 1.0));
    }

    #[test]
    fn test_body_kill_is_idempotent() {
        let mut body = Body::new(Vector2D::zero(), Vector2D::zero(), Vector2D::zero(), 1.0);
        body.kill();
        body.kill();
        assert!(!body.is_alive());
    }

    #[test]
    fn test_collision_is_strict_on_the_boundary() {
        let a = Body::new(Vector2D::zero(), Vector2D::zero(), Vector2D::zero(), 2.0);
        let touching = Body::new(
            Vector2D::new(5.0, 0.0),
            Vector2D::zero(),
            Vector2D::zero(),
            3.0,
        );
        let overlapping = Body::new(
            Vector2D::new(4.999, 0.0),
            Vector2D::zero(),
            Vector2D::zero(),
            3.0,
        );
        assert!(!a.collides_with(&touching));
        assert!(a.collides_with(&overlapping));
    }

    #[test]
    fn test_engine_thrust_levels() {
        let config = test_config();
        let mut engine = Engine::new(&config);
        assert!(approx_eq(engine.thrust_level(), 0.0));
        engine.on();
        assert!(approx_eq(engine.thrust_level(), config.engine_thrust_normal));
        engine.set_speedup(true);
        assert!(approx_eq(engine.thrust_level(), config.engine_thrust_speedup));
        engine.off();
        assert!(approx_eq(engine.thrust_level(), 0.0));
    }

    #[test]
    fn test_engine_speedup_latched_while_off() {
        let config = test_config();
        let mut engine = Engine::new(&config);
        engine.set_speedup(true);
        assert!(approx_eq(engine.thrust_level(), 0.0));
        engine.on();
        assert!(approx_eq(engine.thrust_level(), config.engine_thrust_speedup));
    }

    #[test]
    fn test_engine_depletion_forces_zero_thrust() {
        let mut engine = Engine::new(&test_config());
        engine.on();
        engine.set_speedup(true);
        let drained = engine.fuel.change(-engine.fuel.value());
        assert!(approx_eq(drained, -engine.fuel.max_value()));
        assert!(!engine.has_propellants());
        assert!(approx_eq(engine.thrust_level(), 0.0));
    }

    #[test]
    fn test_engine_no_drain_while_off() {
        let mut engine = Engine::new(&test_config());
        let fuel_before = engine.fuel.value();
        engine.update(10.0);
        assert!(approx_eq(engine.fuel.value(), fuel_before));
    }

    #[test]
    fn test_engine_idle_burn_is_a_fraction_of_speedup_burn() {
        let config = test_config();

        let mut idle = Engine::new(&config);
        idle.on();
        idle.update(1.0);
        let idle_spent = config.fuel_capacity - idle.fuel.value();

        let mut hot = Engine::new(&config);
        hot.on();
        hot.set_speedup(true);
        hot.update(1.0);
        let hot_spent = config.fuel_capacity - hot.fuel.value();

        assert!(approx_eq(idle_spent, hot_spent * config.idle_burn_fraction));
    }

    #[test]
    fn test_engine_update_noop_when_depleted() {
        let mut engine = Engine::new(&test_config());
        engine.on();
        engine.oxidizer.change(-engine.oxidizer.value());
        let fuel_before = engine.fuel.value();
        engine.update(1.0);
        assert!(approx_eq(engine.fuel.value(), fuel_before));
    }

    #[test]
    fn test_player_rotate_acc_keeps_magnitude() {
        let config = test_config();
        let mut player = Player::new(Vector2D::zero(), Vector2D::new(500.0, 0.0), &config);
        player.rotate_acc(90.0);
        assert!(approx_eq(player.body.acc.length(), 500.0));
        assert!(approx_eq(player.body.acc.x, 0.0));
        assert!(approx_eq(player.body.acc.y, 500.0));
    }

    #[test]
    fn test_player_aim_acc() {
        let config = test_config();
        let mut player = Player::new(
            Vector2D::new(10.0, 10.0),
            Vector2D::new(500.0, 0.0),
            &config,
        );
        assert!(player.aim_acc(Vector2D::new(10.0, 30.0)));
        assert!(approx_eq(player.body.acc.x, 0.0));
        assert!(approx_eq(player.body.acc.y, 500.0));
    }

    #[test]
    fn test_player_aim_acc_at_own_position_is_rejected() {
        let config = test_config();
        let mut player = Player::new(
            Vector2D::new(10.0, 10.0),
            Vector2D::new(500.0, 0.0),
            &config,
        );
        assert!(!player.aim_acc(Vector2D::new(10.0, 10.0)));
        assert!(approx_eq(player.body.acc.x, 500.0));
        assert!(approx_eq(player.body.acc.y, 0.0));
    }

    #[test]
    fn test_player_engine_off_means_no_velocity_gain() {
        let config = test_config();
        let mut player = Player::new(Vector2D::zero(), Vector2D::new(500.0, 0.0), &config);
        player.update(1.0, 0.1);
        assert!(approx_eq(player.body.vel.length(), 0.0));
    }
}
