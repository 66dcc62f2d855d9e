use crate::config::SimConfig;
use crate::entities::Body;
use crate::types::Vector2D;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropellantKind {
    Fuel,
    Oxidizer,
}

/// A short-lived pickup carrying propellant. Boosters sit still (zero
/// velocity and acceleration) and expire if nobody collects them in time.
pub struct Booster {
    pub body: Body,
    pub kind: PropellantKind,
    pub amount: f64,
}

impl Booster {
    pub fn new(pos: Vector2D, kind: PropellantKind, amount: f64, config: &SimConfig) -> Self {
        Booster {
            body: Body::with_lifetime(
                pos,
                Vector2D::zero(),
                Vector2D::zero(),
                config.booster_size,
                config.booster_lifetime,
            ),
            kind,
            amount,
        }
    }

    /// Uniformly random position, kind and amount.
    pub fn spawn_random(rng: &mut impl Rng, config: &SimConfig) -> Self {
        let pos = Vector2D::new(
            rng.gen_range(0.0..config.world_width),
            rng.gen_range(0.0..config.world_height),
        );
        let kind = if rng.gen_bool(0.5) {
            PropellantKind::Fuel
        } else {
            PropellantKind::Oxidizer
        };
        let amount = rng.gen_range(config.booster_min_amount..=config.booster_max_amount);
        Booster::new(pos, kind, amount, config)
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }
}
