//! Decorative particle burst for the closing scene

use rand::Rng;

use crate::domain::{Color, Vec2, VisualObject};

pub const PARTICLE_COUNT: usize = 20;
pub const PARTICLE_COLORS: [Color; 4] = [Color::RED, Color::YELLOW, Color::GREEN, Color::BLUE];
/// Particles land within `±SPREAD.x` horizontally and `±SPREAD.y` vertically
pub const SPREAD: Vec2 = Vec2::new(4.0, 2.0);

/// Scatter [`PARTICLE_COUNT`] dots with colors and positions drawn from `rng`
pub fn particle_burst<R: Rng + ?Sized>(rng: &mut R) -> Vec<VisualObject> {
    (0..PARTICLE_COUNT)
        .map(|_| {
            let color = PARTICLE_COLORS[rng.gen_range(0..PARTICLE_COLORS.len())];
            let x = rng.gen_range(-SPREAD.x..=SPREAD.x);
            let y = rng.gen_range(-SPREAD.y..=SPREAD.y);
            VisualObject::dot(Vec2::new(x, y), color)
        })
        .collect()
}
