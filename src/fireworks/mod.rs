use std::ops::RangeInclusive;

pub mod firework;
pub mod particle;
pub mod schedule;
pub mod sky;

pub use firework::{Firework, Phase};
pub use particle::Particle;
pub use sky::Sky;

/// Uniform sample from an inclusive float range.
pub(crate) fn pick(rng: &mut fastrand::Rng, range: &RangeInclusive<f32>) -> f32 {
    range.start() + rng.f32() * (range.end() - range.start())
}
