use super::particle::Particle;
use super::pick;
use crate::color::Hsl;
use crate::config::Tuning;
use crate::surface::{Paint, Surface};
use std::collections::VecDeque;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Ascending,
    Exploded,
}

/// A rocket that climbs towards its apex and then turns into a particle
/// cloud. The switch happens once and never goes back.
#[derive(Clone, Debug)]
pub struct Firework {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub color: Hsl,
    phase: Phase,
    trail: VecDeque<(f32, f32)>,
    particles: Vec<Particle>,
    fade_in: f32,
    life: f32,
}

impl Firework {
    /// A rocket leaving `(x, y)` towards a random apex in the upper part of
    /// a viewport `view_height` pixels tall.
    pub fn launch(
        x: f32,
        y: f32,
        view_height: f32,
        tuning: &Tuning,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let target_x = x + (rng.f32() - 0.5) * tuning.target_jitter;
        let target_y = rng.f32() * (view_height * tuning.apex_band) + tuning.apex_floor;
        let speed = pick(rng, &tuning.launch_speed);
        let color = Hsl::new(rng.f32() * 360.0, 100.0, 70.0);
        Self::aimed(x, y, target_x, target_y, speed, color, tuning)
    }

    pub fn aimed(
        x: f32,
        y: f32,
        target_x: f32,
        target_y: f32,
        speed: f32,
        color: Hsl,
        tuning: &Tuning,
    ) -> Self {
        let angle = (target_y - y).atan2(target_x - x);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            target_x,
            target_y,
            color,
            phase: Phase::Ascending,
            trail: VecDeque::with_capacity(tuning.trail_cap + 1),
            particles: Vec::new(),
            fade_in: if tuning.fade_in_step.is_some() { 0.0 } else { 1.0 },
            life: 1.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exploded(&self) -> bool {
        self.phase == Phase::Exploded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Past positions, newest first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &(f32, f32)> {
        self.trail.iter()
    }

    pub fn fade_in(&self) -> f32 {
        self.fade_in
    }

    /// Overall decay after the burst. Only informative: removal is decided
    /// by [`Firework::is_dead`].
    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn is_dead(&self) -> bool {
        self.exploded() && self.particles.is_empty()
    }

    pub fn update(&mut self, tuning: &Tuning, rng: &mut fastrand::Rng) {
        match self.phase {
            Phase::Ascending => {
                if let Some(step) = tuning.fade_in_step {
                    self.fade_in = (self.fade_in + step).min(1.0);
                }

                self.trail.push_front((self.x, self.y));
                self.trail.truncate(tuning.trail_cap);

                self.x += self.vx;
                self.y += self.vy;
                self.vy += tuning.gravity * tuning.ascent_damping;

                if self.y <= self.target_y || self.vy > 0.0 {
                    self.explode(tuning, rng);
                }
            }
            Phase::Exploded => {
                for particle in &mut self.particles {
                    particle.step(tuning);
                }
                self.particles.retain(|p| !p.is_spent());
                self.life -= tuning.life_decay;
            }
        }
    }

    fn explode(&mut self, tuning: &Tuning, rng: &mut fastrand::Rng) {
        self.phase = Phase::Exploded;
        self.trail.clear();

        let count = rng.usize(tuning.burst.clone()).max(1);
        self.particles.reserve_exact(count);

        for i in 0..count {
            // Evenly fanned, then jittered, so bursts never clump.
            let angle = PI * 2.0 * i as f32 / count as f32 + rng.f32() * tuning.angle_jitter;
            let speed = pick(rng, &tuning.burst_speed);
            let hue = match tuning.hue_spread {
                Some(spread) => rng.f32() * spread + self.color.h - spread / 2.0,
                None => rng.f32() * 360.0,
            };

            self.particles.push(Particle {
                x: self.x,
                y: self.y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: 1.0,
                color: Hsl::new(hue, 100.0, pick(rng, &tuning.lightness)),
                size: pick(rng, &tuning.size),
                sparkle: rng.f32() < tuning.sparkle_chance,
            });
        }

        log::debug!(
            "firework burst at ({:.0}, {:.0}) into {} particles",
            self.x,
            self.y,
            count
        );
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self.phase {
            Phase::Ascending => {
                let color = self.color.to_rgb();
                let len = self.trail.len() as f32;
                for (index, &(x, y)) in self.trail.iter().enumerate() {
                    let alpha = (len - index as f32) / len * self.fade_in;
                    surface.fill_circle(
                        x,
                        y,
                        2.5,
                        Paint {
                            color,
                            alpha: alpha * 0.9,
                            glow: 15.0,
                        },
                    );
                }

                surface.fill_circle(
                    self.x,
                    self.y,
                    4.0,
                    Paint {
                        color,
                        alpha: self.fade_in,
                        glow: 25.0,
                    },
                );
            }
            Phase::Exploded => {
                for particle in &self.particles {
                    particle.draw(surface);
                }
            }
        }
    }
}
