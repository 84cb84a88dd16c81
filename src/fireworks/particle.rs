use crate::color::Hsl;
use crate::config::Tuning;
use crate::surface::{Paint, Surface};

/// One fragment of a burst.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub color: Hsl,
    pub size: f32,
    pub sparkle: bool,
}

impl Particle {
    pub fn step(&mut self, tuning: &Tuning) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += tuning.gravity;
        self.life -= tuning.particle_decay;
        self.vx *= tuning.particle_damping;
        self.vy *= tuning.particle_damping;
        self.size *= tuning.size_shrink;
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let color = self.color.to_rgb();
        if self.sparkle {
            surface.fill_circle(
                self.x,
                self.y,
                self.size * 1.5,
                Paint {
                    color,
                    alpha: self.life,
                    glow: 20.0,
                },
            );
            // inner highlight
            surface.fill_circle(
                self.x,
                self.y,
                self.size * 0.5,
                Paint {
                    color,
                    alpha: self.life * 0.5,
                    glow: 20.0,
                },
            );
        } else {
            surface.fill_circle(
                self.x,
                self.y,
                self.size,
                Paint {
                    color,
                    alpha: self.life,
                    glow: 8.0,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::Recorder;

    fn particle(sparkle: bool) -> Particle {
        Particle {
            x: 50.0,
            y: 50.0,
            vx: 2.0,
            vy: -3.0,
            life: 1.0,
            color: Hsl::new(30.0, 100.0, 70.0),
            size: 2.0,
            sparkle,
        }
    }

    #[test]
    fn step_integrates_then_damps() {
        let tuning = Tuning::rich();
        let mut p = particle(false);
        p.step(&tuning);

        assert_eq!(p.x, 52.0);
        assert_eq!(p.y, 47.0);
        assert!((p.vx - 2.0 * 0.98).abs() < 1e-6);
        assert!((p.vy - (-3.0 + 0.12) * 0.98).abs() < 1e-6);
        assert!((p.life - 0.985).abs() < 1e-6);
        assert!((p.size - 2.0 * 0.995).abs() < 1e-6);
    }

    #[test]
    fn simple_tuning_keeps_size() {
        let mut p = particle(false);
        p.step(&Tuning::simple());
        assert_eq!(p.size, 2.0);
    }

    #[test]
    fn sparkle_draws_inner_highlight() {
        let mut surface = Recorder::new(100.0, 100.0);
        let mut p = particle(true);
        p.life = 0.6;
        p.draw(&mut surface);

        let circles: Vec<_> = surface.circles().collect();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].2, 3.0);
        assert_eq!(circles[0].3.alpha, 0.6);
        assert_eq!(circles[1].2, 1.0);
        assert_eq!(circles[1].3.alpha, 0.3);
    }

    #[test]
    fn plain_particle_draws_once_at_life_alpha() {
        let mut surface = Recorder::new(100.0, 100.0);
        let mut p = particle(false);
        p.life = 0.4;
        p.draw(&mut surface);

        let circles: Vec<_> = surface.circles().collect();
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].2, 2.0);
        assert_eq!(circles[0].3.alpha, 0.4);
        assert_eq!(circles[0].3.glow, 8.0);
    }
}
