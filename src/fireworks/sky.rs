use super::firework::Firework;
use super::schedule::{Scheduler, Task};
use crate::config::{Finale, Spread, Tuning};
use crate::surface::Surface;
use std::time::Duration;

/// The whole show: live fireworks, the surface they draw on, and the clock
/// that drives frames and delayed launches. Everything runs on the caller's
/// thread from [`Sky::advance`].
pub struct Sky<S: Surface> {
    surface: S,
    tuning: Tuning,
    rng: fastrand::Rng,
    fireworks: Vec<Firework>,
    scheduler: Scheduler,
    frame_interval: Duration,
    running: bool,
    finale_epoch: u64,
    frames: u64,
}

impl<S: Surface> Sky<S> {
    pub fn new(surface: S, tuning: Tuning, frame_interval: Duration, rng: fastrand::Rng) -> Self {
        Self {
            surface,
            tuning,
            rng,
            fireworks: Vec::new(),
            scheduler: Scheduler::new(),
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            running: false,
            finale_epoch: 0,
            frames: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Resizing through this is fine at any time; the next frame uses the
    /// new dimensions.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// True while a frame is scheduled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// No frame scheduled and no launch waiting. A finale may still be
    /// fading the surface.
    pub fn is_idle(&self) -> bool {
        !self.running && self.scheduler.pending(|t| matches!(t, Task::Spawn { .. })) == 0
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Queues a staggered batch of rockets and makes sure frames are running.
    pub fn launch(&mut self) {
        let count = self.rng.usize(self.tuning.batch.clone()).max(1);
        log::info!("launching {} fireworks", count);

        for slot in 0..count {
            self.scheduler
                .schedule(self.tuning.stagger * slot as u32, Task::Spawn { slot, of: count });
        }
        self.start_loop();
    }

    /// Moves the clock forward by `elapsed`, running every task that falls
    /// due on the way.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.scheduler.now() + elapsed;
        while let Some(task) = self.scheduler.next_due(deadline) {
            self.run(task);
        }
        self.scheduler.settle(deadline);
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Frame => self.frame(),
            Task::Spawn { slot, of } => self.spawn(slot, of),
            Task::Dissolve { epoch, level } => {
                if epoch != self.finale_epoch {
                    return;
                }
                if level <= 0.0 {
                    self.surface.clear();
                    log::debug!("finale done");
                } else if let Finale::Dissolve { interval, step } = self.tuning.finale {
                    self.surface.fade(level);
                    self.scheduler.schedule(
                        interval,
                        Task::Dissolve {
                            epoch,
                            level: level - step,
                        },
                    );
                }
            }
            Task::Clear { epoch } => {
                if epoch == self.finale_epoch {
                    self.surface.clear();
                    log::debug!("finale done");
                }
            }
        }
    }

    fn start_loop(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        // Any finale still in flight belongs to the previous show.
        self.finale_epoch += 1;
        self.scheduler.schedule(Duration::ZERO, Task::Frame);
        log::debug!("render loop started at {:?}", self.scheduler.now());
    }

    fn frame(&mut self) {
        self.frames += 1;
        self.surface.fade(self.tuning.fade_alpha);

        for firework in &mut self.fireworks {
            firework.update(&self.tuning, &mut self.rng);
            firework.draw(&mut self.surface);
        }
        self.fireworks.retain(|f| !f.is_dead());

        if self.fireworks.is_empty() {
            self.running = false;
            log::debug!("render loop stopped after {} frames", self.frames);
            self.begin_finale();
        } else {
            self.scheduler.schedule(self.frame_interval, Task::Frame);
        }
    }

    fn begin_finale(&mut self) {
        self.finale_epoch += 1;
        let epoch = self.finale_epoch;
        match self.tuning.finale {
            Finale::Clear { delay } => self.scheduler.schedule(delay, Task::Clear { epoch }),
            Finale::Dissolve { interval, step } => self.scheduler.schedule(
                interval,
                Task::Dissolve {
                    epoch,
                    level: 1.0 - step,
                },
            ),
        }
    }

    fn spawn(&mut self, slot: usize, of: usize) {
        let width = self.surface.width();
        let height = self.surface.height();
        let x = match self.tuning.spread {
            Spread::Even { jitter } => {
                width / (of + 1) as f32 * (slot + 1) as f32 + (self.rng.f32() - 0.5) * jitter
            }
            Spread::Uniform => self.rng.f32() * width,
        };

        let firework = Firework::launch(x, height, height, &self.tuning, &mut self.rng);
        log::debug!(
            "spawned firework {}/{} at x={:.0} aiming for ({:.0}, {:.0})",
            slot + 1,
            of,
            x,
            firework.target_x,
            firework.target_y
        );
        self.fireworks.push(firework);
        self.start_loop();
    }
}
