use rand::Rng;
use std::time::{Duration, Instant};

/// Progress bar that only conveys liveness.
///
/// Grows by a random step each tick and holds at the ceiling until the
/// caller completes or hides it. Hiding drops the timer state entirely.
#[derive(Debug, Clone)]
pub struct SimulatedProgress {
    tick: Duration,
    ceiling: f32,
    run: Option<ProgressRun>,
}

#[derive(Debug, Clone)]
struct ProgressRun {
    value: f32,
    last_tick: Instant,
    completed: bool,
}

const MAX_STEP: f32 = 10.0;

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 90.0)
    }
}

impl SimulatedProgress {
    pub fn new(tick: Duration, ceiling: f32) -> Self {
        Self {
            tick,
            ceiling: ceiling.clamp(0.0, 100.0),
            run: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.run = Some(ProgressRun {
            value: 0.0,
            last_tick: now,
            completed: false,
        });
    }

    /// Applies every tick that elapsed since the last call.
    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.completed || self.tick.is_zero() {
            return;
        }

        while now.duration_since(run.last_tick) >= self.tick {
            run.last_tick += self.tick;
            if run.value < self.ceiling {
                run.value = (run.value + rng.gen_range(0.0..MAX_STEP)).min(self.ceiling);
            }
        }
    }

    pub fn complete(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.value = 100.0;
            run.completed = true;
        }
    }

    pub fn hide(&mut self) {
        self.run = None;
    }

    pub fn is_visible(&self) -> bool {
        self.run.is_some()
    }

    /// Percentage, `None` while hidden.
    pub fn value(&self) -> Option<f32> {
        self.run.as_ref().map(|r| r.value)
    }

    /// When the next tick is due, for repaint scheduling.
    pub fn next_tick(&self) -> Option<Instant> {
        self.run
            .as_ref()
            .filter(|r| !r.completed)
            .map(|r| r.last_tick + self.tick)
    }
}
