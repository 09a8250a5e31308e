use core::time::Duration;
use web_time::Instant;

use crate::EngineEvent;

/// Whole-second game clock driven by the engine's start/stop signals.
///
/// It can be advanced by an external scheduler calling [`tick`](Self::tick) once per second,
/// or by [`poll`](Self::poll) with the current instant, which only counts full seconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameTimer {
    elapsed_secs: u32,
    running_since: Option<Instant>,
    running: bool,
}

impl GameTimer {
    const TICK: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
        self.running_since = None;
    }

    /// Same as [`start`](Self::start) but anchors [`poll`](Self::poll) at `now`.
    pub fn start_at(&mut self, now: Instant) {
        self.running = true;
        self.running_since = Some(now);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.running_since = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances one second, returns whether the displayed time changed.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Counts the whole seconds passed since the last poll, returns how many were added.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if !self.running {
            return 0;
        }
        let Some(anchor) = self.running_since else {
            self.running_since = Some(now);
            return 0;
        };

        let ticks = now.saturating_duration_since(anchor).as_secs();
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        if ticks > 0 {
            self.elapsed_secs = self.elapsed_secs.saturating_add(ticks);
            self.running_since = Some(anchor + Self::TICK * ticks);
        }
        ticks
    }

    pub fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::StartTiming => self.start(),
            EngineEvent::StopTiming => self.stop(),
            EngineEvent::RecordScore(_) => {}
        }
    }

    /// Like [`apply`](Self::apply) for a clock driven by [`poll`](Self::poll): starting
    /// anchors at `now` and stopping first counts the seconds up to `now`.
    pub fn apply_at(&mut self, event: &EngineEvent, now: Instant) {
        match event {
            EngineEvent::StartTiming => self.start_at(now),
            EngineEvent::StopTiming => {
                self.poll(now);
                self.stop();
            }
            EngineEvent::RecordScore(_) => {}
        }
    }
}
