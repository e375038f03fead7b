//! Gravity clock - periodic descent timer driven by a fixed timestep
//!
//! The clock does not own a thread. The owner feeds it elapsed time with
//! [`GravityClock::advance`] and drains due ticks with [`GravityClock::take_tick`].
//! Stopping discards any accumulated time, and starting always arms a fresh
//! timer, so nothing is replayed across a pause or a level change.

use crate::scoring::gravity_interval_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped,
    Armed { period_ms: u32, elapsed_ms: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravityClock {
    state: ClockState,
    /// Level the running timer was armed for.
    level: u32,
}

impl GravityClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            level: 0,
        }
    }

    /// Tear down any running timer and arm a new one for `level`.
    pub fn start(&mut self, level: u32) {
        self.level = level;
        self.state = ClockState::Armed {
            period_ms: gravity_interval_ms(level),
            elapsed_ms: 0,
        };
    }

    /// Fully stop the timer; accumulated time is dropped.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Armed { .. })
    }

    /// Level of the armed timer, if running.
    pub fn level(&self) -> Option<u32> {
        self.is_running().then_some(self.level)
    }

    /// Period of the armed timer, if running.
    pub fn period_ms(&self) -> Option<u32> {
        match self.state {
            ClockState::Armed { period_ms, .. } => Some(period_ms),
            ClockState::Stopped => None,
        }
    }

    /// Accumulate wall time. Ignored while stopped.
    pub fn advance(&mut self, delta_ms: u32) {
        if let ClockState::Armed { elapsed_ms, .. } = &mut self.state {
            *elapsed_ms = elapsed_ms.saturating_add(delta_ms);
        }
    }

    /// Consume one period if due. Returns true when a gravity step should fire.
    pub fn take_tick(&mut self) -> bool {
        match &mut self.state {
            ClockState::Armed {
                period_ms,
                elapsed_ms,
            } if *elapsed_ms >= *period_ms => {
                *elapsed_ms -= *period_ms;
                true
            }
            _ => false,
        }
    }
}

impl Default for GravityClock {
    fn default() -> Self {
        Self::new()
    }
}
