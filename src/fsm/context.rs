//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It holds the countdown bookkeeping, the latest pressure,
//! the current time, configuration, and an outbox of commands for the
//! presentation side.  Think of it as the "blackboard" in a blackboard
//! architecture.

use heapless::Vec;
use log::trace;

use crate::app::commands::Command;
use crate::config::SystemConfig;

use super::AppState;

/// Maximum commands produced by a single dispatch.
pub const OUTBOX_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Sensor reading (produced by the sensor task)
// ---------------------------------------------------------------------------

/// One load-cell sample.  `valid == false` marks the degraded-mode
/// heartbeat of a failed sensor; its `pressure` is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    /// Net load in grams.
    pub pressure: f32,
    pub valid: bool,
}

impl SensorReading {
    pub const fn valid(pressure: f32) -> Self {
        Self {
            pressure,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            pressure: 0.0,
            valid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic time of the stimulus being dispatched (milliseconds).
    pub now_ms: u64,
    /// Timestamp captured on entry to Timing.
    pub timer_start_ms: u64,

    // -- Countdown --
    /// User-selected duration.  Survives press cycles and tares.
    pub timer_duration_secs: u16,
    /// Seconds left; negative while in overtime.
    pub timer_remaining_secs: i32,
    /// Duration the running countdown measures against.  Follows
    /// `timer_duration_secs` while Timing, frozen once the countdown expires.
    pub countdown_secs: u16,

    // -- Sensor data --
    /// Latest valid pressure (grams).
    pub current_pressure: f32,

    // -- Configuration --
    pub config: SystemConfig,

    // -- Outputs --
    /// Commands queued by handlers, drained by the service after dispatch.
    pub outbox: Vec<Command, OUTBOX_CAPACITY>,
    /// Set when a handler wants the load cell re-zeroed.
    tare_requested: bool,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        let duration = config.timer_default_secs;
        Self {
            now_ms: 0,
            timer_start_ms: 0,
            timer_duration_secs: duration,
            timer_remaining_secs: i32::from(duration),
            countdown_secs: duration,
            current_pressure: 0.0,
            config,
            outbox: Vec::new(),
            tare_requested: false,
        }
    }

    /// Queue a command for presentation.  Dropped when the outbox is full.
    pub fn emit(&mut self, cmd: Command) {
        if let Err(cmd) = self.outbox.push(cmd) {
            trace!("outbox full, dropping {:?}", cmd);
        }
    }

    /// `true` when `pressure` counts as the press being closed.
    pub fn above_threshold(&self, pressure: f32) -> bool {
        pressure > self.config.pressure_threshold_g
    }

    /// Whole seconds elapsed since the countdown started.
    pub fn elapsed_secs(&self) -> i32 {
        (self.now_ms.saturating_sub(self.timer_start_ms) / 1000) as i32
    }

    /// Recompute the remaining time from the captured start timestamp.
    /// Returns `true` if the value changed.
    pub fn recompute_remaining(&mut self) -> bool {
        let remaining = i32::from(self.countdown_secs) - self.elapsed_secs();
        let changed = remaining != self.timer_remaining_secs;
        self.timer_remaining_secs = remaining;
        changed
    }

    /// Step the duration by `steps` increments, clamped to the configured
    /// range, and re-announce the timer and setting.
    ///
    /// While Timing the running countdown follows the new duration.  In
    /// Alert only the setting changes; the overtime count keeps running
    /// against the duration that expired.
    pub fn adjust_duration(&mut self, steps: i32, state: AppState) {
        let c = &self.config;
        let target = i32::from(self.timer_duration_secs) + steps * i32::from(c.timer_step_secs);
        let clamped = target.clamp(i32::from(c.timer_min_secs), i32::from(c.timer_max_secs));
        self.timer_duration_secs = clamped as u16;

        if state == AppState::Timing {
            self.countdown_secs = self.timer_duration_secs;
            self.recompute_remaining();
        } else if !state.is_counting() {
            self.timer_remaining_secs = i32::from(self.timer_duration_secs);
        }
        self.emit(Command::UpdateTimer(self.timer_remaining_secs));
        self.emit(Command::TimerSetting(self.timer_duration_secs));
    }

    /// Ask for the load cell to be re-zeroed.
    pub fn request_tare(&mut self) {
        self.tare_requested = true;
    }

    /// Consume a pending tare request.
    pub fn take_tare_request(&mut self) -> bool {
        core::mem::take(&mut self.tare_requested)
    }

    /// Move all queued commands out of the outbox.
    pub fn drain_outbox(&mut self) -> Vec<Command, OUTBOX_CAPACITY> {
        core::mem::take(&mut self.outbox)
    }
}
