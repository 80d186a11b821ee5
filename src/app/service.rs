//! Application service: the hexagonal core.
//!
//! [`PressTimer`] owns the FSM and its context.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorReading ──▶ ┌────────────────────────┐ ──▶ CommandSink
//!     UserAction ──▶ │       PressTimer        │
//!           tick ──▶ │   FSM · countdown       │ ──▶ TarePort
//!                    └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::fsm::context::{FsmContext, SensorReading};
use crate::fsm::states::build_state_table;
use crate::fsm::{AppState, Fsm, Stimulus};

use super::actions::UserAction;
use super::commands::Command;
use super::ports::{CommandSink, TarePort};

/// Display resolution of the pressure readout in grams.
const PRESSURE_DISPLAY_STEP_G: f32 = 10.0;

// ───────────────────────────────────────────────────────────────
// PressTimer
// ───────────────────────────────────────────────────────────────

/// The press-timer service: state machine plus countdown bookkeeping.
pub struct PressTimer {
    fsm: Fsm,
    ctx: FsmContext,
    /// Last pressure forwarded, quantised to the display step.
    last_pressure_step: Option<i32>,
    /// Set while the load cell is reporting invalid readings.
    sensor_faulted: bool,
}

impl PressTimer {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), AppState::Calibrating),
            ctx: FsmContext::new(config),
            last_pressure_step: None,
            sensor_faulted: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Calibrating and announce the initial timer setting.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl CommandSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        let duration = self.ctx.timer_duration_secs;
        self.ctx.emit(Command::TimerSetting(duration));
        self.ctx.emit(Command::UpdateTimer(i32::from(duration)));
        self.flush(sink);
        info!("PressTimer started in {:?}", self.fsm.current_state());
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Process one user action.
    pub fn handle_action(
        &mut self,
        action: UserAction,
        now_ms: u64,
        sink: &mut impl CommandSink,
        tare: &impl TarePort,
    ) {
        debug!("action {:?} in {}", action, self.fsm.current_name());
        self.ctx.now_ms = now_ms;
        self.fsm.dispatch(&mut self.ctx, Stimulus::Action(action));
        if self.ctx.take_tare_request() {
            tare.request_tare();
        }
        self.flush(sink);
    }

    /// Process one sensor reading.
    ///
    /// Invalid readings never reach the state machine; the first one after
    /// a healthy period raises [`Command::SensorFault`], and the first valid
    /// one after that is always forwarded as [`Command::UpdatePressure`].  While Calibrating
    /// with a tare still outstanding the reading is stale and discarded.
    pub fn handle_reading(
        &mut self,
        reading: SensorReading,
        now_ms: u64,
        sink: &mut impl CommandSink,
        tare: &impl TarePort,
    ) {
        if !reading.valid {
            if !self.sensor_faulted {
                warn!("load cell reporting invalid readings");
                self.sensor_faulted = true;
                // The next valid reading must reach the display to clear the fault.
                self.last_pressure_step = None;
                sink.send(Command::SensorFault);
            }
            return;
        }
        if self.sensor_faulted {
            info!("load cell readings valid again");
            self.sensor_faulted = false;
        }
        if !self.accepts_readings(tare) {
            debug!("discarding pre-tare reading {:.1} g", reading.pressure);
            return;
        }

        self.ctx.now_ms = now_ms;
        self.ctx.current_pressure = reading.pressure;

        let step = (reading.pressure / PRESSURE_DISPLAY_STEP_G).round() as i32;
        if self.last_pressure_step != Some(step) {
            self.last_pressure_step = Some(step);
            self.ctx.emit(Command::UpdatePressure(reading.pressure));
        }

        self.fsm
            .dispatch(&mut self.ctx, Stimulus::Reading(reading.pressure));
        self.flush(sink);
    }

    /// Advance time-based transitions.
    pub fn tick(&mut self, now_ms: u64, sink: &mut impl CommandSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.dispatch(&mut self.ctx, Stimulus::Tick);
        self.flush(sink);
    }

    /// `false` while Calibrating and the sensor has not finished the tare.
    pub fn accepts_readings(&self, tare: &impl TarePort) -> bool {
        !(self.fsm.current_state() == AppState::Calibrating && tare.tare_pending())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> AppState {
        self.fsm.current_state()
    }

    pub fn timer_duration_secs(&self) -> u16 {
        self.ctx.timer_duration_secs
    }

    pub fn timer_remaining_secs(&self) -> i32 {
        self.ctx.timer_remaining_secs
    }

    pub fn current_pressure(&self) -> f32 {
        self.ctx.current_pressure
    }

    pub fn sensor_faulted(&self) -> bool {
        self.sensor_faulted
    }

    // ── Internal ──────────────────────────────────────────────

    fn flush(&mut self, sink: &mut impl CommandSink) {
        for cmd in self.ctx.drain_outbox() {
            sink.send(cmd);
        }
    }
}
