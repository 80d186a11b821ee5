//! Presentation view model.
//!
//! Owns everything the screen shows and renders it to text.  Commands
//! from the controller update it; [`ViewModel::refresh`] advances the
//! purely local effects (progress-arc sweep, alert blink) between
//! commands.  Nothing here feeds back into the controller.

use core::fmt::Write;

use heapless::String;

use crate::app::commands::{ArcCommand, Command};
use crate::config::SystemConfig;
use crate::fsm::AppState;

/// Standard gravity (m/s²).
const GRAVITY: f32 = 9.806_65;

pub type TimerText = String<12>;
pub type PressureText = String<16>;
pub type SettingText = String<24>;

/// Unit of the pressure readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnit {
    /// Load in kilograms, two decimals.
    #[default]
    Kilograms,
    /// Load spread over the press plate, in millibar.
    Millibar,
}

// ═══════════════════════════════════════════════════════════════
//  Formatting
// ═══════════════════════════════════════════════════════════════

/// `"15"`, `"1:05"`; overtime (negative) as `"+7"`, `"+1:05"`.
pub fn format_timer(secs: i32) -> TimerText {
    let mut out = TimerText::new();
    let sign = if secs < 0 { "+" } else { "" };
    let abs = secs.unsigned_abs();
    let (mins, rem) = (abs / 60, abs % 60);
    // Longest output ("+35791394:08") fits in 12 bytes.
    let _ = if mins > 0 {
        write!(out, "{sign}{mins}:{rem:02}")
    } else {
        write!(out, "{sign}{rem}")
    };
    out
}

/// Render `grams` in the chosen unit.  Values that would print as a
/// negative zero print as zero.
pub fn format_pressure(grams: f32, unit: PressureUnit, area_m2: f32) -> PressureText {
    let mut out = PressureText::new();
    let _ = match unit {
        PressureUnit::Kilograms => write!(out, "{:.2}", grams / 1000.0),
        PressureUnit::Millibar => {
            let force_n = grams / 1000.0 * GRAVITY;
            let mbar = force_n / (area_m2 * 1e5) * 1000.0;
            write!(out, "{mbar:.1}")
        }
    };
    if out.starts_with('-') && out.bytes().all(|b| matches!(b, b'-' | b'0' | b'.')) {
        let mut unsigned = PressureText::new();
        let _ = unsigned.push_str(&out[1..]);
        out = unsigned;
    }
    out
}

/// `"Timer: 15s"`.
pub fn format_setting(secs: u16) -> SettingText {
    let mut out = SettingText::new();
    let _ = write!(out, "Timer: {secs}s");
    out
}

/// Status line for each state.
pub fn status_text(state: AppState) -> &'static str {
    match state {
        AppState::Calibrating => "CALIBRATING",
        AppState::Idle => "IDLE",
        AppState::Pressing => "PRESSING",
        AppState::Timing => "TIMING",
        AppState::Alert => "DONE!",
    }
}

// ═══════════════════════════════════════════════════════════════
//  View model
// ═══════════════════════════════════════════════════════════════

pub struct ViewModel {
    press_area_m2: f32,
    blink_interval_ms: u64,

    pub state: AppState,
    pub unit: PressureUnit,
    pub pressure_g: f32,
    pub pressure_text: PressureText,
    pub timer_text: TimerText,
    pub setting_text: SettingText,
    pub sensor_fault: bool,

    /// Arc position, 0–100.
    pub arc_percent: u8,
    arc_start_ms: u64,
    /// Zero when the arc is not sweeping.
    arc_duration_ms: u32,

    /// Alert highlight phase.
    pub blink_on: bool,
    last_blink_ms: u64,

    /// Text or state changed since the last [`take_dirty`](Self::take_dirty).
    dirty: bool,
}

impl ViewModel {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            press_area_m2: config.press_area_m2(),
            blink_interval_ms: u64::from(config.alert_blink_interval_ms),
            state: AppState::Calibrating,
            unit: PressureUnit::default(),
            pressure_g: 0.0,
            pressure_text: format_pressure(0.0, PressureUnit::default(), config.press_area_m2()),
            timer_text: format_timer(i32::from(config.timer_default_secs)),
            setting_text: format_setting(config.timer_default_secs),
            sensor_fault: false,
            arc_percent: 0,
            arc_start_ms: 0,
            arc_duration_ms: 0,
            blink_on: false,
            last_blink_ms: 0,
            dirty: true,
        }
    }

    /// Apply one controller command.
    pub fn apply(&mut self, cmd: &Command, now_ms: u64) {
        match *cmd {
            Command::UpdatePressure(grams) => {
                self.pressure_g = grams;
                self.sensor_fault = false;
                self.pressure_text = format_pressure(grams, self.unit, self.press_area_m2);
            }
            Command::UpdateTimer(secs) => {
                self.timer_text = format_timer(secs);
            }
            Command::UpdateState(state) => {
                self.state = state;
                self.blink_on = state == AppState::Alert;
                self.last_blink_ms = now_ms;
            }
            Command::Arc(ArcCommand::Start { duration_ms }) => {
                self.arc_start_ms = now_ms;
                self.arc_duration_ms = duration_ms;
                self.arc_percent = 0;
            }
            Command::Arc(ArcCommand::Progress(percent)) => {
                self.arc_duration_ms = 0;
                self.arc_percent = percent.min(100);
            }
            Command::TimerSetting(secs) => {
                self.setting_text = format_setting(secs);
                if self.state == AppState::Timing && self.arc_duration_ms > 0 {
                    self.arc_duration_ms = u32::from(secs) * 1000;
                }
            }
            Command::SensorFault => {
                self.sensor_fault = true;
            }
        }
        self.dirty = true;
    }

    /// Advance local effects to `now_ms`.
    pub fn refresh(&mut self, now_ms: u64) {
        if self.state == AppState::Timing && self.arc_duration_ms > 0 {
            let elapsed = now_ms.saturating_sub(self.arc_start_ms);
            let percent = elapsed * 100 / u64::from(self.arc_duration_ms);
            self.arc_percent = percent.min(100) as u8;
        }

        if self.state == AppState::Alert
            && now_ms.saturating_sub(self.last_blink_ms) >= self.blink_interval_ms
        {
            self.blink_on = !self.blink_on;
            self.last_blink_ms = now_ms;
        }
    }

    /// Switch the pressure unit and re-render the cached value.
    pub fn set_unit(&mut self, unit: PressureUnit) {
        self.unit = unit;
        self.pressure_text = format_pressure(self.pressure_g, unit, self.press_area_m2);
        self.dirty = true;
    }

    /// Flip between kilograms and millibar.
    pub fn toggle_unit(&mut self) {
        let next = match self.unit {
            PressureUnit::Kilograms => PressureUnit::Millibar,
            PressureUnit::Millibar => PressureUnit::Kilograms,
        };
        self.set_unit(next);
    }

    /// Consume the changed-since-last-call flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}
