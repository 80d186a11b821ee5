//! Outbound commands to the presentation side.
//!
//! The [`PressTimer`](super::service::PressTimer) service emits these through
//! the [`CommandSink`](super::ports::CommandSink) port.  Whatever sits on the
//! other side (display, console log, test recorder) decides how to render
//! them.

use crate::fsm::AppState;

/// Progress-arc instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcCommand {
    /// Begin a sweep from 0 to 100 % over `duration_ms`.
    Start { duration_ms: u32 },
    /// Jump to a fixed percentage (0–100).
    Progress(u8),
}

/// Display and audio instructions from the state controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Latest net load in grams.
    UpdatePressure(f32),
    /// Countdown value in seconds; negative means overtime.
    UpdateTimer(i32),
    /// The state machine entered a new state.
    UpdateState(AppState),
    Arc(ArcCommand),
    /// The configured countdown duration in seconds.
    TimerSetting(u16),
    /// The load cell stopped producing valid readings.
    SensorFault,
}
