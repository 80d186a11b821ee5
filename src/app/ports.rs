//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PressTimer (domain)
//! ```
//!
//! Driven adapters (load cell, clock, presenter, channels) implement these
//! traits.  The [`PressTimer`](super::service::PressTimer) service and the
//! task loops consume them via generics, so the domain core never touches
//! hardware directly.

use crate::error::Result;

use super::actions::UserAction;
use super::commands::Command;

// ───────────────────────────────────────────────────────────────
// Load cell port (driven adapter: hardware → sensor task)
// ───────────────────────────────────────────────────────────────

/// Force sensor as seen by the sensor acquisition task.
pub trait LoadCellPort {
    /// Power up, wait for the converter to settle, and zero the scale.
    /// An error here puts the sensor task into degraded mode for good.
    fn initialize(&mut self) -> Result<()>;

    /// Non-blocking read.  `Ok(None)` when no sample is ready yet.
    fn try_read(&mut self) -> Result<Option<f32>>;

    /// Re-zero the scale.  Blocks for at most the configured tare timeout.
    fn perform_tare(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Command sink port (domain → presentation)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`Command`]s through this port.  Implementations must
/// never block; a full queue drops the command.
pub trait CommandSink {
    fn send(&mut self, cmd: Command);
}

// ───────────────────────────────────────────────────────────────
// Tare flag port (controller ↔ sensor task)
// ───────────────────────────────────────────────────────────────

/// One-bit side channel asking the sensor task to re-zero.
pub trait TarePort {
    /// Raise the flag.  Idempotent.
    fn request_tare(&self);

    /// `true` until the sensor task has finished the tare.
    fn tare_pending(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Presentation ports (presentation task ↔ display / input)
// ───────────────────────────────────────────────────────────────

/// Renders controller commands and collects user input.
pub trait Presenter {
    /// Apply one command to the view.
    fn apply(&mut self, cmd: &Command, now_ms: u64);

    /// Return the next pending user action, if any.
    fn poll_input(&mut self, now_ms: u64) -> Option<UserAction>;

    /// Advance local animations and redraw.
    fn refresh(&mut self, now_ms: u64);
}

/// What an input device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Forwarded to the state controller.
    Action(UserAction),
    /// Switch the pressure readout unit.  Handled by the presenter alone.
    ToggleUnit,
}

/// Physical input device (keypad, touch panel).
pub trait InputPort {
    fn poll(&mut self, now_ms: u64) -> Option<InputEvent>;
}
