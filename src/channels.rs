//! Inter-task communication links.
//!
//! Uses `embassy-sync` primitives so the three tasks share state without
//! heap allocation or blocking locks.
//!
//! ```text
//! ┌────────────┐ SensorReading ┌─────────────┐   Command    ┌──────────────┐
//! │   Sensor   │──────────────▶│ Controller  │─────────────▶│ Presentation │
//! │    task    │  (slot)       │    task     │ (queue, 8)   │     task     │
//! │            │◀──────────────│             │◀─────────────│              │
//! └────────────┘  tare flag    └─────────────┘  UserAction  └──────────────┘
//!                                               (queue, 8)
//! ```
//!
//! The sensor slot keeps only the newest reading; publishing never blocks
//! and overwrites anything unconsumed.  The queues drop the newest message
//! when full.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::trace;

use crate::app::actions::UserAction;
use crate::app::commands::Command;
use crate::app::ports::{CommandSink, TarePort};
use crate::config::QUEUE_DEPTH;
use crate::fsm::context::SensorReading;

/// Controller → presentation.
pub type CommandChannel = Channel<CriticalSectionRawMutex, Command, QUEUE_DEPTH>;

/// Presentation → controller.
pub type ActionChannel = Channel<CriticalSectionRawMutex, UserAction, QUEUE_DEPTH>;

// ---------------------------------------------------------------------------
// Latest-value sensor slot
// ---------------------------------------------------------------------------

/// Single-value mailbox holding the most recent sensor reading.
pub struct SensorSlot(Signal<CriticalSectionRawMutex, SensorReading>);

impl SensorSlot {
    pub const fn new() -> Self {
        Self(Signal::new())
    }

    /// Store `reading`, replacing any unconsumed one.
    pub fn publish(&self, reading: SensorReading) {
        self.0.signal(reading);
    }

    /// Remove and return the stored reading, if any.
    pub fn take(&self) -> Option<SensorReading> {
        self.0.try_take()
    }

    /// Drop any unconsumed reading.
    pub fn discard(&self) {
        self.0.reset();
    }
}

impl Default for SensorSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tare request flag
// ---------------------------------------------------------------------------

/// Set by the controller, cleared by the sensor task once the tare is done.
pub struct TareFlag(AtomicBool);

impl TareFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Acknowledge a completed (or discarded) tare.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for TareFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl TarePort for TareFlag {
    fn request_tare(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn tare_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Queue adapters
// ---------------------------------------------------------------------------

/// [`CommandSink`] over the command queue.  Drops when full.
pub struct QueueSink<'a>(pub &'a CommandChannel);

impl CommandSink for QueueSink<'_> {
    fn send(&mut self, cmd: Command) {
        if self.0.try_send(cmd).is_err() {
            trace!("command queue full, dropping {:?}", cmd);
        }
    }
}

// ---------------------------------------------------------------------------
// Links bundle
// ---------------------------------------------------------------------------

/// Everything the three tasks share.
pub struct Links {
    pub sensor: SensorSlot,
    pub tare: TareFlag,
    pub commands: CommandChannel,
    pub actions: ActionChannel,
}

impl Links {
    pub const fn new() -> Self {
        Self {
            sensor: SensorSlot::new(),
            tare: TareFlag::new(),
            commands: Channel::new(),
            actions: Channel::new(),
        }
    }

    /// Queue a user action for the controller.  Returns `false` if the
    /// queue was full and the action was dropped.
    pub fn post_action(&self, action: UserAction) -> bool {
        match self.actions.try_send(action) {
            Ok(()) => true,
            Err(_) => {
                trace!("action queue full, dropping {:?}", action);
                false
            }
        }
    }
}

impl Default for Links {
    fn default() -> Self {
        Self::new()
    }
}

/// Links used by the firmware binary.
pub static LINKS: Links = Links::new();
