//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                        │
//! │  ┌─────────────┬──────────┬──────────┬─────────────────────────┐   │
//! │  │ AppState    │ on_enter │ on_exit  │ on_update               │   │
//! │  ├─────────────┼──────────┼──────────┼─────────────────────────┤   │
//! │  │ Calibrating │ fn(ctx)  │ fn(ctx)  │ fn(ctx, stim)->Option<> │   │
//! │  │ Idle        │ fn(ctx)  │ fn(ctx)  │ fn(ctx, stim)->Option<> │   │
//! │  │ Pressing    │ fn(ctx)  │ fn(ctx)  │ fn(ctx, stim)->Option<> │   │
//! │  │ Timing      │ fn(ctx)  │ fn(ctx)  │ fn(ctx, stim)->Option<> │   │
//! │  │ Alert       │ fn(ctx)  │ fn(ctx)  │ fn(ctx, stim)->Option<> │   │
//! │  └─────────────┴──────────┴──────────┴─────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every input the controller receives (a pressure reading, a clock tick,
//! a user action) is a [`Stimulus`].  The engine hands it to `on_update`
//! of the **current** state.  If that returns `Some(next)`, the engine
//! runs `on_exit` for the current state, then `on_enter` for the next,
//! and updates the current pointer.  Handlers never touch I/O: they write
//! outbound [`Command`](crate::app::commands::Command)s into the
//! context's outbox.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::app::actions::UserAction;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every state the press timer can be in.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AppState {
    /// Zeroing the load cell; waiting for the first post-tare reading.
    Calibrating = 0,
    /// Press open, countdown armed at the configured duration.
    Idle = 1,
    /// Pressure seen once; waiting for confirmation.
    Pressing = 2,
    /// Pressure sustained, countdown running.
    Timing = 3,
    /// Countdown expired; counting overtime until released or acknowledged.
    Alert = 4,
}

impl AppState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `AppState`.  Panics on out-of-range in
    /// debug builds; returns `Calibrating` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Calibrating,
            1 => Self::Idle,
            2 => Self::Pressing,
            3 => Self::Timing,
            4 => Self::Alert,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Calibrating
            }
        }
    }

    /// True while the countdown (or overtime count) is live.
    pub fn is_counting(self) -> bool {
        matches!(self, Self::Timing | Self::Alert)
    }
}

// ---------------------------------------------------------------------------
// Stimulus
// ---------------------------------------------------------------------------

/// One input delivered to the current state's update handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stimulus {
    /// A valid pressure reading in grams.
    Reading(f32),
    /// Periodic clock tick; `ctx.now_ms` holds the current time.
    Tick,
    /// A user action from the presentation side.
    Action(UserAction),
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the stimulus handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext, Stimulus) -> Option<AppState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: AppState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active state.  The mutable
/// [`FsmContext`] is owned by the caller and threaded through every
/// handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `AppState as usize`.
    table: [StateDescriptor; AppState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of transitions taken since start.
    transitions: u32,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; AppState::COUNT], initial: AppState) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Deliver one stimulus to the current state.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)` and `next` differs from the current
    ///    state, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn dispatch(&mut self, ctx: &mut FsmContext, stimulus: Stimulus) {
        let next = (self.table[self.current].on_update)(ctx, stimulus);

        if let Some(next_id) = next {
            self.force_transition(next_id, ctx);
        }
    }

    /// Force an immediate transition regardless of what `on_update` would
    /// return.  A no-op when `next` is already active.
    pub fn force_transition(&mut self, next: AppState, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> AppState {
        AppState::from_index(self.current)
    }

    /// Human-readable name of the current state.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Number of transitions taken since construction.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: AppState, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
