//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  CALIBRATING ──[first reading]──▶ IDLE ──[p > thr]──▶ PRESSING
//!       ▲                            ▲  ▲                  │
//!       │                   [p ≤ thr]│  └──[p ≤ thr]───────┤
//!       │                            │                 [p > thr]
//!       │                            │                     ▼
//!       │                            ├──[p ≤ thr]──── TIMING
//!       │                            │                     │
//!       │                    [p ≤ thr / ack]        [remaining ≤ 0]
//!       │                            │                     ▼
//!       │                            └─────────────── ALERT
//!       │
//!  Any state ──[tare]──▶ CALIBRATING
//! ```
//!
//! Increment / decrement adjust the duration in every state except
//! Calibrating.  In Alert they change only the setting for the next press;
//! the overtime count is not touched.

use super::context::FsmContext;
use super::{AppState, StateDescriptor, Stimulus};
use crate::app::actions::UserAction;
use crate::app::commands::{ArcCommand, Command};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; AppState::COUNT] {
    [
        // Index 0: Calibrating
        StateDescriptor {
            id: AppState::Calibrating,
            name: "Calibrating",
            on_enter: Some(calibrating_enter),
            on_exit: None,
            on_update: calibrating_update,
        },
        // Index 1: Idle
        StateDescriptor {
            id: AppState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 2: Pressing
        StateDescriptor {
            id: AppState::Pressing,
            name: "Pressing",
            on_enter: Some(pressing_enter),
            on_exit: None,
            on_update: pressing_update,
        },
        // Index 3: Timing
        StateDescriptor {
            id: AppState::Timing,
            name: "Timing",
            on_enter: Some(timing_enter),
            on_exit: None,
            on_update: timing_update,
        },
        // Index 4: Alert
        StateDescriptor {
            id: AppState::Alert,
            name: "Alert",
            on_enter: Some(alert_enter),
            on_exit: Some(alert_exit),
            on_update: alert_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared action handling
// ═══════════════════════════════════════════════════════════════════════════

/// Actions that behave the same outside Calibrating.  Returns the
/// transition, if any; `AcknowledgeAlert` is left to the caller.
fn common_action(ctx: &mut FsmContext, action: UserAction, from: AppState) -> Option<AppState> {
    match action {
        UserAction::Increment => {
            ctx.adjust_duration(1, from);
            None
        }
        UserAction::Decrement => {
            ctx.adjust_duration(-1, from);
            None
        }
        UserAction::Tare => {
            ctx.request_tare();
            Some(AppState::Calibrating)
        }
        UserAction::AcknowledgeAlert => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CALIBRATING: load cell being zeroed
// ═══════════════════════════════════════════════════════════════════════════

fn calibrating_enter(ctx: &mut FsmContext) {
    ctx.emit(Command::UpdateState(AppState::Calibrating));
    info!("CALIBRATING: waiting for a zeroed reading");
}

fn calibrating_update(ctx: &mut FsmContext, stimulus: Stimulus) -> Option<AppState> {
    match stimulus {
        // The service withholds readings while a tare is outstanding, so
        // any reading that arrives here is post-tare.
        Stimulus::Reading(_) => Some(AppState::Idle),
        Stimulus::Action(UserAction::Tare) => {
            debug!("CALIBRATING: tare requested again");
            ctx.request_tare();
            None
        }
        Stimulus::Action(_) | Stimulus::Tick => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: press open
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.timer_remaining_secs = i32::from(ctx.timer_duration_secs);
    ctx.emit(Command::UpdateState(AppState::Idle));
    ctx.emit(Command::UpdateTimer(ctx.timer_remaining_secs));
    ctx.emit(Command::Arc(ArcCommand::Progress(0)));
    info!("IDLE: armed for {}s", ctx.timer_duration_secs);
}

fn idle_update(ctx: &mut FsmContext, stimulus: Stimulus) -> Option<AppState> {
    match stimulus {
        Stimulus::Reading(p) if ctx.above_threshold(p) => Some(AppState::Pressing),
        Stimulus::Action(action) => common_action(ctx, action, AppState::Idle),
        Stimulus::Reading(_) | Stimulus::Tick => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  PRESSING: pressure seen once, awaiting confirmation
// ═══════════════════════════════════════════════════════════════════════════

fn pressing_enter(ctx: &mut FsmContext) {
    ctx.emit(Command::UpdateState(AppState::Pressing));
    debug!("PRESSING: {:.0} g", ctx.current_pressure);
}

fn pressing_update(ctx: &mut FsmContext, stimulus: Stimulus) -> Option<AppState> {
    match stimulus {
        Stimulus::Reading(p) if ctx.above_threshold(p) => Some(AppState::Timing),
        Stimulus::Reading(_) => Some(AppState::Idle),
        Stimulus::Action(action) => common_action(ctx, action, AppState::Pressing),
        Stimulus::Tick => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  TIMING: countdown running
// ═══════════════════════════════════════════════════════════════════════════

fn timing_enter(ctx: &mut FsmContext) {
    ctx.timer_start_ms = ctx.now_ms;
    ctx.countdown_secs = ctx.timer_duration_secs;
    ctx.timer_remaining_secs = i32::from(ctx.timer_duration_secs);
    ctx.emit(Command::UpdateState(AppState::Timing));
    ctx.emit(Command::UpdateTimer(ctx.timer_remaining_secs));
    ctx.emit(Command::Arc(ArcCommand::Start {
        duration_ms: u32::from(ctx.timer_duration_secs) * 1000,
    }));
    info!("TIMING: {}s countdown started", ctx.timer_duration_secs);
}

fn timing_update(ctx: &mut FsmContext, stimulus: Stimulus) -> Option<AppState> {
    match stimulus {
        Stimulus::Reading(p) if !ctx.above_threshold(p) => {
            info!("TIMING: released with {}s left", ctx.timer_remaining_secs);
            Some(AppState::Idle)
        }
        Stimulus::Reading(_) => None,
        Stimulus::Tick => {
            let changed = ctx.recompute_remaining();
            if ctx.timer_remaining_secs <= 0 {
                return Some(AppState::Alert);
            }
            if changed {
                ctx.emit(Command::UpdateTimer(ctx.timer_remaining_secs));
            }
            None
        }
        Stimulus::Action(action) => common_action(ctx, action, AppState::Timing),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERT: countdown expired, counting overtime
// ═══════════════════════════════════════════════════════════════════════════

fn alert_enter(ctx: &mut FsmContext) {
    ctx.emit(Command::UpdateState(AppState::Alert));
    ctx.emit(Command::Arc(ArcCommand::Progress(100)));
    ctx.emit(Command::UpdateTimer(ctx.timer_remaining_secs));
    info!("ALERT: time is up");
}

fn alert_exit(ctx: &mut FsmContext) {
    info!("ALERT: cleared after {}s overtime", -ctx.timer_remaining_secs);
}

fn alert_update(ctx: &mut FsmContext, stimulus: Stimulus) -> Option<AppState> {
    match stimulus {
        Stimulus::Reading(p) if !ctx.above_threshold(p) => Some(AppState::Idle),
        Stimulus::Reading(_) => None,
        Stimulus::Tick => {
            if ctx.recompute_remaining() {
                ctx.emit(Command::UpdateTimer(ctx.timer_remaining_secs));
            }
            None
        }
        Stimulus::Action(UserAction::AcknowledgeAlert) => Some(AppState::Idle),
        Stimulus::Action(action) => common_action(ctx, action, AppState::Alert),
    }
}
