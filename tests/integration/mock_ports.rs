//! Mock port adapters for integration tests.
//!
//! Records every command the service emits so tests can assert on the
//! full history without a display, and scripts the load cell so sensor
//! task behaviour is deterministic.

use std::cell::Cell;
use std::collections::VecDeque;

use presstimer::app::actions::UserAction;
use presstimer::app::commands::Command;
use presstimer::app::ports::{
    ClockPort, CommandSink, InputEvent, InputPort, LoadCellPort, TarePort,
};
use presstimer::error::{Result, SensorError};
use presstimer::fsm::AppState;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub commands: Vec<Command>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Every `UpdateState` in emission order.
    pub fn states(&self) -> Vec<AppState> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::UpdateState(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Every `UpdateTimer` value in emission order.
    pub fn timers(&self) -> Vec<i32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::UpdateTimer(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Every `TimerSetting` value in emission order.
    pub fn settings(&self) -> Vec<u16> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::TimerSetting(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn last_timer(&self) -> Option<i32> {
        self.timers().last().copied()
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }
}

// ── FakeTare ──────────────────────────────────────────────────

/// Tare flag that stays raised until the test completes it.
#[derive(Default)]
pub struct FakeTare {
    pending: Cell<bool>,
    pub requests: Cell<u32>,
}

#[allow(dead_code)]
impl FakeTare {
    pub fn complete(&self) {
        self.pending.set(false);
    }
}

impl TarePort for FakeTare {
    fn request_tare(&self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
    }

    fn tare_pending(&self) -> bool {
        self.pending.get()
    }
}

// ── ScriptedLoadCell ──────────────────────────────────────────

/// Load cell that replays a fixed list of samples, then reports the last
/// one forever.
pub struct ScriptedLoadCell {
    samples: VecDeque<f32>,
    last: Option<f32>,
    pub fail_init: bool,
    pub tares: u32,
}

#[allow(dead_code)]
impl ScriptedLoadCell {
    pub fn new(samples: &[f32]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            last: None,
            fail_init: false,
            tares: 0,
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_init: true,
            ..Self::new(&[])
        }
    }
}

impl LoadCellPort for ScriptedLoadCell {
    fn initialize(&mut self) -> Result<()> {
        if self.fail_init {
            Err(SensorError::InitTimeout.into())
        } else {
            Ok(())
        }
    }

    fn try_read(&mut self) -> Result<Option<f32>> {
        if let Some(next) = self.samples.pop_front() {
            self.last = Some(next);
        }
        Ok(self.last)
    }

    fn perform_tare(&mut self) -> Result<()> {
        self.tares += 1;
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── ScriptedInput ─────────────────────────────────────────────

/// Input device that yields each scripted event once its time arrives.
#[derive(Default)]
pub struct ScriptedInput {
    script: VecDeque<(u64, InputEvent)>,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new(script: &[(u64, UserAction)]) -> Self {
        Self::events(
            &script
                .iter()
                .map(|&(at, action)| (at, InputEvent::Action(action)))
                .collect::<Vec<_>>(),
        )
    }

    pub fn events(script: &[(u64, InputEvent)]) -> Self {
        Self {
            script: script.iter().copied().collect(),
        }
    }
}

impl InputPort for ScriptedInput {
    fn poll(&mut self, now_ms: u64) -> Option<InputEvent> {
        match self.script.front() {
            Some(&(at, event)) if at <= now_ms => {
                self.script.pop_front();
                Some(event)
            }
            _ => None,
        }
    }
}
