//! Console presenter.
//!
//! Stands in for a display: keeps a [`ViewModel`] and logs a status line
//! whenever the rendered text changes.  User input comes from any
//! [`InputPort`] (the GPIO keypad on hardware, a script in tests); unit
//! toggles are applied to the view here and never reach the controller.

use log::{info, warn};

use crate::app::actions::UserAction;
use crate::app::commands::Command;
use crate::app::ports::{InputEvent, InputPort, Presenter};
use crate::config::SystemConfig;
use crate::presentation::view::{status_text, PressureUnit, ViewModel};

pub struct ConsolePresenter<I> {
    view: ViewModel,
    input: I,
}

impl<I: InputPort> ConsolePresenter<I> {
    pub fn new(config: &SystemConfig, input: I) -> Self {
        Self {
            view: ViewModel::new(config),
            input,
        }
    }

    /// Show pressure in `unit` instead of kilograms.
    pub fn with_unit(mut self, unit: PressureUnit) -> Self {
        self.view.set_unit(unit);
        self
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    fn unit_label(&self) -> &'static str {
        match self.view.unit {
            PressureUnit::Kilograms => "kg",
            PressureUnit::Millibar => "mbar",
        }
    }
}

impl<I: InputPort> Presenter for ConsolePresenter<I> {
    fn apply(&mut self, cmd: &Command, now_ms: u64) {
        if matches!(cmd, Command::SensorFault) {
            warn!("display: load cell fault");
        }
        self.view.apply(cmd, now_ms);
    }

    fn poll_input(&mut self, now_ms: u64) -> Option<UserAction> {
        loop {
            match self.input.poll(now_ms)? {
                InputEvent::Action(action) => return Some(action),
                InputEvent::ToggleUnit => self.view.toggle_unit(),
            }
        }
    }

    fn refresh(&mut self, now_ms: u64) {
        self.view.refresh(now_ms);
        if self.view.take_dirty() {
            info!(
                "[{}] {} | {} {} | {}{}",
                status_text(self.view.state),
                self.view.timer_text,
                self.view.pressure_text,
                self.unit_label(),
                self.view.setting_text,
                if self.view.sensor_fault { " | SENSOR FAULT" } else { "" }
            );
        }
    }
}
