//! Presentation task.
//!
//! Each cycle drains the command queue into the presenter, forwards any
//! user input to the controller (dropped when the action queue is full),
//! then lets the presenter redraw.

use crate::app::ports::{ClockPort, Presenter};
use crate::channels::Links;
use crate::scheduler::{sleep_ms, Ticker};

pub struct PresentationTask<P> {
    presenter: P,
    refresh_period_ms: u32,
}

impl<P: Presenter> PresentationTask<P> {
    pub fn new(presenter: P, refresh_period_ms: u32) -> Self {
        Self {
            presenter,
            refresh_period_ms,
        }
    }

    /// One presentation cycle.
    pub fn cycle(&mut self, now_ms: u64, links: &Links) {
        while let Ok(cmd) = links.commands.try_receive() {
            self.presenter.apply(&cmd, now_ms);
        }

        while let Some(action) = self.presenter.poll_input(now_ms) {
            links.post_action(action);
        }

        self.presenter.refresh(now_ms);
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Task body: cycle forever.
    pub fn run(mut self, links: &Links, clock: &impl ClockPort) -> ! {
        let mut ticker = Ticker::new(self.refresh_period_ms, clock.now_ms());
        loop {
            self.cycle(clock.now_ms(), links);
            sleep_ms(ticker.next_wait(clock.now_ms()));
        }
    }
}
