//! State controller task.
//!
//! Each cycle, in order:
//!
//! 1. drain every pending [`UserAction`](crate::app::actions::UserAction)
//!    in arrival order;
//! 2. take at most one sensor reading from the slot;
//! 3. tick the state machine once.
//!
//! Commands go out through the bounded command queue and are dropped when
//! it is full.

use crate::app::ports::ClockPort;
use crate::app::service::PressTimer;
use crate::channels::{Links, QueueSink};
use crate::config::SystemConfig;
use crate::scheduler::{sleep_ms, Ticker};

pub struct ControllerTask {
    service: PressTimer,
    tick_interval_ms: u32,
}

impl ControllerTask {
    pub fn new(config: SystemConfig) -> Self {
        let tick_interval_ms = config.logic_tick_interval_ms;
        Self {
            service: PressTimer::new(config),
            tick_interval_ms,
        }
    }

    /// Enter the initial state and announce it.
    pub fn start(&mut self, now_ms: u64, links: &Links) {
        self.service.start(now_ms, &mut QueueSink(&links.commands));
    }

    /// One controller cycle.
    pub fn cycle(&mut self, now_ms: u64, links: &Links) {
        let mut sink = QueueSink(&links.commands);

        while let Ok(action) = links.actions.try_receive() {
            self.service
                .handle_action(action, now_ms, &mut sink, &links.tare);
        }

        // Check the tare flag before touching the slot so a pre-tare
        // reading stays there for the sensor task to discard.
        if self.service.accepts_readings(&links.tare) {
            if let Some(reading) = links.sensor.take() {
                self.service
                    .handle_reading(reading, now_ms, &mut sink, &links.tare);
            }
        }

        self.service.tick(now_ms, &mut sink);
    }

    pub fn service(&self) -> &PressTimer {
        &self.service
    }

    /// Task body: start, then cycle forever.
    pub fn run(mut self, links: &Links, clock: &impl ClockPort) -> ! {
        self.start(clock.now_ms(), links);
        let mut ticker = Ticker::new(self.tick_interval_ms, clock.now_ms());
        loop {
            self.cycle(clock.now_ms(), links);
            sleep_ms(ticker.next_wait(clock.now_ms()));
        }
    }
}
