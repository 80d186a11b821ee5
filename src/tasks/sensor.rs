//! Sensor acquisition task.
//!
//! Polls the load cell at a fixed period and publishes into the
//! latest-value slot.  Tare requests are served before the next read.
//! If the load cell fails to initialise the task drops into a permanent
//! degraded mode that publishes an invalid reading once per second so the
//! controller can show the fault.

use log::{debug, info, warn};

use crate::app::ports::{ClockPort, LoadCellPort, TarePort};
use crate::channels::{Links, SensorSlot, TareFlag};
use crate::config::SystemConfig;
use crate::fsm::context::SensorReading;
use crate::scheduler::{sleep_ms, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
    /// Load cell initialised; publishing real readings.
    Running,
    /// Initialisation failed; publishing invalid heartbeats.
    Degraded,
}

pub struct SensorTask<L> {
    cell: L,
    mode: SensorMode,
    read_interval_ms: u32,
    degraded_interval_ms: u32,
    last_heartbeat_ms: Option<u64>,
}

impl<L: LoadCellPort> SensorTask<L> {
    pub fn new(cell: L, config: &SystemConfig) -> Self {
        Self {
            cell,
            mode: SensorMode::Running,
            read_interval_ms: config.sensor_read_interval_ms,
            degraded_interval_ms: config.degraded_publish_interval_ms,
            last_heartbeat_ms: None,
        }
    }

    /// Bring up the load cell.  A failure is permanent.
    pub fn init(&mut self) -> SensorMode {
        self.mode = match self.cell.initialize() {
            Ok(()) => {
                info!("load cell initialised");
                SensorMode::Running
            }
            Err(e) => {
                warn!("load cell init failed ({}), entering degraded mode", e);
                SensorMode::Degraded
            }
        };
        self.mode
    }

    pub fn mode(&self) -> SensorMode {
        self.mode
    }

    /// One acquisition cycle.
    pub fn cycle(&mut self, now_ms: u64, slot: &SensorSlot, tare: &TareFlag) {
        match self.mode {
            SensorMode::Running => {
                if tare.tare_pending() {
                    match self.cell.perform_tare() {
                        Ok(()) => info!("tare complete"),
                        Err(e) => warn!("tare failed: {}", e),
                    }
                    // Anything still in the slot was measured against the old zero.
                    slot.discard();
                    tare.clear();
                }

                match self.cell.try_read() {
                    Ok(Some(grams)) => slot.publish(SensorReading::valid(grams)),
                    Ok(None) => {}
                    Err(e) => debug!("load cell read failed: {}", e),
                }
            }
            SensorMode::Degraded => {
                if tare.tare_pending() {
                    warn!("tare ignored: load cell unavailable");
                    tare.clear();
                }

                let due = self.last_heartbeat_ms.is_none_or(|last| {
                    now_ms.saturating_sub(last) >= u64::from(self.degraded_interval_ms)
                });
                if due {
                    slot.publish(SensorReading::invalid());
                    self.last_heartbeat_ms = Some(now_ms);
                }
            }
        }
    }

    /// Task body: initialise, then cycle forever.
    pub fn run(mut self, links: &Links, clock: &impl ClockPort) -> ! {
        let period = match self.init() {
            SensorMode::Running => self.read_interval_ms,
            SensorMode::Degraded => self.degraded_interval_ms,
        };
        let mut ticker = Ticker::new(period, clock.now_ms());
        loop {
            self.cycle(clock.now_ms(), &links.sensor, &links.tare);
            sleep_ms(ticker.next_wait(clock.now_ms()));
        }
    }
}
