//! System configuration parameters
//!
//! All tunable parameters for the press timer.  There is no persistent
//! store: [`SystemConfig::default()`] is the compiled-in configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Depth of the bounded command and action queues.
pub const QUEUE_DEPTH: usize = 8;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pressure ---
    /// Load above which the press counts as closed (grams)
    pub pressure_threshold_g: f32,

    // --- Countdown ---
    /// Countdown duration at boot (seconds)
    pub timer_default_secs: u16,
    /// Smallest selectable duration (seconds)
    pub timer_min_secs: u16,
    /// Largest selectable duration (seconds)
    pub timer_max_secs: u16,
    /// Increment/decrement step (seconds)
    pub timer_step_secs: u16,

    // --- Load cell ---
    /// HX711 raw counts per gram
    pub loadcell_cal_factor: f32,
    /// Settling time after power-up before the initial tare (milliseconds)
    pub loadcell_stabilize_ms: u32,
    /// Maximum time a tare may take (milliseconds)
    pub loadcell_tare_timeout_ms: u32,

    // --- Press plate (for the mbar readout) ---
    pub press_area_width_mm: f32,
    pub press_area_height_mm: f32,

    // --- Timing ---
    /// Sensor poll interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Interval of the invalid-reading heartbeat after a sensor init failure
    pub degraded_publish_interval_ms: u32,
    /// State controller tick (milliseconds)
    pub logic_tick_interval_ms: u32,
    /// Presentation refresh period (milliseconds)
    pub ui_refresh_period_ms: u32,
    /// Alert blink half-period (milliseconds)
    pub alert_blink_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Pressure
            pressure_threshold_g: 50.0,

            // Countdown
            timer_default_secs: 15,
            timer_min_secs: 5,
            timer_max_secs: 300,
            timer_step_secs: 5,

            // Load cell
            loadcell_cal_factor: 200.0,
            loadcell_stabilize_ms: 2000,
            loadcell_tare_timeout_ms: 2000,

            // Press plate
            press_area_width_mm: 300.0,
            press_area_height_mm: 380.0,

            // Timing
            sensor_read_interval_ms: 100,       // 10 Hz
            degraded_publish_interval_ms: 1000, // 1 Hz
            logic_tick_interval_ms: 100,        // 10 Hz
            ui_refresh_period_ms: 33,           // ~30 fps
            alert_blink_interval_ms: 500,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<()> {
        if !(self.pressure_threshold_g.is_finite() && self.pressure_threshold_g > 0.0) {
            return Err(Error::Config("pressure threshold must be positive"));
        }
        if self.timer_step_secs == 0 {
            return Err(Error::Config("timer step must be non-zero"));
        }
        if self.timer_min_secs == 0 || self.timer_min_secs > self.timer_max_secs {
            return Err(Error::Config("timer range is empty"));
        }
        if !(self.timer_min_secs..=self.timer_max_secs).contains(&self.timer_default_secs) {
            return Err(Error::Config("default duration outside timer range"));
        }
        if self.loadcell_cal_factor == 0.0 || !self.loadcell_cal_factor.is_finite() {
            return Err(Error::Config("load cell calibration factor must be non-zero"));
        }
        if self.press_area_width_mm <= 0.0 || self.press_area_height_mm <= 0.0 {
            return Err(Error::Config("press area must be positive"));
        }
        if self.sensor_read_interval_ms == 0
            || self.degraded_publish_interval_ms == 0
            || self.logic_tick_interval_ms == 0
            || self.ui_refresh_period_ms == 0
        {
            return Err(Error::Config("task periods must be non-zero"));
        }
        Ok(())
    }

    /// Press plate area in square metres.
    pub fn press_area_m2(&self) -> f32 {
        self.press_area_width_mm * self.press_area_height_mm * 1e-6
    }
}
