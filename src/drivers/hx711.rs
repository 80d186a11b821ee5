//! HX711 24-bit load-cell ADC driver.
//!
//! ## Hardware
//!
//! Two-wire serial interface: DOUT (data, input) and PD_SCK (clock,
//! output).  DOUT goes low when a conversion is ready; 24 clock pulses
//! shift the two's-complement sample out MSB first, and one extra pulse
//! selects channel A at gain 128 for the next conversion.  Holding SCK
//! high for more than 60 µs powers the chip down.
//!
//! ```text
//!  DOUT ‾‾‾‾\____[b23][b22] … [b0]‾‾‾‾‾‾‾‾‾‾‾‾
//!  SCK  ______/‾\_/‾\_ … _/‾\_/‾\______________
//!              1   2       24  25 (gain 128)
//! ```
//!
//! Generic over `embedded-hal` 1.0 pins and delay, so the same code runs
//! on ESP-IDF `PinDriver`s and on host mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info};

use crate::app::ports::LoadCellPort;
use crate::config::SystemConfig;
use crate::error::{Result, SensorError};

/// Samples averaged for a tare.
const TARE_SAMPLES: u32 = 10;
/// Clock half-period in microseconds.
const SCK_HALF_PERIOD_US: u32 = 1;
/// Poll granularity while waiting for data-ready.
const READY_POLL_MS: u32 = 1;

pub struct Hx711<DT, SCK, D> {
    dout: DT,
    sck: SCK,
    delay: D,
    /// Raw reading at zero load.
    offset: i32,
    /// Raw counts per gram.
    scale: f32,
    stabilize_ms: u32,
    tare_timeout_ms: u32,
}

impl<DT, SCK, D> Hx711<DT, SCK, D>
where
    DT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    pub fn new(dout: DT, sck: SCK, delay: D, config: &SystemConfig) -> Self {
        Self {
            dout,
            sck,
            delay,
            offset: 0,
            scale: config.loadcell_cal_factor,
            stabilize_ms: config.loadcell_stabilize_ms,
            tare_timeout_ms: config.loadcell_tare_timeout_ms,
        }
    }

    /// Conversion ready (DOUT low).
    pub fn is_ready(&mut self) -> Result<bool> {
        Ok(self.dout.is_low().map_err(|_| SensorError::Pin)?)
    }

    /// Shift out one conversion.  Caller must have checked [`is_ready`](Self::is_ready).
    pub fn read_raw(&mut self) -> Result<i32> {
        let mut value: u32 = 0;
        for _ in 0..24 {
            self.pulse()?;
            let bit = self.dout.is_high().map_err(|_| SensorError::Pin)?;
            value = (value << 1) | u32::from(bit);
        }
        // 25th pulse: channel A, gain 128.
        self.pulse()?;
        Ok(sign_extend_24(value))
    }

    /// Current zero-load offset in raw counts.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    fn pulse(&mut self) -> Result<()> {
        self.sck.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(SCK_HALF_PERIOD_US);
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(SCK_HALF_PERIOD_US);
        Ok(())
    }

    /// Block until a conversion is ready or `timeout_ms` elapses.
    fn wait_ready(&mut self, timeout_ms: u32) -> Result<bool> {
        let mut waited = 0;
        while !self.is_ready()? {
            if waited >= timeout_ms {
                return Ok(false);
            }
            self.delay.delay_ms(READY_POLL_MS);
            waited += READY_POLL_MS;
        }
        Ok(true)
    }

    fn to_grams(&self, raw: i32) -> f32 {
        (raw - self.offset) as f32 / self.scale
    }
}

impl<DT, SCK, D> LoadCellPort for Hx711<DT, SCK, D>
where
    DT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    fn initialize(&mut self) -> Result<()> {
        // SCK low wakes the chip.
        self.sck.set_low().map_err(|_| SensorError::Pin)?;

        if !self.wait_ready(self.tare_timeout_ms)? {
            return Err(SensorError::InitTimeout.into());
        }

        // Discard samples while the bridge settles.
        let mut settled = 0;
        while settled < self.stabilize_ms {
            if self.is_ready()? {
                self.read_raw()?;
            }
            self.delay.delay_ms(READY_POLL_MS);
            settled += READY_POLL_MS;
        }

        self.perform_tare()?;
        info!(
            "HX711 ready: offset={} scale={:.1}",
            self.offset, self.scale
        );
        Ok(())
    }

    fn try_read(&mut self) -> Result<Option<f32>> {
        if !self.is_ready()? {
            return Ok(None);
        }
        let raw = self.read_raw()?;
        Ok(Some(self.to_grams(raw)))
    }

    fn perform_tare(&mut self) -> Result<()> {
        let mut sum: i64 = 0;
        let mut budget = self.tare_timeout_ms;
        for _ in 0..TARE_SAMPLES {
            let mut waited = 0;
            while !self.is_ready()? {
                if waited >= budget {
                    return Err(SensorError::TareTimeout.into());
                }
                self.delay.delay_ms(READY_POLL_MS);
                waited += READY_POLL_MS;
            }
            budget -= waited;
            sum += i64::from(self.read_raw()?);
        }
        self.offset = (sum / i64::from(TARE_SAMPLES)) as i32;
        debug!("HX711 tare: offset={}", self.offset);
        Ok(())
    }
}

/// Two's-complement sign extension of a 24-bit sample.
fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}
