//! GPIO pin assignments for the press timer board (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Load cell ADC (HX711)
// ---------------------------------------------------------------------------

/// HX711 DOUT: data-ready / serial data (input).
pub const HX711_DOUT_GPIO: i32 = 27;
/// HX711 PD_SCK: serial clock (output).  Held high > 60 µs = power down.
pub const HX711_SCK_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Keypad (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

/// Lengthen the countdown.
pub const KEY_PLUS_GPIO: i32 = 32;
/// Shorten the countdown.
pub const KEY_MINUS_GPIO: i32 = 33;
/// Re-zero the scale (long press).
pub const KEY_TARE_GPIO: i32 = 25;
/// Acknowledge the alert.
pub const KEY_ACK_GPIO: i32 = 26;
