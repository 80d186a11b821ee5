//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter   | Implements  | Connects to                  |
//! |-----------|-------------|------------------------------|
//! | `console` | Presenter   | Serial log + any InputPort   |
//! | `time`    | ClockPort   | ESP32 high-resolution timer  |
//!
//! The load cell ([`Hx711`](crate::drivers::hx711::Hx711)) and keypad
//! ([`Keypad`](crate::drivers::button::Keypad)) implement their ports
//! directly in [`crate::drivers`].

pub mod console;
pub mod time;
