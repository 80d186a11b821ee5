//! Peripheral drivers, generic over `embedded-hal` 1.0.

pub mod button;
pub mod hx711;
