//! Polled, debounced push-buttons and the four-key keypad.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  Each [`Button`] samples
//! its pin from the presentation task at the UI refresh rate and runs a
//! small debounce + gesture state machine.
//!
//! ## Gesture detection
//!
//! | Gesture     | Condition                           | Event        |
//! |-------------|-------------------------------------|--------------|
//! | Short press | Released after debounce, before 2 s | `ShortPress` |
//! | Long press  | Held >= 2 s (fires once, while held)| `LongPress`  |
//!
//! ## Keypad mapping
//!
//! | Key   | Gesture     | Event                      |
//! |-------|-------------|----------------------------|
//! | `+`   | short press | `Action(Increment)`        |
//! | `-`   | short press | `Action(Decrement)`        |
//! | Tare  | long press  | `Action(Tare)`             |
//! | Ack   | short press | `Action(AcknowledgeAlert)` |
//! | Ack   | long press  | `ToggleUnit`               |

use embedded_hal::digital::InputPin;
use heapless::Deque;

use crate::app::actions::UserAction;
use crate::app::ports::{InputEvent, InputPort};

const DEBOUNCE_MS: u64 = 50;
const LONG_PRESS_MS: u64 = 2000;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u64 },
    Pressed { since_ms: u64 },
    /// Long press already reported; waiting for release.
    Held,
}

pub struct Button<P> {
    pin: P,
    state: GestureState,
}

impl<P: InputPin> Button<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: GestureState::Idle,
        }
    }

    /// Sample the pin and advance the gesture state machine.
    /// Returns a classified gesture event, if any.
    pub fn tick(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        // A failed read counts as released.
        let down = self.pin.is_low().unwrap_or(false);

        match self.state {
            GestureState::Idle => {
                if down {
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                None
            }

            GestureState::DebounceWait { since_ms } => {
                if !down {
                    self.state = GestureState::Idle;
                } else if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Pressed { since_ms };
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                if !down {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::ShortPress);
                }
                if now_ms.saturating_sub(since_ms) >= LONG_PRESS_MS {
                    self.state = GestureState::Held;
                    return Some(ButtonEvent::LongPress);
                }
                None
            }

            GestureState::Held => {
                if !down {
                    self.state = GestureState::Idle;
                }
                None
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Keypad
// ═══════════════════════════════════════════════════════════════

/// Four physical keys mapped to [`InputEvent`]s.
pub struct Keypad<P> {
    plus: Button<P>,
    minus: Button<P>,
    tare: Button<P>,
    ack: Button<P>,
    pending: Deque<InputEvent, 4>,
}

impl<P: InputPin> Keypad<P> {
    pub fn new(plus: P, minus: P, tare: P, ack: P) -> Self {
        Self {
            plus: Button::new(plus),
            minus: Button::new(minus),
            tare: Button::new(tare),
            ack: Button::new(ack),
            pending: Deque::new(),
        }
    }

    fn scan(&mut self, now_ms: u64) {
        use ButtonEvent::{LongPress, ShortPress};

        let plus = match self.plus.tick(now_ms) {
            Some(ShortPress) => Some(InputEvent::Action(UserAction::Increment)),
            _ => None,
        };
        let minus = match self.minus.tick(now_ms) {
            Some(ShortPress) => Some(InputEvent::Action(UserAction::Decrement)),
            _ => None,
        };
        let tare = match self.tare.tick(now_ms) {
            Some(LongPress) => Some(InputEvent::Action(UserAction::Tare)),
            _ => None,
        };
        let ack = match self.ack.tick(now_ms) {
            Some(ShortPress) => Some(InputEvent::Action(UserAction::AcknowledgeAlert)),
            Some(LongPress) => Some(InputEvent::ToggleUnit),
            None => None,
        };

        // At most one event per key, so a scan never overflows an empty queue.
        for event in [plus, minus, tare, ack].into_iter().flatten() {
            let _ = self.pending.push_back(event);
        }
    }
}

impl<P: InputPin> InputPort for Keypad<P> {
    fn poll(&mut self, now_ms: u64) -> Option<InputEvent> {
        if self.pending.is_empty() {
            self.scan(now_ms);
        }
        self.pending.pop_front()
    }
}
