//! Inbound user actions.
//!
//! Produced by the presentation side (buttons, touch) and consumed by the
//! state controller in arrival order.

/// A request from the operator.  Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Lengthen the countdown by one step.
    Increment,
    /// Shorten the countdown by one step.
    Decrement,
    /// Re-zero the load cell.
    Tare,
    /// Silence an expired countdown.
    AcknowledgeAlert,
}
