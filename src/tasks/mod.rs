//! The three periodic tasks and their spawner.
//!
//! | Task          | Period | Core | Prio | Stack  |
//! |---------------|--------|------|------|--------|
//! | sensor        | 100 ms | 0    | 2    | 4 KiB  |
//! | controller    | 100 ms | 0    | 2    | 4 KiB  |
//! | presentation  | 33 ms  | 1    | 3    | 8 KiB  |
//!
//! Each task exposes `cycle(now_ms, links)` for deterministic tests and a
//! `run` loop that paces `cycle` with a [`Ticker`](crate::scheduler::Ticker).

pub mod controller;
pub mod presentation;
pub mod sensor;
pub mod spawn;
