//! Core-pinned thread spawning for the ESP32 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread. This means the config→spawn pair must not be
//! interleaved with other thread creation on the same thread.

use std::thread::JoinHandle;

use crate::error::{Error, Result};

/// CPU core identifiers for the ESP32 Xtensa LX6 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): sensor acquisition and state control.
    Pro = 0,
    /// Core 1 (APP_CPU): presentation.
    App = 1,
}

/// Placement and sizing of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated thread name (e.g. `"sensor\0"`).
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_bytes: usize,
}

impl TaskSpec {
    pub const SENSOR: Self = Self {
        name: "sensor\0",
        core: Core::Pro,
        priority: 2,
        stack_bytes: 4096,
    };

    pub const CONTROLLER: Self = Self {
        name: "logic\0",
        core: Core::Pro,
        priority: 2,
        stack_bytes: 4096,
    };

    pub const PRESENTATION: Self = Self {
        name: "ui\0",
        core: Core::App,
        priority: 3,
        stack_bytes: 8192,
    };

    fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn a thread pinned to `spec.core` with explicit priority and stack.
#[cfg(target_os = "espidf")]
pub fn spawn_task(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> Result<JoinHandle<()>> {
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = spec.stack_bytes as _;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(Error::Init("esp_pthread_set_cfg failed"));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}B)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_bytes
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
        .map_err(|_| Error::Init("thread creation failed"))
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}B)",
        spec.display_name(),
        spec.stack_bytes
    );

    // Floor for host std formatting.
    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_bytes.max(64 * 1024))
        .spawn(f)
        .map_err(|_| Error::Init("thread creation failed"))
}
