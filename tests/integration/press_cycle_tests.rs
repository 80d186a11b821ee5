//! Integration tests for `PressTimer`: full press cycles driven through
//! the public service API with mock ports.

use presstimer::app::actions::UserAction;
use presstimer::app::commands::{ArcCommand, Command};
use presstimer::app::ports::TarePort;
use presstimer::app::service::PressTimer;
use presstimer::config::SystemConfig;
use presstimer::fsm::AppState;
use presstimer::fsm::context::SensorReading;

use crate::mock_ports::{FakeTare, RecordingSink};

// ── Helpers ───────────────────────────────────────────────────

/// Service started and already past the boot calibration.
fn idle_service() -> (PressTimer, RecordingSink, FakeTare) {
    let mut svc = PressTimer::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let tare = FakeTare::default();
    svc.start(0, &mut sink);
    svc.handle_reading(SensorReading::valid(0.0), 0, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Idle);
    sink.clear();
    (svc, sink, tare)
}

fn press(svc: &mut PressTimer, sink: &mut RecordingSink, tare: &FakeTare, grams: f32, at: u64) {
    svc.handle_reading(SensorReading::valid(grams), at, sink, tare);
}

fn timing_service(start_ms: u64) -> (PressTimer, RecordingSink, FakeTare) {
    let (mut svc, mut sink, tare) = idle_service();
    press(&mut svc, &mut sink, &tare, 60.0, start_ms);
    press(&mut svc, &mut sink, &tare, 60.0, start_ms);
    assert_eq!(svc.state(), AppState::Timing);
    sink.clear();
    (svc, sink, tare)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_waits_in_calibrating_until_first_reading() {
    let mut svc = PressTimer::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let tare = FakeTare::default();
    svc.start(0, &mut sink);
    assert_eq!(svc.state(), AppState::Calibrating);

    svc.tick(5_000, &mut sink);
    svc.handle_action(UserAction::Increment, 5_000, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Calibrating);
    assert_eq!(svc.timer_duration_secs(), 15);

    svc.handle_reading(SensorReading::valid(3.0), 6_000, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(sink.states(), vec![AppState::Calibrating, AppState::Idle]);
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn full_cycle_with_default_duration() {
    let (mut svc, mut sink, tare) = idle_service();

    press(&mut svc, &mut sink, &tare, 60.0, 0);
    assert_eq!(svc.state(), AppState::Pressing);
    press(&mut svc, &mut sink, &tare, 60.0, 0);
    assert_eq!(svc.state(), AppState::Timing);
    assert_eq!(svc.timer_remaining_secs(), 15);
    assert!(sink
        .commands
        .contains(&Command::Arc(ArcCommand::Start { duration_ms: 15_000 })));

    svc.tick(14_999, &mut sink);
    assert_eq!(svc.state(), AppState::Timing);
    assert_eq!(svc.timer_remaining_secs(), 1);

    svc.tick(15_000, &mut sink);
    assert_eq!(svc.state(), AppState::Alert);
    assert_eq!(svc.timer_remaining_secs(), 0);
    assert!(sink.commands.contains(&Command::Arc(ArcCommand::Progress(100))));

    svc.handle_action(UserAction::AcknowledgeAlert, 16_000, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(svc.timer_remaining_secs(), 15);
    assert_eq!(sink.last_timer(), Some(15));
    assert_eq!(
        sink.states(),
        vec![
            AppState::Pressing,
            AppState::Timing,
            AppState::Alert,
            AppState::Idle
        ]
    );
}

#[test]
fn countdown_emits_each_second_once() {
    let (mut svc, mut sink, _tare) = timing_service(1_000);
    for t in (1_100..=6_000).step_by(100) {
        svc.tick(t, &mut sink);
    }
    assert_eq!(sink.timers(), vec![14, 13, 12, 11, 10]);
}

#[test]
fn alert_counts_overtime_until_release() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(15_000, &mut sink);
    sink.clear();

    svc.tick(17_000, &mut sink);
    assert_eq!(svc.timer_remaining_secs(), -2);
    assert_eq!(sink.timers(), vec![-2]);

    // Still pressed: stays in Alert.
    press(&mut svc, &mut sink, &tare, 500.0, 17_100);
    assert_eq!(svc.state(), AppState::Alert);

    press(&mut svc, &mut sink, &tare, 0.0, 18_000);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(svc.timer_remaining_secs(), 15);
}

#[test]
fn release_during_countdown_returns_to_idle() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(4_000, &mut sink);
    press(&mut svc, &mut sink, &tare, 10.0, 4_100);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(sink.last_timer(), Some(15));
}

#[test]
fn single_spike_does_not_start_countdown() {
    let (mut svc, mut sink, tare) = idle_service();
    press(&mut svc, &mut sink, &tare, 80.0, 0);
    press(&mut svc, &mut sink, &tare, 20.0, 100);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(sink.states(), vec![AppState::Pressing, AppState::Idle]);
}

#[test]
fn threshold_is_exclusive() {
    let (mut svc, mut sink, tare) = idle_service();
    press(&mut svc, &mut sink, &tare, 50.0, 0);
    assert_eq!(svc.state(), AppState::Idle);
    press(&mut svc, &mut sink, &tare, 50.1, 100);
    assert_eq!(svc.state(), AppState::Pressing);
}

// ── Duration adjustment ───────────────────────────────────────

#[test]
fn three_increments_then_cycle_uses_new_duration() {
    let (mut svc, mut sink, tare) = idle_service();
    for _ in 0..3 {
        svc.handle_action(UserAction::Increment, 0, &mut sink, &tare);
    }
    assert_eq!(svc.timer_duration_secs(), 30);
    assert_eq!(sink.settings(), vec![20, 25, 30]);
    assert_eq!(sink.timers(), vec![20, 25, 30]);

    sink.clear();
    press(&mut svc, &mut sink, &tare, 60.0, 1_000);
    press(&mut svc, &mut sink, &tare, 60.0, 1_100);
    assert_eq!(svc.timer_remaining_secs(), 30);
    assert!(sink
        .commands
        .contains(&Command::Arc(ArcCommand::Start { duration_ms: 30_000 })));
}

#[test]
fn duration_clamped_at_both_ends() {
    let (mut svc, mut sink, tare) = idle_service();
    for _ in 0..100 {
        svc.handle_action(UserAction::Increment, 0, &mut sink, &tare);
    }
    assert_eq!(svc.timer_duration_secs(), 300);
    assert_eq!(sink.settings().last(), Some(&300));

    for _ in 0..100 {
        svc.handle_action(UserAction::Decrement, 0, &mut sink, &tare);
    }
    assert_eq!(svc.timer_duration_secs(), 5);
    assert_eq!(sink.settings().last(), Some(&5));
}

#[test]
fn increment_while_timing_extends_live_countdown() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(6_000, &mut sink);
    assert_eq!(svc.timer_remaining_secs(), 9);

    svc.handle_action(UserAction::Increment, 6_000, &mut sink, &tare);
    assert_eq!(svc.timer_duration_secs(), 20);
    assert_eq!(svc.timer_remaining_secs(), 14);
    assert_eq!(sink.last_timer(), Some(14));
    assert_eq!(sink.settings(), vec![20]);
}

#[test]
fn decrement_below_elapsed_expires_on_next_tick() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(12_000, &mut sink);
    svc.handle_action(UserAction::Decrement, 12_000, &mut sink, &tare);
    svc.handle_action(UserAction::Decrement, 12_000, &mut sink, &tare);
    assert_eq!(svc.timer_duration_secs(), 5);
    assert_eq!(svc.state(), AppState::Timing);

    svc.tick(12_100, &mut sink);
    assert_eq!(svc.state(), AppState::Alert);
    assert_eq!(svc.timer_remaining_secs(), -7);
}

#[test]
fn increment_after_expiry_only_changes_setting() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(16_000, &mut sink);
    assert_eq!(svc.state(), AppState::Alert);
    sink.clear();

    for _ in 0..4 {
        svc.handle_action(UserAction::Increment, 16_000, &mut sink, &tare);
    }
    svc.tick(16_100, &mut sink);
    assert_eq!(svc.state(), AppState::Alert);
    assert_eq!(svc.timer_duration_secs(), 35);
    assert_eq!(svc.timer_remaining_secs(), -1);
    assert!(sink.timers().iter().all(|&t| t <= 0));
    assert_eq!(sink.settings(), vec![20, 25, 30, 35]);

    svc.tick(18_000, &mut sink);
    assert_eq!(svc.timer_remaining_secs(), -3);

    svc.handle_action(UserAction::AcknowledgeAlert, 18_100, &mut sink, &tare);
    assert_eq!(svc.timer_remaining_secs(), 35);
}

// ── Tare ──────────────────────────────────────────────────────

#[test]
fn tare_from_every_operating_state() {
    let setups: [fn() -> (PressTimer, RecordingSink, FakeTare); 2] =
        [idle_service, || timing_service(0)];
    for setup in setups {
        let (mut svc, mut sink, tare) = setup();
        svc.handle_action(UserAction::Tare, 1_000, &mut sink, &tare);
        assert_eq!(svc.state(), AppState::Calibrating);
        assert!(tare.tare_pending());
        assert_eq!(tare.requests.get(), 1);
    }

    // Pressing and Alert.
    let (mut svc, mut sink, tare) = idle_service();
    press(&mut svc, &mut sink, &tare, 60.0, 0);
    svc.handle_action(UserAction::Tare, 100, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Calibrating);

    let (mut svc, mut sink, tare) = timing_service(0);
    svc.tick(20_000, &mut sink);
    assert_eq!(svc.state(), AppState::Alert);
    svc.handle_action(UserAction::Tare, 20_100, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Calibrating);
}

#[test]
fn readings_withheld_until_tare_completes() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.handle_action(UserAction::Tare, 1_000, &mut sink, &tare);
    assert!(!svc.accepts_readings(&tare));

    press(&mut svc, &mut sink, &tare, 900.0, 1_100);
    assert_eq!(svc.state(), AppState::Calibrating);

    tare.complete();
    assert!(svc.accepts_readings(&tare));
    press(&mut svc, &mut sink, &tare, 0.0, 1_200);
    assert_eq!(svc.state(), AppState::Idle);
}

#[test]
fn duration_survives_tare() {
    let (mut svc, mut sink, tare) = idle_service();
    svc.handle_action(UserAction::Increment, 0, &mut sink, &tare);
    svc.handle_action(UserAction::Tare, 0, &mut sink, &tare);
    tare.complete();
    press(&mut svc, &mut sink, &tare, 0.0, 100);
    assert_eq!(svc.state(), AppState::Idle);
    assert_eq!(svc.timer_duration_secs(), 20);
    assert_eq!(svc.timer_remaining_secs(), 20);
}

#[test]
fn acknowledge_outside_alert_is_ignored() {
    let (mut svc, mut sink, tare) = timing_service(0);
    svc.handle_action(UserAction::AcknowledgeAlert, 1_000, &mut sink, &tare);
    assert_eq!(svc.state(), AppState::Timing);
    assert!(sink.commands.is_empty());
}

// ── Sensor fault ──────────────────────────────────────────────

#[test]
fn invalid_readings_do_not_move_the_state_machine() {
    let (mut svc, mut sink, tare) = timing_service(0);
    for t in 1..=3 {
        svc.handle_reading(SensorReading::invalid(), t * 1_000, &mut sink, &tare);
    }
    assert_eq!(svc.state(), AppState::Timing);
    assert!(svc.sensor_faulted());
    assert_eq!(
        sink.commands
            .iter()
            .filter(|c| **c == Command::SensorFault)
            .count(),
        1
    );
}
