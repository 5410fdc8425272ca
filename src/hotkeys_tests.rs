//! Tests for chord registration and the stage state machine.

use super::*;
use crate::scheduler::ManualScheduler;
use crate::shortcuts::parse_hotkey;
use crate::test_support::FakeAcceleratorHost;

const TIMEOUT: Duration = Duration::from_millis(1500);

fn engine_with(policy: RegistrationPolicy) -> (HotkeySequenceEngine, FakeAcceleratorHost, ManualScheduler) {
    let host = FakeAcceleratorHost::new();
    let scheduler = ManualScheduler::new();
    let engine = HotkeySequenceEngine::new(Box::new(host.clone()), Box::new(scheduler.clone()))
        .with_reset_after(TIMEOUT)
        .with_policy(policy);
    (engine, host, scheduler)
}

fn engine() -> (HotkeySequenceEngine, FakeAcceleratorHost, ManualScheduler) {
    engine_with(RegistrationPolicy::AllOrNothing)
}

fn install(engine: &mut HotkeySequenceEngine, raw: &str) -> InstallReport {
    engine.install(parse_hotkey(raw).unwrap()).unwrap()
}

fn elapse(engine: &mut HotkeySequenceEngine, scheduler: &ManualScheduler, by: Duration) {
    for id in scheduler.advance(by) {
        engine.on_timer(id);
    }
}

// ========================================
// install / teardown
// ========================================

#[test]
fn test_install_registers_one_accelerator_per_stage() {
    let (mut engine, host, _) = engine();
    let report = install(&mut engine, "Ctrl+Y+E+S");
    assert_eq!(report.registered_stages, vec![0, 1, 2]);
    assert!(!report.is_partial());
    assert_eq!(host.registered(), vec!["Ctrl + Y", "Ctrl + E", "Ctrl + S"]);
}

#[test]
fn test_reinstall_unregisters_previous_bindings() {
    let (mut engine, host, _) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    install(&mut engine, "Alt+K");
    assert_eq!(host.registered(), vec!["Alt + K"]);
    assert_eq!(host.unregister_calls(), 3);
    assert_eq!(engine.spec().map(ChordSpec::display), Some("Alt + K"));
}

#[test]
fn test_teardown_releases_everything_and_is_idempotent() {
    let (mut engine, host, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    engine.teardown();
    engine.teardown();
    assert!(host.registered().is_empty());
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(engine.progress(), 0);
    assert_eq!(engine.on_stage(0), StageOutcome::Ignored);
}

#[test]
fn test_repeated_key_shares_one_accelerator() {
    let (mut engine, host, _) = engine();
    let report = install(&mut engine, "Ctrl+A+A");
    assert_eq!(report.registered_stages, vec![0, 1]);
    assert_eq!(host.register_calls(), 1);

    let id = host.id_of("Ctrl + A").unwrap();
    assert_eq!(engine.on_accelerator(id), StageOutcome::Advanced { progress: 1 });
    assert_eq!(engine.on_accelerator(id), StageOutcome::Completed);
    assert_eq!(engine.completions(), 1);
}

// ========================================
// Partial registration
// ========================================

#[test]
fn test_all_or_nothing_rolls_back_on_any_failure() {
    let (mut engine, host, _) = engine();
    host.reject("Ctrl + E");
    let err = engine.install(parse_hotkey("Ctrl+Y+E+S").unwrap()).unwrap_err();

    assert!(matches!(err, InstallError::Incomplete { .. }));
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].stage, 1);
    assert!(err.to_string().contains("stage 2"));
    assert!(host.registered().is_empty());
    assert!(engine.spec().is_none());
}

#[test]
fn test_failed_install_restores_previous_chord() {
    let (mut engine, host, _) = engine();
    install(&mut engine, "Alt+K");
    host.reject("Ctrl + E");
    assert!(engine.install(parse_hotkey("Ctrl+Y+E").unwrap()).is_err());

    assert_eq!(host.registered(), vec!["Alt + K"]);
    assert_eq!(engine.spec().map(ChordSpec::display), Some("Alt + K"));
    assert_eq!(engine.on_stage(0), StageOutcome::Completed);
}

#[test]
fn test_best_effort_keeps_partial_chord_with_diagnostic() {
    let (mut engine, host, _) = engine_with(RegistrationPolicy::BestEffort);
    host.reject("Ctrl + E");
    let report = install(&mut engine, "Ctrl+Y+E+S");

    assert!(report.is_partial());
    assert_eq!(report.registered_stages, vec![0, 2]);
    let diagnostic = report.diagnostic().unwrap();
    assert!(diagnostic.contains("unreachable"));
    assert!(diagnostic.contains("stage 2"));
    assert_eq!(host.registered(), vec!["Ctrl + Y", "Ctrl + S"]);
}

#[test]
fn test_nothing_registered_fails_under_any_policy() {
    for policy in [RegistrationPolicy::AllOrNothing, RegistrationPolicy::BestEffort] {
        let (mut engine, host, _) = engine_with(policy);
        host.reject("Ctrl + Q");
        let err = engine.install(parse_hotkey("Ctrl+Q").unwrap()).unwrap_err();
        assert!(matches!(err, InstallError::NothingRegistered { .. }));
        assert!(err.to_string().contains("already registered"));
    }
}

// ========================================
// Stage state machine
// ========================================

#[test]
fn test_in_order_stages_complete_exactly_once() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");

    assert_eq!(engine.on_stage(0), StageOutcome::Advanced { progress: 1 });
    assert_eq!(engine.on_stage(1), StageOutcome::Advanced { progress: 2 });
    assert_eq!(engine.on_stage(2), StageOutcome::Completed);
    assert_eq!(engine.completions(), 1);
    assert_eq!(engine.progress(), 0);
    assert_eq!(engine.state().pending_reset, None);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_engine_is_reusable_after_completion() {
    let (mut engine, _, _) = engine();
    install(&mut engine, "Ctrl+Y+E");
    for _ in 0..3 {
        engine.on_stage(0);
        engine.on_stage(1);
    }
    assert_eq!(engine.completions(), 3);
}

#[test]
fn test_later_stage_first_resets() {
    let (mut engine, _, _) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    assert_eq!(engine.on_stage(1), StageOutcome::Reset);
    assert_eq!(engine.progress(), 0);
    assert_eq!(engine.completions(), 0);
}

#[test]
fn test_skipped_stage_resets() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    assert_eq!(engine.on_stage(2), StageOutcome::Reset);
    assert_eq!(engine.progress(), 0);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_stage_zero_restarts_chord() {
    let (mut engine, _, _) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    engine.on_stage(1);
    assert_eq!(engine.on_stage(0), StageOutcome::Advanced { progress: 1 });
}

#[test]
fn test_single_key_completes_without_timer() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+K");
    assert_eq!(engine.on_stage(0), StageOutcome::Completed);
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(engine.progress(), 0);
}

#[test]
fn test_unknown_ids_and_stages_are_ignored() {
    let (mut engine, _, _) = engine();
    assert_eq!(engine.on_stage(0), StageOutcome::Ignored);
    install(&mut engine, "Ctrl+Y+E");
    assert_eq!(engine.on_stage(5), StageOutcome::Ignored);
    assert_eq!(engine.on_accelerator(AcceleratorId(9999)), StageOutcome::Ignored);
}

#[test]
fn test_accelerator_press_routes_to_its_stage() {
    let (mut engine, host, _) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    let y = host.id_of("Ctrl + Y").unwrap();
    let e = host.id_of("Ctrl + E").unwrap();
    let s = host.id_of("Ctrl + S").unwrap();

    assert_eq!(engine.on_accelerator(e), StageOutcome::Reset);
    engine.on_accelerator(y);
    engine.on_accelerator(e);
    assert_eq!(engine.on_accelerator(s), StageOutcome::Completed);
}

// ========================================
// Reset window
// ========================================

#[test]
fn test_timeout_resets_progress() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);

    elapse(&mut engine, &scheduler, TIMEOUT);
    assert_eq!(engine.progress(), 0);
    assert_eq!(engine.on_stage(1), StageOutcome::Reset);
}

#[test]
fn test_advance_refreshes_reset_window() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    elapse(&mut engine, &scheduler, Duration::from_millis(1400));
    engine.on_stage(1);
    elapse(&mut engine, &scheduler, Duration::from_millis(1400));

    assert_eq!(engine.progress(), 2);
    assert_eq!(scheduler.pending_count(), 1);
    assert_eq!(engine.on_stage(2), StageOutcome::Completed);
}

#[test]
fn test_at_most_one_timer_outstanding() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "A+B+C+D");
    engine.on_stage(0);
    engine.on_stage(1);
    engine.on_stage(2);
    assert_eq!(scheduler.pending_count(), 1);
}

#[test]
fn test_reinstall_cancels_pending_timer() {
    let (mut engine, _, scheduler) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    let stale = engine.state().pending_reset.unwrap();

    install(&mut engine, "Ctrl+Y+E+S");
    assert!(!scheduler.is_pending(stale));
    assert_eq!(engine.progress(), 0);
}

#[test]
fn test_stale_timer_id_is_ignored() {
    let (mut engine, _, _) = engine();
    install(&mut engine, "Ctrl+Y+E+S");
    engine.on_stage(0);
    let first = engine.state().pending_reset.unwrap();
    engine.on_stage(1);

    assert!(!engine.on_timer(first));
    assert_eq!(engine.progress(), 2);
}
