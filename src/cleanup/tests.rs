use super::*;
use crate::exit_codes;
use nix::sys::signal::{Signal, raise};
use serial_test::serial;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn append_action(path: &Path, tag: &str) -> String {
    format!("sh -c \"echo {} >> {}\"", tag, path.display())
}

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

fn lines_of(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn actions_run_in_reverse_registration_order() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let stack = CleanupStack::new(vec![
        append_action(&log, "A"),
        append_action(&log, "B"),
        append_action(&log, "C"),
    ]);

    assert!(stack.run());
    assert_eq!(lines_of(&log), vec!["C", "B", "A"]);
}

#[test]
fn rerunning_teardown_is_a_silent_no_op() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let stack = CleanupStack::new(vec![append_action(&log, "once")]);
    assert!(stack.run());
    assert!(stack.run());
    assert_eq!(lines_of(&log), vec!["once"]);

    // A failed first run keeps reporting failure on re-entry, without
    // re-executing anything.
    let stack = CleanupStack::new(vec!["false".to_string()]);
    assert!(!stack.run());
    assert!(!stack.run());
}

#[test]
fn every_action_runs_even_after_a_failure() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let stack = CleanupStack::new(vec![
        append_action(&log, "A"),
        "false".to_string(),
        append_action(&log, "B"),
    ]);

    assert!(!stack.run());
    // Reverse order: B, then the failing step, then A still runs.
    assert_eq!(lines_of(&log), vec!["B", "A"]);
}

#[test]
fn unparseable_and_empty_actions_count_as_failures() {
    let stack = CleanupStack::new(vec!["rm 'unclosed".to_string()]);
    assert!(!stack.run());

    let stack = CleanupStack::new(vec!["   ".to_string()]);
    assert!(!stack.run());
}

#[test]
fn successful_command_with_failing_cleanup_reports_reserved_code() {
    let code = run_with_cleanup(vec!["false".to_string()], &sh("exit 0")).unwrap();
    assert_eq!(code, exit_codes::CLEANUP_FAILURE);
}

#[test]
fn failing_command_keeps_its_code_even_when_cleanup_fails() {
    let code = run_with_cleanup(vec!["false".to_string()], &sh("exit 3")).unwrap();
    assert_eq!(code, 3);
}

#[test]
fn clean_run_passes_the_command_code_through() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let code = run_with_cleanup(vec![append_action(&log, "done")], &sh("exit 0")).unwrap();
    assert_eq!(code, 0);
    assert_eq!(lines_of(&log), vec!["done"]);

    let code = run_with_cleanup(vec![], &sh("exit 9")).unwrap();
    assert_eq!(code, 9);
}

#[test]
fn teardown_runs_when_the_command_cannot_be_spawned() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let result = run_with_cleanup(
        vec![append_action(&log, "ran")],
        &["definitely-not-a-real-binary-xyz".to_string()],
    );
    assert!(result.is_err());
    assert_eq!(lines_of(&log), vec!["ran"]);
}

#[test]
fn read_cleanup_file_skips_blanks_and_comments() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cleanup.list");
    fs::write(&path, "# teardown steps\nrm -rf /tmp/scratch\n\n  release-lock deploy  \n").unwrap();

    let actions = read_cleanup_file(&path).unwrap();
    assert_eq!(
        actions,
        vec!["rm -rf /tmp/scratch".to_string(), "release-lock deploy".to_string()]
    );
}

#[test]
fn read_cleanup_file_missing_is_a_usage_error() {
    let result = read_cleanup_file(Path::new("/nonexistent/cleanup.list"));
    assert!(matches!(result, Err(crate::error::GuardError::Usage(_))));
}

#[test]
#[serial]
fn interrupt_forwards_to_child_and_runs_teardown_once() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let raiser = std::thread::spawn(|| {
        std::thread::sleep(Duration::from_millis(300));
        raise(Signal::SIGINT).unwrap();
    });

    let code = run_with_cleanup(vec![append_action(&log, "teardown")], &sh("sleep 10")).unwrap();
    raiser.join().unwrap();

    // Child died from the forwarded SIGINT.
    assert_eq!(code, exit_codes::SIGNAL_BASE + 2);
    assert_eq!(lines_of(&log), vec!["teardown"]);
}

#[test]
#[serial]
fn two_rapid_interrupts_still_run_teardown_exactly_once() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("order.log");

    let raiser = std::thread::spawn(|| {
        std::thread::sleep(Duration::from_millis(300));
        raise(Signal::SIGINT).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        raise(Signal::SIGINT).unwrap();
    });

    let code = run_with_cleanup(
        vec![append_action(&log, "A"), append_action(&log, "B")],
        &sh("sleep 10"),
    )
    .unwrap();
    raiser.join().unwrap();

    assert_eq!(code, exit_codes::SIGNAL_BASE + 2);
    assert_eq!(lines_of(&log), vec!["B", "A"]);
}

#[test]
#[serial]
fn signal_received_before_the_child_starts_is_delivered_on_registration() {
    use crate::process::exit_code_of;

    let forwarder = SignalForwarder::install().unwrap();

    // The signal lands while no child pid is registered yet, as if it
    // arrived in the spawn window; the coordinator must survive it.
    raise(Signal::SIGINT).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    let mut child = std::process::Command::new("sleep").arg("10").spawn().unwrap();
    forwarder.set_child(child.id());

    let status = child.wait().unwrap();
    assert_eq!(exit_code_of(status), exit_codes::SIGNAL_BASE + 2);
    assert_eq!(forwarder.last_signal(), Some(2));
}

#[test]
#[serial]
fn child_absorbing_the_signal_still_exits_with_signal_convention() {
    let raiser = std::thread::spawn(|| {
        std::thread::sleep(Duration::from_millis(300));
        raise(Signal::SIGINT).unwrap();
    });

    // The child traps INT and exits zero; the coordinator still reports
    // the interruption as 128+2.
    let code = run_with_cleanup(vec![], &sh("trap 'exit 0' INT; sleep 10 & wait")).unwrap();
    raiser.join().unwrap();

    assert_eq!(code, exit_codes::SIGNAL_BASE + 2);
}

#[test]
#[serial]
fn cleanup_failure_outranks_the_signal_exit_when_child_succeeded() {
    let raiser = std::thread::spawn(|| {
        std::thread::sleep(Duration::from_millis(300));
        raise(Signal::SIGINT).unwrap();
    });

    let code = run_with_cleanup(
        vec!["false".to_string()],
        &sh("trap 'exit 0' INT; sleep 10 & wait"),
    )
    .unwrap();
    raiser.join().unwrap();

    assert_eq!(code, exit_codes::CLEANUP_FAILURE);
}
