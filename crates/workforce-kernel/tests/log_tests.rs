use workforce_kernel::error::LogError;
use workforce_kernel::logging::{verify_chain, Event, EventLog, Outcome};

#[test]
fn test_log_integrity() {
    let log = EventLog::default();

    let _ = log.append(Event::new(Some("3".into()), "decide", "r1", Outcome::Applied, ""));
    let _ = log.append(Event::new(
        None,
        "reparent",
        "2",
        Outcome::Rejected,
        "cannot move an employee under one of their own reports",
    ));

    assert_eq!(log.len(), 2);
    assert_eq!(log.verify_integrity(), Ok(2));
}

#[test]
fn test_exported_chain_detects_reordering() {
    let log = EventLog::default();
    for action in ["sign_in", "decide", "run_payroll"] {
        log.append(Event::new(None, action, "-", Outcome::Applied, ""));
    }

    let mut events = log.events();
    assert!(verify_chain(&events).is_ok());

    events.swap(1, 2);
    assert_eq!(
        verify_chain(&events),
        Err(LogError::IntegrityViolation { index: 1 })
    );
}

#[test]
fn test_exported_chain_detects_truncation_at_front() {
    let log = EventLog::default();
    for action in ["a", "b", "c"] {
        log.append(Event::new(None, action, "-", Outcome::Applied, ""));
    }
    let events = log.events();
    assert_eq!(
        verify_chain(&events[1..]),
        Err(LogError::IntegrityViolation { index: 0 })
    );
}
