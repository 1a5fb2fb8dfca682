//! Tests for the exit and panic actions that follow fatal and panic records.

use parking_lot::Mutex;
use rotolog::{Entity, Error, FATAL_EXIT_CODE, Level, Logger, MemorySink};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

fn logger(sink: &MemorySink) -> Logger {
    Logger::builder()
        .name("test")
        .level(Level::Trace)
        .output(sink.clone())
        .build()
}

fn refuse(_: &Entity<'_>, _: &mut Vec<u8>) -> Result<(), Error> {
    Err(Error::Format("refused".to_string()))
}

#[test]
fn fatal_runs_exit_action_with_code_one() {
    let sink = MemorySink::new();
    let logger = logger(&sink);
    let code = Arc::new(Mutex::new(None));

    let seen = Arc::clone(&code);
    logger.set_exit_fn(Some(Arc::new(move |c: i32| *seen.lock() = Some(c))));
    logger.fatal("going down").unwrap();

    assert_eq!(*code.lock(), Some(FATAL_EXIT_CODE));
    assert_eq!(FATAL_EXIT_CODE, 1);
    assert!(sink.contents().contains(r#""level":"fatal""#));
}

#[test]
fn panic_runs_panic_action_with_message() {
    let sink = MemorySink::new();
    let logger = logger(&sink);
    let message = Arc::new(Mutex::new(String::new()));

    let seen = Arc::clone(&message);
    logger.set_panic_fn(Some(Arc::new(move |m: &str| *seen.lock() = m.to_string())));
    logger.with_field("k", "v").panic(format_args!("bad {}", 42)).unwrap();

    assert_eq!(*message.lock(), "bad 42");
    assert!(sink.contents().contains(r#""level":"panic""#));
}

#[test]
fn default_panic_action_unwinds_after_writing() {
    let sink = MemorySink::new();
    let logger = logger(&sink);
    logger.set_panic_fn(Some(Arc::new(|_| {})));
    logger.set_panic_fn(None);

    let result = catch_unwind(AssertUnwindSafe(|| logger.panic("boom")));
    let payload = result.unwrap_err();
    let text = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap();

    assert_eq!(text, "boom");
    assert!(sink.contents().contains("boom"));
}

#[test]
fn terminal_actions_run_even_when_nothing_was_written() {
    let logger = Logger::builder()
        .output(MemorySink::new())
        .formatter(refuse)
        .build();
    let exited = Arc::new(Mutex::new(false));

    let flag = Arc::clone(&exited);
    logger.set_exit_fn(Some(Arc::new(move |_| *flag.lock() = true)));

    assert!(logger.fatal("x").is_err());
    assert!(*exited.lock());
}

#[test]
fn disabled_terminal_actions_let_execution_continue() {
    let sink = MemorySink::new();
    let logger = logger(&sink);
    logger.disable_terminal_actions();

    logger.fatal("first").unwrap();
    logger.panic("second").unwrap();
    logger.info("third").unwrap();

    assert_eq!(sink.contents().lines().count(), 3);
}
