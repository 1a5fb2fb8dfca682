//! Tests for the dispatch pipeline: filtering, record shape, setters, errors.

use chrono::{DateTime, Local, SecondsFormat};
use rotolog::{Entity, Error, Level, Logger, MemorySink};
use serde::{Serialize, Serializer};
use serde_json::json;
use std::io;
use std::sync::Arc;

fn fixed_logger(sink: &MemorySink, now: DateTime<Local>) -> Logger {
    Logger::builder()
        .name("test")
        .level(Level::Trace)
        .output(sink.clone())
        .now_fn(Arc::new(move || now))
        .disable_terminal_actions()
        .build()
}

fn expected(now: DateTime<Local>, level: Level, message: &str) -> String {
    let v = json!({
        "name": "test",
        "time": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        "level": level.as_str(),
        "message": message,
    });
    format!("{v}\n")
}

struct Broken;

impl Serialize for Broken {
    fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("cannot serialize"))
    }
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("sink down"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn level_and_message(e: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), Error> {
    buf.extend_from_slice(format!("{} {}\n", e.level(), e.message()).as_bytes());
    Ok(())
}

#[test]
fn builder_default() {
    let logger = Logger::builder().build();
    assert_eq!(logger.level(), Level::Info);
    assert_eq!(logger.name(), "");
}

#[test]
fn new_sets_name() {
    let logger = Logger::new("test");
    assert_eq!(logger.name(), "test");
}

#[test]
fn set_level_is_visible() {
    let logger = Logger::new("test");
    logger.set_level(Level::Debug);
    assert_eq!(logger.level(), Level::Debug);
}

#[test]
fn every_level_renders_exact_record() {
    let sink = MemorySink::new();
    let now = Local::now();
    let logger = fixed_logger(&sink, now);

    let calls: [(Level, fn(&Logger, &str) -> Result<(), Error>); 7] = [
        (Level::Trace, |l, m| l.trace(m)),
        (Level::Debug, |l, m| l.debug(m)),
        (Level::Info, |l, m| l.info(m)),
        (Level::Warn, |l, m| l.warn(m)),
        (Level::Error, |l, m| l.error(m)),
        (Level::Fatal, |l, m| l.fatal(m)),
        (Level::Panic, |l, m| l.panic(m)),
    ];

    for (level, call) in calls {
        sink.clear();
        call(&logger, "foo").unwrap();
        assert_eq!(sink.contents(), expected(now, level, "foo"), "{level}");
    }
}

#[test]
fn format_args_work_as_messages() {
    let sink = MemorySink::new();
    let now = Local::now();
    let logger = fixed_logger(&sink, now);

    logger.info(format_args!("foo-{}", "bar")).unwrap();
    assert_eq!(sink.contents(), expected(now, Level::Info, "foo-bar"));
}

#[test]
fn levels_below_threshold_produce_nothing() {
    let sink = MemorySink::new();
    let logger = fixed_logger(&sink, Local::now());
    logger.set_level(Level::Error);

    logger.trace("foo").unwrap();
    logger.debug("foo").unwrap();
    logger.info("foo").unwrap();
    logger.warn("foo").unwrap();
    assert!(sink.is_empty());

    logger.error("foo").unwrap();
    logger.fatal("foo").unwrap();
    logger.panic("foo").unwrap();
    assert_eq!(sink.contents().lines().count(), 3);
}

#[test]
fn debug_threshold_drops_trace() {
    let sink = MemorySink::new();
    let logger = fixed_logger(&sink, Local::now());
    logger.set_level(Level::Debug);

    logger.trace("x").unwrap();
    assert!(sink.is_empty());
}

#[test]
fn fields_are_rendered_sorted() {
    let sink = MemorySink::new();
    let now = Local::now();
    let logger = fixed_logger(&sink, now);

    logger
        .with_field("b", 2)
        .with_fields([("a", "one")])
        .info("foo")
        .unwrap();

    let v = json!({
        "fields": { "a": "one", "b": 2 },
        "level": "info",
        "message": "foo",
        "name": "test",
        "time": now.to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    assert_eq!(sink.contents(), format!("{v}\n"));
}

#[test]
fn derived_handles_accumulate_fields() {
    let sink = MemorySink::new();
    let logger = fixed_logger(&sink, Local::now());

    let base = logger.with_field("request", 7);
    base.with_field("step", "parse").info("a").unwrap();
    base.info("b").unwrap();

    let lines: Vec<serde_json::Value> = sink
        .contents()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines[0]["fields"], json!({ "request": 7, "step": "parse" }));
    assert_eq!(lines[1]["fields"], json!({ "request": 7 }));
}

#[test]
fn unserializable_field_fails_the_call_only() {
    let sink = MemorySink::new();
    let logger = fixed_logger(&sink, Local::now());

    let err = logger.with_field("bad", Broken).info("x").unwrap_err();
    assert!(matches!(err, Error::Format(_)));
    assert!(sink.is_empty());

    assert_eq!(logger.level(), Level::Trace);
    logger.info("still works").unwrap();
    assert!(sink.contents().contains("still works"));
}

#[test]
fn sink_errors_are_returned() {
    let logger = Logger::builder().output(FailingWriter).build();
    let err = logger.info("x").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn set_output_swaps_sink() {
    let first = MemorySink::new();
    let second = MemorySink::new();
    let logger = fixed_logger(&first, Local::now());

    logger.info("one").unwrap();
    logger.set_output(second.clone());
    logger.info("two").unwrap();

    assert!(first.contents().contains("one"));
    assert!(!first.contents().contains("two"));
    assert!(second.contents().contains("two"));
}

#[test]
fn custom_formatter_and_reset() {
    let sink = MemorySink::new();
    let logger = fixed_logger(&sink, Local::now());

    logger.set_formatter(Some(Arc::new(level_and_message)));
    logger.warn("plain").unwrap();
    assert_eq!(sink.contents(), "warn plain\n");

    sink.clear();
    logger.set_formatter(None);
    logger.warn("json").unwrap();
    assert!(sink.contents().starts_with('{'));
}

#[test]
fn custom_time_format() {
    let sink = MemorySink::new();
    let now = Local::now();
    let logger = fixed_logger(&sink, now);
    logger.set_time_format(Some("%Y/%m/%d".to_string()));

    logger.info("x").unwrap();
    let v: serde_json::Value = serde_json::from_str(sink.contents().trim()).unwrap();
    assert_eq!(v["time"], now.format("%Y/%m/%d").to_string());
}

#[test]
fn now_fn_reset_uses_wall_clock() {
    let sink = MemorySink::new();
    let fixed = DateTime::parse_from_rfc3339("2001-02-03T04:05:06Z")
        .unwrap()
        .with_timezone(&Local);
    let logger = fixed_logger(&sink, fixed);
    logger.set_now_fn(None);

    logger.info("x").unwrap();
    let v: serde_json::Value = serde_json::from_str(sink.contents().trim()).unwrap();
    assert!(!v["time"].as_str().unwrap().starts_with("2001"));
}

#[test]
fn concurrent_logging_keeps_lines_whole() {
    let sink = MemorySink::new();
    let logger = Arc::new(fixed_logger(&sink, Local::now()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..100 {
                    logger.with_field("thread", t).info(format_args!("msg {i}")).unwrap();
                    if i == 50 {
                        logger.set_level(Level::Trace);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let contents = sink.contents();
    assert_eq!(contents.lines().count(), 800);
    for line in contents.lines() {
        let _: serde_json::Value = serde_json::from_str(line).unwrap();
    }
}
