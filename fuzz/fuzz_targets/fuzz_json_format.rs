#![no_main]
use chrono::Local;
use libfuzzer_sys::fuzz_target;
use rotolog::{Entity, Fields, Formatter, JsonFormatter, Level};

fuzz_target!(|data: &str| {
    // Split fuzz input into a remapped message key and the message itself
    let (key, message) = data.split_once('\n').unwrap_or(("msg", data));

    let fields: Fields = [(message, key)].into_iter().collect();
    let entity = Entity::new("fuzz", Level::Info, message, Local::now())
        .with_fields(&fields)
        .with_caller(key);

    for formatter in [
        JsonFormatter::default(),
        JsonFormatter::new([("message", key)], true).unwrap_or_default(),
    ] {
        let mut buf = Vec::new();
        // Output must always be exactly one JSON line
        if formatter.format(&entity, &mut buf).is_ok() {
            assert_eq!(buf.last(), Some(&b'\n'));
            assert!(serde_json::from_slice::<serde_json::Value>(&buf).is_ok());
        }
    }
});
