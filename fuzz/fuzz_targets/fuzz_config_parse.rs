#![no_main]
use libfuzzer_sys::fuzz_target;
use rotolog::Config;

fuzz_target!(|data: &str| {
    // Must not panic on any config content
    if let Ok(config) = Config::parse(data) {
        let _ = config.level();
        let _ = config.caller_levels();
        let _ = config.max_size_bytes();
        let _ = config.internal_level();
    }
});
