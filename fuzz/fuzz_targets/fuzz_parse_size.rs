#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any size string
    if let Some(bytes) = rotolog::parse_size(data) {
        let _ = rotolog::format_size(bytes);
    }
});
