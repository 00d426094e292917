#![no_main]

use libfuzzer_sys::fuzz_target;
use timetree::{TimeUnit, TimerConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither parser may panic on arbitrary input
        let _ = TimerConfig::from_toml_str(input);
        let _ = input.parse::<TimeUnit>();
    }
});
