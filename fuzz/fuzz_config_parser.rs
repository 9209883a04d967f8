//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Only panics matter; validation errors are expected.
        if let Ok(config) = testament_config::AppConfig::parse(s) {
            let _ = config.bot.sentinel_char();
            let _ = config.bot.command_prefix_char();
        }
    }
});
