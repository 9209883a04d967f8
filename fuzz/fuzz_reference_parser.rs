//! Fuzz target for reference scanning and validation.
//!
//! Run with: cargo +nightly fuzz run fuzz_reference_parser
//!
//! Any accepted reference must lie inside its chapter.

#![no_main]

use libfuzzer_sys::fuzz_target;
use testament_core::ReferenceRules;
use testament_core::verse_counts;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(reference) = ReferenceRules::default().parse(s) else {
        return;
    };

    let max = verse_counts::max_verse(reference.sura()).unwrap_or(0);
    let last = reference.last_verse().unwrap_or(reference.first_verse());
    assert!(reference.first_verse() <= last);
    assert!(last <= max);
});
