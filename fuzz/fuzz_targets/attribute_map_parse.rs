//! Fuzz target for attribute-map row parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 content to the attribute-map parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use uniset::readers::celeba::parse_attribute_map;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_attribute_map(content, Path::new("fuzz.txt"));
});
