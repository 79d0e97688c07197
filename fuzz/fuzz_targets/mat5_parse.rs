//! Fuzz target for MAT5 container parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the MAT reader, checking
//! for panics, crashes, or hangs.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use uniset::mat5::MatFile;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = MatFile::parse(data, Path::new("fuzz.mat"));
});
