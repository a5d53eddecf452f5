//! Fuzz target for annotation JSON parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 documents to the annotation parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use cropset::annot::fuzz_parse_annotations;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(document) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_annotations(document);
});
