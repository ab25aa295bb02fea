#![no_main]
use d3tree::canonical::{canonicalize, to_canonical_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(original) = serde_json::from_str::<serde_json::Value>(s) {
            let once = canonicalize(&original);
            let twice = canonicalize(&once);
            let a = to_canonical_string(&original).unwrap();
            let b = serde_json::to_string(&twice).unwrap();
            if a != b {
                panic!("canonical form not idempotent!\nInput: {}\nOnce: {}\nTwice: {}", s, a, b);
            }
        }
    }
});
