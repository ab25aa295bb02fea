#![no_main]
use d3tree::{NormalizeOptions, normalize_value};
use libfuzzer_sys::fuzz_target;

// Any JSON value either normalizes or fails cleanly; a payload always
// serializes.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(s) {
            // Bare strings would be read as file paths.
            if v.is_string() {
                return;
            }
            if let Ok(payload) = normalize_value(v, &NormalizeOptions::default()) {
                payload.to_json_string().unwrap();
            }
        }
    }
});
