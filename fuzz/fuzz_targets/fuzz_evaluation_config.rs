#![no_main]

use libfuzzer_sys::fuzz_target;
use redforge_core::config::EvaluationConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = serde_json::from_value::<EvaluationConfig>(value);
    }
});
