#![no_main]

use libfuzzer_sys::fuzz_target;
use redforge_core::config::EvaluatorRequest;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(request) = serde_yaml::from_str::<EvaluatorRequest>(text) {
        let _ = redforge::config::validate_request(&request);
    }
});
