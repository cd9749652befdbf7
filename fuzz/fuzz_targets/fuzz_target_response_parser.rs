#![no_main]

use libfuzzer_sys::fuzz_target;
use redforge::transport::TargetResponse;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<TargetResponse>(data);
});
