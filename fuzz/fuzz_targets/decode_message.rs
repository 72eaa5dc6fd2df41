#![no_main]

use codec::{decode_message, CodecLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(schema) = demo_schema::demo_schema() else {
        return;
    };
    let _ = decode_message(&schema, data, &CodecLimits::for_testing());
});
