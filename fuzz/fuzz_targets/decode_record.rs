#![no_main]

use codec::{
    decode_record_from_slice, encode_record_to_vec, ReferenceFrame, SimulationFrame,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(schema) = demo_schema::demo_schema() else {
        return;
    };
    let descriptor = &schema.components[usize::from(selector) % schema.components.len()];
    let reference = SimulationFrame::new(1_000);

    // Anything that decodes must re-encode to bytes that decode identically.
    if let Ok(record) = decode_record_from_slice(descriptor, reference, rest) {
        let bytes = encode_record_to_vec(descriptor, &record, ReferenceFrame::valid(reference))
            .expect("decoded record must re-encode");
        let again = decode_record_from_slice(descriptor, reference, &bytes)
            .expect("re-encoded record must decode");
        assert_eq!(again, record);
    }
});
