#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 6;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_mask();
            }
            1 => {
                let bits = (data[idx - 1] % 64).saturating_add(1);
                let _ = reader.read_bits(bits);
            }
            2 => {
                let bits = data[idx - 1] % 33;
                let _ = reader.read_mask_bits(bits);
            }
            3 => {
                let bits = (data[idx - 1] % 64).saturating_add(1);
                let _ = reader.read_integer_range(bits, i64::from(data[idx - 1]) - 128);
            }
            4 => {
                let bits = (data[idx - 1] % 64).saturating_add(1);
                let _ = reader.read_int(bits);
            }
            _ => {
                let _ = reader.read_float();
            }
        }
    }
    let _ = reader.only_padding_remains();
});
