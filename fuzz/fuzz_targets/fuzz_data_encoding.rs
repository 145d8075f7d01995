#![no_main]

use libfuzzer_sys::fuzz_target;
use wmbus_rs::payload::data_encoding::{decode_bcd, decode_float32_le, decode_signed_int_le};

fuzz_target!(|data: &[u8]| {
    let _ = decode_bcd(data);
    let _ = decode_signed_int_le(data);
    let _ = decode_float32_le(data);
});
