#![no_main]

use libfuzzer_sys::fuzz_target;
use wmbus_rs::{Config, Frame};

fuzz_target!(|data: &[u8]| {
    let config = Config::with_demo_keys();
    let _ = Frame::parse(data, |device_id| config.keys.lookup(device_id));
});
