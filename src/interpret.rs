//! The `interpret` facade (§5/§6): converts raw telegram bytes plus a
//! `Config` into a structured, serializable result.
//!
//! Grounded in `WMBusFrame.getValues()` of the reference implementation,
//! which assembles the same `{type, sensor, value}` triples from a parsed
//! frame's record list.

use serde::Serialize;

use crate::error::WMBusError;
use crate::payload::FunctionField;
use crate::util::hex;
use crate::wmbus::Frame;
use crate::Config;

/// One decoded data record, shaped for JSON output (§6).
#[derive(Debug, Clone, Serialize)]
pub struct DataRecordOutput {
    #[serde(rename = "type")]
    pub kind: FunctionField,
    pub sensor: String,
    pub value: Option<f64>,
}

/// The structured result of decoding one telegram (§6).
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    pub manufacturer: String,
    pub serial: String,
    pub data: Vec<DataRecordOutput>,
}

/// Decodes a hex-encoded telegram (`{ "data": "<hex>" }`, hex already
/// extracted by the caller) into a structured `Output`.
pub fn interpret_hex(hex_data: &str, config: &Config) -> Result<Output, WMBusError> {
    let bytes = hex::decode_hex(hex_data).map_err(|e| WMBusError::InvalidHex(e.to_string()))?;
    interpret(&bytes, config)
}

/// Decodes a raw telegram byte buffer into a structured `Output`.
pub fn interpret(bytes: &[u8], config: &Config) -> Result<Output, WMBusError> {
    let frame = Frame::parse(bytes, |device_id| config.keys.lookup(device_id))?;

    // Matches the original `getSerial()`, which formats with lowercase `%02x`.
    let serial = hex::encode_hex(&frame.device_id_natural());
    let data = frame
        .records
        .iter()
        .map(|record| DataRecordOutput {
            kind: record.header.function_field(),
            sensor: record.header.vif_description().to_string(),
            value: record.decoded.as_f64(),
        })
        .collect();

    Ok(Output {
        manufacturer: frame.manufacturer_code(),
        serial,
        data,
    })
}
