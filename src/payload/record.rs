//! DIF/VIF chain parsing, record-length resolution, and value decoding.
//!
//! Grounded in `WMBusDataRecordHeader`/`WMBusDataRecord` of the reference
//! implementation: DIF special-function detection, extension-bit chaining
//! for both DIF and VIF, the fixed-length table keyed by the DIF data-type
//! nibble, and the value decode dispatch (§4.2-§4.4).

use serde::Serialize;

use crate::constants::{DIF_EXTENSION_BIT, MAX_CHAIN_LEN, VIF_EXTENSION_BIT};
use crate::error::WMBusError;
use crate::payload::data_encoding::{decode_bcd, decode_float32_le, decode_signed_int_le};
use crate::payload::vif_maps::{
    vif_extension_7b, vif_extension_selector_label, vif_primary_description,
};

/// DIF byte values that signal a special-function record: no value bytes
/// follow, the DIF byte stands alone.
const DIF_SPECIAL_FUNCTION_SINGLE: [u8; 4] = [0x0F, 0x1F, 0x2F, 0x7F];

fn is_special_function_dif(dif: u8) -> bool {
    DIF_SPECIAL_FUNCTION_SINGLE.contains(&dif) || (0x3F..=0x6F).contains(&dif)
}

/// Classification of a record's data-type nibble (`dif[0] & 0x0F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Fixed-length record; length comes from the static table.
    Fixed,
    /// Variable length: the byte after the header carries the length.
    Variable,
    /// Selection-for-readout; carries no value.
    SelectionForReadout,
    /// Special function; carries no value.
    SpecialFunction,
}

fn classify_data_type(dif0: u8) -> DataType {
    match dif0 & 0x0F {
        0x8 => DataType::SelectionForReadout,
        0xD => DataType::Variable,
        0xF => DataType::SpecialFunction,
        _ => DataType::Fixed,
    }
}

/// Fixed-length table keyed by `dif[0] & 0x0F` (§4.2). `0xD` (variable) and
/// `0xF` (special function) are not fixed lengths and are handled
/// separately by the caller.
fn fixed_data_len(nibble: u8) -> Option<usize> {
    match nibble {
        0x0 => Some(0),
        0x1 => Some(1),
        0x2 => Some(2),
        0x3 => Some(3),
        0x4 => Some(4),
        0x5 => Some(4),
        0x6 => Some(6),
        0x7 => Some(8),
        0x9 => Some(1),
        0xA => Some(2),
        0xB => Some(3),
        0xC => Some(4),
        0xE => Some(6),
        _ => None,
    }
}

/// Function field from `dif[0] & 0x30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionField {
    #[serde(rename = "Instantaneous value")]
    Instantaneous,
    #[serde(rename = "Maximum value")]
    Maximum,
    #[serde(rename = "Minimum value")]
    Minimum,
    #[serde(rename = "Value during error state")]
    ErrorState,
}

impl FunctionField {
    fn from_dif0(dif0: u8) -> Self {
        match dif0 & 0x30 {
            0x00 => FunctionField::Instantaneous,
            0x10 => FunctionField::Maximum,
            0x20 => FunctionField::Minimum,
            _ => FunctionField::ErrorState,
        }
    }
}

/// A decoded record value, tagged by the shape the DIF nibble selected.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    I64(i64),
    F32(f32),
    Bcd(u64),
}

impl Value {
    /// Numeric projection used for JSON output (`null` for `Value::None`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::None => None,
            Value::I64(v) => Some(*v as f64),
            Value::F32(v) => Some(*v as f64),
            Value::Bcd(v) => Some(*v as f64),
        }
    }
}

/// `{ dif_chain, vif_chain }`: the chained DIF/DIFE and VIF/VIFE bytes that
/// precede a record's value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHeader {
    pub dif_chain: Vec<u8>,
    pub vif_chain: Vec<u8>,
}

impl RecordHeader {
    /// Parse the DIF chain, then the VIF chain, from the front of `input`.
    /// Returns the header plus the number of bytes consumed.
    pub fn parse(input: &[u8]) -> Result<(Self, usize), WMBusError> {
        let (dif_chain, dif_len) = parse_dif_chain(input)?;
        let (vif_chain, vif_len) = parse_vif_chain(&input[dif_len..])?;

        Ok((
            RecordHeader {
                dif_chain,
                vif_chain,
            },
            dif_len + vif_len,
        ))
    }

    pub fn data_type(&self) -> DataType {
        classify_data_type(self.dif_chain[0])
    }

    pub fn function_field(&self) -> FunctionField {
        FunctionField::from_dif0(self.dif_chain[0])
    }

    /// Human-readable VIF description, resolving extension-table selectors
    /// and the one implemented second-level table (0x7B -> relative
    /// humidity). Returns a fallback string rather than erroring: an
    /// unrecognized VIF should not abort decoding of an otherwise-valid
    /// telegram.
    pub fn vif_description(&self) -> &'static str {
        let vif0 = self.vif_chain[0];
        if vif0 & VIF_EXTENSION_BIT != 0 {
            if vif0 == 0xFB && self.vif_chain.len() > 1 {
                return vif_extension_7b(self.vif_chain[1]);
            }
            return vif_extension_selector_label(vif0);
        }
        vif_primary_description(vif0 & 0x7F).unwrap_or("VIF not found")
    }
}

/// Parses the DIF/DIFE chain from the front of `arr` (§4.2).
fn parse_dif_chain(arr: &[u8]) -> Result<(Vec<u8>, usize), WMBusError> {
    if arr.is_empty() {
        return Err(WMBusError::InvalidDifChain("empty input".into()));
    }
    let dif0 = arr[0];
    if is_special_function_dif(dif0) {
        return Ok((vec![dif0], 1));
    }

    let mut chain = Vec::new();
    let mut i = 0;
    loop {
        if i >= arr.len() {
            return Err(WMBusError::InvalidDifChain(
                "chain runs past end of input".into(),
            ));
        }
        let b = arr[i];
        chain.push(b);
        i += 1;
        if chain.len() > MAX_CHAIN_LEN {
            return Err(WMBusError::InvalidDifChain(format!(
                "chain exceeds {MAX_CHAIN_LEN} bytes"
            )));
        }
        if b & DIF_EXTENSION_BIT == 0 {
            break;
        }
    }
    Ok((chain, i))
}

/// Parses the VIF/VIFE chain from the front of `arr` (§4.2). Unlike DIF
/// parsing there is no special-function short-circuit: VIF chaining is
/// purely extension-bit driven.
fn parse_vif_chain(arr: &[u8]) -> Result<(Vec<u8>, usize), WMBusError> {
    if arr.is_empty() {
        return Err(WMBusError::InvalidVifChain("empty input".into()));
    }
    let mut chain = Vec::new();
    let mut i = 0;
    loop {
        if i >= arr.len() {
            return Err(WMBusError::InvalidVifChain(
                "chain runs past end of input".into(),
            ));
        }
        let b = arr[i];
        chain.push(b);
        i += 1;
        if chain.len() > MAX_CHAIN_LEN {
            return Err(WMBusError::InvalidVifChain(format!(
                "chain exceeds {MAX_CHAIN_LEN} bytes"
            )));
        }
        if b & VIF_EXTENSION_BIT == 0 {
            break;
        }
    }
    Ok((chain, i))
}

/// A fully decoded data record: header, raw value bytes, and the decoded
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    pub header: RecordHeader,
    pub value_bytes: Vec<u8>,
    pub decoded: Value,
}

impl DataRecord {
    /// Parses one record from the front of `input`. Returns the record and
    /// the number of bytes consumed (`|dif_chain| + |vif_chain| + (1 if
    /// variable) + |value|`), so the caller can advance past it (§4.3).
    pub fn parse(input: &[u8]) -> Result<(Self, usize), WMBusError> {
        let (header, header_len) = RecordHeader::parse(input)?;
        let dif0 = header.dif_chain[0];
        let data_type = header.data_type();

        let (value_len, length_byte) = match data_type {
            DataType::Variable => {
                let declared = *input.get(header_len).ok_or(WMBusError::VariableLengthOverflow {
                    declared: 0,
                    remaining: 0,
                })? as usize;
                (declared, 1)
            }
            DataType::Fixed => {
                let len = fixed_data_len(dif0 & 0x0F)
                    .ok_or(WMBusError::UnsupportedDataField(dif0 & 0x0F))?;
                (len, 0)
            }
            DataType::SelectionForReadout | DataType::SpecialFunction => (0, 0),
        };

        let value_start = header_len + length_byte;
        let value_end = value_start + value_len;
        if value_end > input.len() {
            return Err(WMBusError::VariableLengthOverflow {
                declared: value_len,
                remaining: input.len().saturating_sub(value_start),
            });
        }
        let value_bytes = input[value_start..value_end].to_vec();
        let decoded = decode_value(dif0, &value_bytes)?;

        Ok((
            DataRecord {
                header,
                value_bytes,
                decoded,
            },
            value_end,
        ))
    }
}

/// Value decode dispatch keyed by `dif[0] & 0x0F` (§4.4). The nibble-0x1
/// case reads an unsigned byte, not a signed one, by deliberate preservation
/// of the reference implementation's asymmetry (see DESIGN.md Open
/// Questions).
fn decode_value(dif0: u8, value: &[u8]) -> Result<Value, WMBusError> {
    match dif0 & 0x0F {
        0x0 => Ok(Value::None),
        0x1 => Ok(Value::I64(value[0] as i64)),
        0x2 => Ok(Value::I64(decode_signed_int_le(value))),
        0x3 => Ok(Value::I64(decode_signed_int_le(value))),
        0x4 => Ok(Value::I64(decode_signed_int_le(value))),
        0x5 => Ok(Value::F32(decode_float32_le(value)?)),
        0x6 => Ok(Value::I64(decode_signed_int_le(value))),
        0x7 => Ok(Value::I64(decode_signed_int_le(value))),
        0x8 => Ok(Value::None),
        0x9 => Ok(Value::Bcd(decode_bcd(value))),
        0xA => Ok(Value::Bcd(decode_bcd(value))),
        0xB => Ok(Value::Bcd(decode_bcd(value))),
        0xC => Ok(Value::Bcd(decode_bcd(value))),
        0xD => Ok(Value::None),
        0xE => Ok(Value::Bcd(decode_bcd(value))),
        0xF => Ok(Value::None),
        n => Err(WMBusError::UnsupportedDataField(n)),
    }
}
