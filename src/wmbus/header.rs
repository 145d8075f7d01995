//! Transport-layer header parsing and CI-byte classification.
//!
//! Grounded in `WMBusShortDataHeader`/`WMBusLongDataHeader`
//! (`wmbus_data_header.py`) and `WMBusFrame.is_without_tl()` /
//! `is_with_short_tl()` / `is_with_long_tl()` / `get_ci_detail()`
//! (`wmbus.py`) of the reference implementation. The long header reaches
//! the short header by composition (§9 design note), not inheritance.

use crate::error::WMBusError;

/// Accessibility window the sending device grants after a transmission
/// (§4.8, configuration byte 0 high nibble).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    None,
    TemporaryNoAccess,
    Limited,
    Unlimited,
}

/// The 4-byte short transport-layer header (prEN 13757-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortHeader {
    pub access_nr: u8,
    pub status: u8,
    /// Byte-swapped on parse: `configuration[0]` carries mode and access bits.
    pub configuration: [u8; 2],
}

impl ShortHeader {
    pub fn parse(arr: &[u8]) -> Result<Self, WMBusError> {
        if arr.len() < 4 {
            return Err(WMBusError::TruncatedHeader { need: 4, have: arr.len() });
        }
        Ok(ShortHeader {
            access_nr: arr[0],
            status: arr[1],
            configuration: [arr[3], arr[2]],
        })
    }

    pub fn encryption_mode(&self) -> u8 {
        self.configuration[0] & 0x0F
    }

    pub fn accessibility(&self) -> Accessibility {
        match self.configuration[0] & 0xC0 {
            0x00 => Accessibility::None,
            0x40 => Accessibility::TemporaryNoAccess,
            0x80 => Accessibility::Limited,
            _ => Accessibility::Unlimited,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.status & 0xC0 != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption_mode() != 0
    }
}

/// The 12-byte long transport-layer header: a `ShortHeader` plus the
/// identification, manufacturer, version, and device-type fields that
/// normally arrive via the link layer but take precedence when present here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHeader {
    pub identification: [u8; 4],
    pub manufacturer: [u8; 2],
    pub version: u8,
    pub device_type: u8,
    pub short: ShortHeader,
}

impl LongHeader {
    pub fn parse(arr: &[u8]) -> Result<Self, WMBusError> {
        if arr.len() < 12 {
            return Err(WMBusError::TruncatedHeader { need: 12, have: arr.len() });
        }
        Ok(LongHeader {
            identification: [arr[0], arr[1], arr[2], arr[3]],
            manufacturer: [arr[4], arr[5]],
            version: arr[6],
            device_type: arr[7],
            short: ShortHeader::parse(&arr[8..12])?,
        })
    }
}

/// Transport-layer header shape, chosen by the CI byte (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    None,
    Short(ShortHeader),
    Long(LongHeader),
}

impl HeaderVariant {
    pub fn short(&self) -> Option<&ShortHeader> {
        match self {
            HeaderVariant::None => None,
            HeaderVariant::Short(h) => Some(h),
            HeaderVariant::Long(h) => Some(&h.short),
        }
    }
}

const LONG_TL: [u8; 11] = [0x60, 0x64, 0x6B, 0x6F, 0x72, 0x73, 0x75, 0x7C, 0x7E, 0x80, 0x8B];
const SHORT_TL: [u8; 10] = [0x61, 0x65, 0x6A, 0x6E, 0x74, 0x7A, 0x7B, 0x7D, 0x7F, 0x8A];
const NO_TL: [u8; 4] = [0x69, 0x70, 0x78, 0x79];

/// Transport-layer shape a CI byte selects, before any bytes are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiShape {
    None,
    Short,
    Long,
    ManufacturerSpecific,
}

pub fn classify_ci(ci: u8) -> Result<CiShape, WMBusError> {
    if LONG_TL.contains(&ci) {
        Ok(CiShape::Long)
    } else if SHORT_TL.contains(&ci) {
        Ok(CiShape::Short)
    } else if NO_TL.contains(&ci) {
        Ok(CiShape::None)
    } else if (0xA0..=0xB7).contains(&ci) {
        Ok(CiShape::ManufacturerSpecific)
    } else {
        Err(WMBusError::UnknownCi(ci))
    }
}

/// Human-readable label for a CI byte per prEN 13757-4, matching
/// `get_ci_detail()` in the reference implementation.
pub fn ci_detail(ci: u8) -> Option<&'static str> {
    if (0xA0..=0xB7).contains(&ci) {
        return Some("Manufacturer specific Application Layer");
    }
    Some(match ci {
        0x60 => "COSEM Data sent by the Readout device to the meter with long Transport Layer",
        0x61 => "COSEM Data sent by the Readout device to the meter with short Transport Layer",
        0x64 => "Reserved for OBIS-based Data sent by the Readout device to the meter with long Transport Layer",
        0x65 => "Reserved for OBIS-based Data sent by the Readout device to the meter with short Transport Layer",
        0x69 => "EN 13757-3 Application Layer with Format frame and no Transport Layer",
        0x6A => "EN 13757-3 Application Layer with Format frame and with short Transport Layer",
        0x6B => "EN 13757-3 Application Layer with Format frame and with long Transport Layer",
        0x6C => "Clock synchronisation (absolute)",
        0x6D => "Clock synchronisation (relative)",
        0x6E => "Application error from device with short Transport Layer",
        0x6F => "Application error from device with long Transport Layer",
        0x70 => "Application error from device without Transport Layer",
        0x71 => "Reserved for Alarm Report",
        0x72 => "EN 13757-3 Application Layer with long Transport Layer",
        0x73 => "EN 13757-3 Application Layer with Compact frame and long Transport Layer",
        0x74 => "Alarm from device with short Transport Layer",
        0x75 => "Alarm from device with long Transport Layer",
        0x78 => "EN 13757-3 Application Layer without Transport Layer (to be defined)",
        0x79 => "EN 13757-3 Application Layer with Compact frame and no header",
        0x7A => "EN 13757-3 Application Layer with short Transport Layer",
        0x7B => "EN 13757-3 Application Layer with Compact frame and short header",
        0x7C => "COSEM Application Layer with long Transport Layer",
        0x7D => "COSEM Application Layer with short Transport Layer",
        0x7E => "Reserved for OBIS-based Application Layer with long Transport Layer",
        0x7F => "Reserved for OBIS-based Application Layer with short Transport Layer",
        0x80 => "EN 13757-3 Transport Layer (long) from other device to the meter",
        0x81 => "Network Layer data",
        0x82 => "For future use",
        0x83 => "Network Management application",
        0x8A => "EN 13757-3 Transport Layer (short) from the meter to the other device",
        0x8B => "EN 13757-3 Transport Layer (long) from the meter to the other device",
        0x8C => "Extended Link Layer I (2 Byte)",
        0x8D => "Extended Link Layer II (8 Byte)",
        _ => return None,
    })
}
