//! Manufacturer, device-type, and function-code descriptor tables.
//!
//! Grounded in `get_device_type()` and `get_function_code()` of the
//! reference implementation (§4.9/§4.10), plus the kept manufacturer
//! database (`manufacturer.rs`) contributed by the teacher repo.

pub mod manufacturer;

pub use manufacturer::{
    get_manufacturer_info, get_manufacturer_name, id_to_manufacturer, manufacturer_to_id,
    ManufacturerInfo,
};

/// Device/medium type from the long-header T-field (address byte 5 of the
/// original fixed header), per `get_device_type()` (§4.9).
pub fn device_type_description(device_type: u8) -> &'static str {
    match device_type {
        0x00 => "Other",
        0x01 => "Oil",
        0x02 => "Electricity",
        0x03 => "Gas",
        0x04 => "Heat (outlet)",
        0x05 => "Steam",
        0x06 => "Warm water (30-90°C)",
        0x07 => "Water",
        0x08 => "Heat cost allocator",
        0x09 => "Compressed air",
        0x0A => "Cooling load meter (outlet)",
        0x0B => "Cooling load meter (inlet)",
        0x0C => "Heat (inlet)",
        0x0D => "Heat/cooling load meter",
        0x0E => "Bus/system",
        0x0F => "Unknown",
        0x15 => "Hot water",
        0x16 => "Cold water",
        0x17 => "Dual water",
        0x18 => "Pressure",
        0x19 => "A/D converter",
        0x1A => "Smoke detector",
        0x1B => "Room sensor",
        0x1C => "Gas detector",
        0x1D..=0x1F => "Reserved for sensors",
        0x20 => "Breaker (electricity)",
        0x21 => "Valve (gas or water)",
        0x22..=0x24 => "Reserved for switching devices",
        0x25 => "Customer unit (display)",
        0x26 | 0x27 => "Reserved for customer units",
        0x28 => "Waste water",
        0x29 => "Garbage",
        0x2A => "Carbon dioxide",
        0x2B => "Environmental",
        0x2C..=0x2F => "Reserved",
        0x30 => "Radio converter (system side)",
        0x31 => "Radio converter (meter side)",
        0x32..=0x3F => "Reserved",
        _ => "Reserved",
    }
}

/// Function code from the control-field nibble (`control & 0x0F`), per
/// `get_function_code()` (§4.10).
pub fn function_code_description(control_low_nibble: u8) -> &'static str {
    match control_low_nibble & 0x0F {
        0x0 => "SND-NKE",
        0x3 => "SND-UD",
        0x4 => "SND-NR",
        0x6 => "SND-IR",
        0x7 => "ACC-NR",
        0x8 => "ACC-DMD",
        0xA => "REQ-UD1",
        0xB => "REQ-UD2",
        _ => "unknown function code",
    }
}
