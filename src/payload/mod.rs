//! Decoding of a telegram's data records: DIF/VIF chains, the primitive
//! value encodings they select, and the VIF description tables.

pub mod data_encoding;
pub mod record;
pub mod vif_maps;

pub use record::{DataRecord, DataType, FunctionField, RecordHeader, Value};
