//! Domain layer: the payment identity, the BR Code building blocks
//! (text folding, TLV fields, CRC16) and the page configuration record.

pub mod config;
pub mod crc;
pub mod identity;
pub mod normalize;
pub mod ports;
pub mod tlv;
