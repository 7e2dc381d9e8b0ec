//! TON address: workchain plus 256-bit account hash.
//!
//! The decoder only ever renders addresses, so parsing from strings is not
//! carried; the raw `workchain:hash` form and the two CRC16-checked
//! user-friendly base64 forms are.

use base64::Engine;
use std::fmt;

/// User-friendly tag byte for bounceable addresses
const TAG_BOUNCEABLE: u8 = 0x11;
/// User-friendly tag byte for non-bounceable addresses
const TAG_NON_BOUNCEABLE: u8 = 0x51;

/// CRC16-CCITT over the tag, workchain and hash bytes
fn crc16(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc.to_be_bytes()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Workchain ID (-1 for masterchain, 0 for basechain)
    pub workchain: i8,
    /// 32-byte hash part of the address
    pub hash_part: [u8; 32],
}

impl Address {
    pub fn new(workchain: i8, hash_part: [u8; 32]) -> Self {
        Self {
            workchain,
            hash_part,
        }
    }

    /// Raw format: `workchain:hash`
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash_part))
    }

    /// User-friendly base64url format (tag, workchain, hash, CRC16)
    pub fn to_base64(&self, bounceable: bool) -> String {
        let tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };

        let mut data = Vec::with_capacity(36);
        data.push(tag);
        data.push(self.workchain as u8);
        data.extend_from_slice(&self.hash_part);

        let crc = crc16(&data);
        data.extend_from_slice(&crc);

        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&data)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64(true))
    }
}
