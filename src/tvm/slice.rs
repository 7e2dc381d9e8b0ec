//! Slice: a bit cursor over one cell.
//!
//! A slice owns a single mutable bit offset into exactly one cell and never
//! touches any other state. Child cells are addressed by absolute index; the
//! message grammar this crate decodes always names "the first reference", so
//! there is no reference cursor to keep in sync.
//!
//! Reading past the end of the payload is a hard [`DecodeError::OutOfBits`],
//! never a short read.

use crate::error::DecodeError;
use crate::tvm::address::Address;
use crate::tvm::cell::Cell;
use num_bigint::BigUint;
use std::sync::Arc;

/// Address tag `addr_none$00`
const ADDR_TAG_NONE: u8 = 0b00;
/// Address tag `addr_std$10`
const ADDR_TAG_STD: u8 = 0b10;

#[derive(Debug, Clone)]
pub struct Slice {
    /// The cell being read
    cell: Arc<Cell>,
    /// Current bit position in the cell
    bit_pos: usize,
}

impl Slice {
    /// Creates a new slice over a cell, positioned at bit 0
    pub fn new(cell: Arc<Cell>) -> Self {
        Self { cell, bit_pos: 0 }
    }

    /// Returns the number of remaining bits
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len().saturating_sub(self.bit_pos)
    }

    /// Gets the current bit position
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Gets the underlying cell
    pub fn cell(&self) -> &Arc<Cell> {
        &self.cell
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), DecodeError> {
        let available = self.remaining_bits();
        if requested > available {
            return Err(DecodeError::OutOfBits {
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Loads a single bit
    pub fn load_bit(&mut self) -> Result<bool, DecodeError> {
        self.ensure_bits(1)?;

        let byte_idx = self.bit_pos / 8;
        let bit_idx = 7 - (self.bit_pos % 8);
        let bit = (self.cell.data()[byte_idx] >> bit_idx) & 1;
        self.bit_pos += 1;

        Ok(bit == 1)
    }

    /// Loads `n` bits into a byte vector, MSB-first from byte 0
    pub fn load_bits(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.ensure_bits(n)?;

        let mut result = vec![0u8; (n + 7) / 8];
        for i in 0..n {
            if self.load_bit()? {
                result[i / 8] |= 1 << (7 - (i % 8));
            }
        }

        Ok(result)
    }

    /// Loads a byte (8 bits)
    pub fn load_byte(&mut self) -> Result<u8, DecodeError> {
        let bits = self.load_bits(8)?;
        Ok(bits[0])
    }

    /// Loads multiple bytes
    pub fn load_bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.load_bits(n * 8)
    }

    /// Loads a u32 value (32 bits, big-endian)
    pub fn load_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.load_bits(32)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Loads a u64 value (64 bits, big-endian)
    pub fn load_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.load_bits(64)?;
        Ok(u64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Loads an unsigned integer of up to 64 bits
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, DecodeError> {
        debug_assert!(bits <= 64);

        if bits == 0 {
            return Ok(0);
        }

        let bytes = self.load_bits(bits)?;
        let mut result = 0u64;
        for &byte in &bytes {
            result = (result << 8) | (byte as u64);
        }

        // load_bits packs from the MSB of byte 0, so a partial last byte
        // leaves the value shifted left
        let extra_bits = (bytes.len() * 8) - bits;
        Ok(result >> extra_bits)
    }

    /// Loads a signed integer of up to 64 bits (two's complement)
    pub fn load_int(&mut self, bits: usize) -> Result<i64, DecodeError> {
        debug_assert!(0 < bits && bits <= 64);

        let unsigned = self.load_uint(bits)?;

        let sign_bit = 1u64 << (bits - 1);
        if unsigned & sign_bit != 0 {
            let mask = if bits == 64 { 0 } else { !0u64 << bits };
            Ok((unsigned | mask) as i64)
        } else {
            Ok(unsigned as i64)
        }
    }

    /// Loads an unsigned integer of arbitrary width
    ///
    /// Fixed-width fields wider than 64 bits (address hashes are 256) go
    /// through here.
    pub fn load_biguint(&mut self, bits: usize) -> Result<BigUint, DecodeError> {
        if bits == 0 {
            return Ok(BigUint::from(0u8));
        }

        let bytes = self.load_bits(bits)?;
        let mut value = BigUint::from_bytes_be(&bytes);

        let extra_bits = (bytes.len() * 8) - bits;
        if extra_bits > 0 {
            value >>= extra_bits;
        }

        Ok(value)
    }

    /// Loads coins (VarUInteger 16)
    ///
    /// A 4-bit nibble encodes the byte length of the value; length 0 is the
    /// value 0 and consumes nothing further. 15 bytes maximum, so u128
    /// always fits.
    pub fn load_coins(&mut self) -> Result<u128, DecodeError> {
        let len = self.load_uint(4)? as usize;
        if len == 0 {
            return Ok(0);
        }

        let bytes = self.load_bytes(len)?;
        let mut result = 0u128;
        for &byte in &bytes {
            result = (result << 8) | (byte as u128);
        }

        Ok(result)
    }

    /// Loads a message address
    ///
    /// `addr_none$00` yields `None`; `addr_std$10` carries one anycast bit
    /// (accepted, not validated), an int8 workchain and a 256-bit hash.
    /// Workchain 0 with hash 0 is the legacy null address and also yields
    /// `None`. Every other tag (`addr_extern$01`, `addr_var$11`) is
    /// unsupported.
    pub fn load_address(&mut self) -> Result<Option<Address>, DecodeError> {
        let tag = self.load_uint(2)? as u8;
        match tag {
            ADDR_TAG_NONE => Ok(None),
            ADDR_TAG_STD => {
                let _anycast = self.load_bit()?;
                let workchain = self.load_int(8)? as i8;
                let hash = self.load_biguint(256)?;

                if workchain == 0 && hash == BigUint::from(0u8) {
                    return Ok(None);
                }

                let bytes = hash.to_bytes_be();
                let mut hash_part = [0u8; 32];
                hash_part[32 - bytes.len()..].copy_from_slice(&bytes);

                Ok(Some(Address::new(workchain, hash_part)))
            }
            tag => Err(DecodeError::UnsupportedAddressTag { tag }),
        }
    }

    /// Gets a child cell by absolute index
    pub fn reference(&self, index: usize) -> Result<Arc<Cell>, DecodeError> {
        self.cell
            .reference(index)
            .cloned()
            .ok_or(DecodeError::OutOfRefs {
                index,
                available: self.cell.reference_count(),
            })
    }

    /// Skips a number of bits
    pub fn skip_bits(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure_bits(n)?;
        self.bit_pos += n;
        Ok(())
    }
}

impl From<Arc<Cell>> for Slice {
    fn from(cell: Arc<Cell>) -> Self {
        Self::new(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvm::builder::Builder;

    #[test]
    fn test_slice_load_bits() {
        let mut builder = Builder::new();
        builder.store_byte(0xFF).unwrap();
        builder.store_byte(0x00).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.remaining_bits(), 16);

        assert_eq!(slice.load_byte().unwrap(), 0xFF);
        assert_eq!(slice.load_byte().unwrap(), 0x00);
        assert_eq!(slice.remaining_bits(), 0);
    }

    #[test]
    fn test_slice_load_uint() {
        let mut builder = Builder::new();
        builder.store_u32(0x12345678).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_u32().unwrap(), 0x12345678);
    }

    #[test]
    fn test_slice_load_uint_partial_width() {
        let mut builder = Builder::new();
        builder.store_uint(0b101, 3).unwrap();
        builder.store_uint(0x7FF, 11).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_uint(3).unwrap(), 0b101);
        assert_eq!(slice.load_uint(11).unwrap(), 0x7FF);
    }

    #[test]
    fn test_slice_load_int_sign_extension() {
        let mut builder = Builder::new();
        builder.store_int(-1, 8).unwrap();
        builder.store_int(-128, 8).unwrap();
        builder.store_int(127, 8).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_int(8).unwrap(), -1);
        assert_eq!(slice.load_int(8).unwrap(), -128);
        assert_eq!(slice.load_int(8).unwrap(), 127);
    }

    #[test]
    fn test_slice_load_biguint_wide() {
        let mut builder = Builder::new();
        builder.store_bytes(&[0xAB; 32]).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        let value = slice.load_biguint(256).unwrap();
        assert_eq!(value, BigUint::from_bytes_be(&[0xAB; 32]));
        assert_eq!(slice.remaining_bits(), 0);
    }

    #[test]
    fn test_slice_out_of_bits_is_hard_failure() {
        let mut builder = Builder::new();
        builder.store_uint(0xFFFF, 31).unwrap();
        let cell = builder.build().unwrap();

        // One bit short of a u32: must fail, never yield a truncated value.
        let mut slice = Slice::new(cell);
        let err = slice.load_u32().unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfBits {
                requested: 32,
                available: 31
            }
        );
    }

    #[test]
    fn test_slice_coins_zero_consumes_only_nibble() {
        let mut builder = Builder::new();
        builder.store_coins(0).unwrap();
        builder.store_byte(0xAA).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_coins().unwrap(), 0);
        assert_eq!(slice.bit_position(), 4);
        assert_eq!(slice.load_byte().unwrap(), 0xAA);
    }

    #[test]
    fn test_slice_coins_roundtrip() {
        for value in [1u128, 255, 256, 1_000_000_000, u64::MAX as u128 + 1] {
            let mut builder = Builder::new();
            builder.store_coins(value).unwrap();
            let cell = builder.build().unwrap();

            let mut slice = Slice::new(cell);
            assert_eq!(slice.load_coins().unwrap(), value);
            assert_eq!(slice.remaining_bits(), 0);
        }
    }

    #[test]
    fn test_slice_coins_truncated() {
        // Nibble promises 2 bytes, only 1 follows.
        let mut builder = Builder::new();
        builder.store_uint(2, 4).unwrap();
        builder.store_byte(0x01).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert!(matches!(
            slice.load_coins(),
            Err(DecodeError::OutOfBits { .. })
        ));
    }

    #[test]
    fn test_slice_address_none() {
        let mut builder = Builder::new();
        builder.store_address(None).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_address().unwrap(), None);
        assert_eq!(slice.bit_position(), 2);
    }

    #[test]
    fn test_slice_address_std() {
        let addr = Address::new(-1, [0x42; 32]);
        let mut builder = Builder::new();
        builder.store_address(Some(&addr)).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_address().unwrap(), Some(addr));
        assert_eq!(slice.bit_position(), 267);
    }

    #[test]
    fn test_slice_address_legacy_null_normalizes_to_none() {
        let addr = Address::new(0, [0u8; 32]);
        let mut builder = Builder::new();
        builder.store_address(Some(&addr)).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_address().unwrap(), None);
        // The full addr_std layout is still consumed.
        assert_eq!(slice.bit_position(), 267);
    }

    #[test]
    fn test_slice_address_zero_hash_nonzero_workchain_kept() {
        let addr = Address::new(-1, [0u8; 32]);
        let mut builder = Builder::new();
        builder.store_address(Some(&addr)).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        assert_eq!(slice.load_address().unwrap(), Some(addr));
    }

    #[test]
    fn test_slice_address_unsupported_tags() {
        for tag in [0b01u64, 0b11] {
            let mut builder = Builder::new();
            builder.store_uint(tag, 2).unwrap();
            let cell = builder.build().unwrap();

            let mut slice = Slice::new(cell);
            assert_eq!(
                slice.load_address().unwrap_err(),
                DecodeError::UnsupportedAddressTag { tag: tag as u8 }
            );
        }
    }

    #[test]
    fn test_slice_reference_by_index() {
        let child = Builder::new().build().unwrap();
        let mut builder = Builder::new();
        builder.store_ref(child.clone()).unwrap();
        let cell = builder.build().unwrap();

        let slice = Slice::new(cell);
        assert_eq!(slice.reference(0).unwrap(), child);
        assert_eq!(
            slice.reference(1).unwrap_err(),
            DecodeError::OutOfRefs {
                index: 1,
                available: 1
            }
        );
    }

    #[test]
    fn test_slice_skip() {
        let mut builder = Builder::new();
        builder.store_u32(0x12345678).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = Slice::new(cell);
        slice.skip_bits(16).unwrap();
        assert_eq!(slice.load_uint(16).unwrap(), 0x5678);
        assert!(matches!(
            slice.skip_bits(1),
            Err(DecodeError::OutOfBits { .. })
        ));
    }
}
