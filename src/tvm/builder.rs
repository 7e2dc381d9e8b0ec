//! Builder for constructing cells.
//!
//! The decoder itself never builds cells; callers assembling payloads and
//! every test in this crate do. Encodings mirror what the reader side
//! expects: MSB-first bits, minimal-nibble coins, `addr_none$00` /
//! `addr_std$10` addresses.
//!
//! # Example
//!
//! ```rust
//! use tontx_rs::tvm::Builder;
//!
//! let mut builder = Builder::new();
//! builder.store_u32(0x12345678).unwrap();
//! builder.store_byte(0xFF).unwrap();
//! let cell = builder.build().unwrap();
//! assert_eq!(cell.bit_len(), 40);
//! ```

use crate::tvm::address::Address;
use crate::tvm::cell::{Cell, MAX_CELL_BITS, MAX_CELL_REFS};
use anyhow::{Result, bail};
use std::sync::Arc;

pub struct Builder {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
}

impl Builder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            bit_len: 0,
            references: Vec::new(),
        }
    }

    /// Returns the number of bits stored so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Stores bits from a byte slice, MSB-first
    pub fn store_bits(&mut self, bits: &[u8], bit_len: usize) -> Result<&mut Self> {
        if self.bit_len + bit_len > MAX_CELL_BITS {
            bail!(
                "Cannot store {} bits: would exceed maximum cell size",
                bit_len
            );
        }

        let required_bytes = (bit_len + 7) / 8;
        if bits.len() < required_bytes {
            bail!("Insufficient data for {} bits", bit_len);
        }

        for i in 0..bit_len {
            let bit = (bits[i / 8] >> (7 - (i % 8))) & 1;

            let target_byte_idx = self.bit_len / 8;
            let target_bit_idx = 7 - (self.bit_len % 8);

            if target_byte_idx >= self.data.len() {
                self.data.push(0);
            }

            if bit == 1 {
                self.data[target_byte_idx] |= 1 << target_bit_idx;
            }

            self.bit_len += 1;
        }

        Ok(self)
    }

    /// Stores a single bit
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self> {
        self.store_bits(&[if bit { 0x80 } else { 0x00 }], 1)
    }

    /// Stores a byte
    pub fn store_byte(&mut self, byte: u8) -> Result<&mut Self> {
        self.store_bits(&[byte], 8)
    }

    /// Stores multiple bytes
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.store_bits(bytes, bytes.len() * 8)
    }

    /// Stores a u32 value
    pub fn store_u32(&mut self, value: u32) -> Result<&mut Self> {
        self.store_bits(&value.to_be_bytes(), 32)
    }

    /// Stores a u64 value
    pub fn store_u64(&mut self, value: u64) -> Result<&mut Self> {
        self.store_bits(&value.to_be_bytes(), 64)
    }

    /// Stores the least significant `bits` of a u64, MSB-first
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self> {
        if bits > 64 {
            bail!("Cannot store more than 64 bits from u64");
        }

        let mut temp = vec![0u8; (bits + 7) / 8];
        for i in 0..bits {
            if (value & (1u64 << (bits - 1 - i))) != 0 {
                temp[i / 8] |= 1 << (7 - (i % 8));
            }
        }

        self.store_bits(&temp, bits)
    }

    /// Stores a signed integer with specific bit length (two's complement)
    pub fn store_int(&mut self, value: i64, bits: usize) -> Result<&mut Self> {
        if bits > 64 {
            bail!("Cannot store more than 64 bits");
        }

        let unsigned = if value < 0 && bits < 64 {
            let mask = (1u64 << bits) - 1;
            (value as u64) & mask
        } else {
            value as u64
        };

        self.store_uint(unsigned, bits)
    }

    /// Stores coins (VarUInteger 16): minimal byte length in a 4-bit nibble,
    /// then that many bytes of value
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self> {
        if amount == 0 {
            return self.store_uint(0, 4);
        }

        let byte_len = ((128 - amount.leading_zeros()) as usize + 7) / 8;
        if byte_len > 15 {
            bail!("Coins value too large");
        }

        self.store_uint(byte_len as u64, 4)?;

        let bytes = amount.to_be_bytes();
        self.store_bytes(&bytes[16 - byte_len..])?;

        Ok(self)
    }

    /// Stores a message address
    pub fn store_address(&mut self, address: Option<&Address>) -> Result<&mut Self> {
        match address {
            None => {
                // addr_none$00
                self.store_uint(0, 2)?;
            }
            Some(addr) => {
                // addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256
                self.store_uint(0b10, 2)?;
                self.store_bit(false)?; // no anycast
                self.store_int(addr.workchain as i64, 8)?;
                self.store_bytes(&addr.hash_part)?;
            }
        }
        Ok(self)
    }

    /// Stores a string as raw UTF-8 bytes
    pub fn store_string(&mut self, s: &str) -> Result<&mut Self> {
        self.store_bytes(s.as_bytes())
    }

    /// Adds a reference to another cell
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self> {
        if self.references.len() >= MAX_CELL_REFS {
            bail!(
                "Cannot add reference: maximum {} references allowed",
                MAX_CELL_REFS
            );
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Builds the cell
    pub fn build(self) -> Result<Arc<Cell>> {
        let mut cell = Cell::with_data(self.data, self.bit_len)?;

        for reference in self.references {
            cell.add_reference(reference)?;
        }

        Ok(Arc::new(cell))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
