//! Cell: the immutable tree node of the TON container format.
//!
//! A cell carries up to 1023 bits of payload and up to 4 ordered references
//! to child cells. This crate never produces cells from wire bytes (BoC
//! deserialization is an external collaborator); it only reads them, and
//! builds them in tests and calling code via [`Builder`](crate::tvm::Builder).

use anyhow::{Result, bail};
use std::sync::Arc;

/// Maximum number of bits a cell can store
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of references a cell can have
pub const MAX_CELL_REFS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell payload, MSB-first within each byte
    data: Vec<u8>,
    /// Number of payload bits (not necessarily a multiple of 8)
    bit_len: usize,
    /// Ordered child references
    references: Vec<Arc<Cell>>,
}

impl Cell {
    /// Creates a new empty cell
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            bit_len: 0,
            references: Vec::new(),
        }
    }

    /// Creates a cell with the given data and bit length
    pub fn with_data(data: Vec<u8>, bit_len: usize) -> Result<Self> {
        if bit_len > MAX_CELL_BITS {
            bail!(
                "Cell bit length {} exceeds maximum {}",
                bit_len,
                MAX_CELL_BITS
            );
        }

        let required_bytes = (bit_len + 7) / 8;
        if data.len() < required_bytes {
            bail!(
                "Data length {} is insufficient for {} bits",
                data.len(),
                bit_len
            );
        }

        Ok(Self {
            data,
            bit_len,
            references: Vec::new(),
        })
    }

    /// Adds a reference to another cell
    pub fn add_reference(&mut self, cell: Arc<Cell>) -> Result<()> {
        if self.references.len() >= MAX_CELL_REFS {
            bail!(
                "Cell already has maximum number of references ({})",
                MAX_CELL_REFS
            );
        }
        self.references.push(cell);
        Ok(())
    }

    /// Returns the cell's data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of bits in the cell
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns the cell's references
    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    /// Returns the number of references
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Gets a reference by index
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.references.get(index)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}
