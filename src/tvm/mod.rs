//! TVM data structures this crate decodes over:
//! - Cell: the immutable container node (bits + ordered child references)
//! - Slice: a bit cursor for sequentially reading one cell
//! - Builder: cell construction for callers and tests
//! - Address: TON address with raw and user-friendly renderings

pub mod address;
pub mod builder;
pub mod cell;
pub mod slice;

pub use address::Address;
pub use builder::Builder;
pub use cell::{Cell, MAX_CELL_BITS, MAX_CELL_REFS};
pub use slice::Slice;
