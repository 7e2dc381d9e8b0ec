use thiserror::Error;

/// Failure modes of the bit-level decoder.
///
/// "Unknown opcode" is deliberately absent: it is a valid terminal
/// classification, not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("out of bits: requested {requested}, {available} available")]
    OutOfBits { requested: usize, available: usize },
    #[error("out of references: index {index}, {available} available")]
    OutOfRefs { index: usize, available: usize },
    #[error("unsupported address tag {tag:#04b}")]
    UnsupportedAddressTag { tag: u8 },
    #[error("unsupported state init encoding")]
    UnsupportedStateInitEncoding,
    #[error("message nesting exceeds depth limit {limit}")]
    DepthLimitExceeded { limit: usize },
}
