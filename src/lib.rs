//! Decoder for TON externally-signed wallet transaction payloads.
//!
//! The entry point is [`decode::parse_transaction`]: given the root cell of
//! an already-deserialized payload (BoC deserialization is the caller's
//! concern), it peels the external-message envelope, reads the wallet
//! header and decodes every outgoing internal message into a structured,
//! serializable record.

pub mod decode;
pub mod error;
pub mod tvm;
pub mod utils;

pub use decode::{ParsedPayload, ParsedTransaction, parse_transaction};
pub use error::DecodeError;
