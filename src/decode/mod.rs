//! Decoding of externally-signed wallet transaction payloads.
//!
//! [`parse_transaction`] peels the external-message envelope off the root
//! cell, reads the wallet header and decodes every outgoing internal message.
//! Any internal [`DecodeError`] surfaces as a single opaque parse failure.

pub mod body;
pub mod message;
pub mod model;

pub use body::{Opcode, decode_body};
pub use message::{
    MAX_MESSAGE_DEPTH, read_body, read_common_message, read_message_header, read_state_init,
    read_wallet_header,
};
pub use model::{
    DecodedAddress, DecodedBody, DecodedCommonMessage, DecodedMessageHeader, ParsedPayload,
    ParsedTransaction, StateInit, WalletHeader,
};

use crate::error::DecodeError;
use crate::tvm::address::Address;
use crate::tvm::cell::Cell;
use crate::tvm::slice::Slice;
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Address tag `addr_std$10` at the envelope's destination slot
const ENVELOPE_ADDR_TAG_STD: u8 = 0b10;

/// Parses one wallet transaction payload from its root cell.
///
/// The caller is responsible for materializing the cell tree (BoC
/// deserialization). Failure causes are deliberately not distinguishable in
/// the returned error.
pub fn parse_transaction(root: &Arc<Cell>) -> anyhow::Result<ParsedPayload> {
    parse_payload(root).map_err(|err| anyhow!("failed to parse transaction: {err}"))
}

fn parse_payload(root: &Arc<Cell>) -> Result<ParsedPayload, DecodeError> {
    let mut slice = Slice::new(root.clone());

    // ext_in_msg_info$10, the only supported outer message type, unvalidated
    slice.skip_bits(2)?;
    // source address, assumed addr_none$00, unvalidated
    slice.skip_bits(2)?;

    // Destination: consumed positionally; kept in the result. No anycast bit
    // at this slot.
    let dest_tag = slice.load_uint(2)? as u8;
    let destination = if dest_tag == ENVELOPE_ADDR_TAG_STD {
        let workchain = slice.load_int(8)? as i8;
        let hash = slice.load_biguint(256)?;

        let bytes = hash.to_bytes_be();
        let mut hash_part = [0u8; 32];
        hash_part[32 - bytes.len()..].copy_from_slice(&bytes);

        Some(DecodedAddress::from(&Address::new(workchain, hash_part)))
    } else {
        None
    };

    let _import_fee = slice.load_coins()?;
    let _state_init = read_state_init(&mut slice)?;

    // The signed body either continues inline or lives in the first child
    // reference, read with a fresh cursor.
    let (body_cell, mut body_slice) = if slice.load_bit()? {
        let cell = slice.reference(0)?;
        (cell.clone(), Slice::new(cell))
    } else {
        (root.clone(), slice)
    };

    let wallet = read_wallet_header(&mut body_slice)?;
    log::debug!(
        "wallet header: id={} seqno={} expires={}",
        wallet.wallet_id,
        wallet.seqno,
        wallet.expiration_timestamp
    );

    let refs = body_cell.references();
    if refs.is_empty() {
        return Ok(ParsedPayload {
            destination,
            transaction: ParsedTransaction::WalletHeader(wallet),
        });
    }

    let mut messages = BTreeMap::new();
    for (index, child) in refs.iter().enumerate() {
        log::trace!("decoding outgoing message {index}");
        let decoded = read_common_message(&mut Slice::new(child.clone()), 0)?;
        messages.insert(index, decoded);
    }

    Ok(ParsedPayload {
        destination,
        transaction: ParsedTransaction::Messages(messages),
    })
}
