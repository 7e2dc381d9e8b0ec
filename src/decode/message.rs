//! Structural decoding: fixed-shape records composed from slice primitives.
//!
//! Field order in every function below is wire-mandated; reordering any read
//! breaks the decode.

use crate::decode::body::decode_body;
use crate::decode::model::{
    DecodedBody, DecodedCommonMessage, DecodedMessageHeader, StateInit, WalletHeader,
};
use crate::error::DecodeError;
use crate::tvm::slice::Slice;

/// Ceiling on nested message decoding (vesting send carries a whole message
/// inside its body). A reference graph deeper than this fails closed instead
/// of overflowing the stack.
pub const MAX_MESSAGE_DEPTH: usize = 16;

/// Reads the state-init marker without decoding contents.
///
/// One bit: 0 means absent. 1 requires a second bit that must also be 1
/// (state-init supplied via a child reference); an inline state-init is
/// unsupported.
pub fn read_state_init(slice: &mut Slice) -> Result<StateInit, DecodeError> {
    if !slice.load_bit()? {
        return Ok(StateInit::Absent);
    }
    if !slice.load_bit()? {
        return Err(DecodeError::UnsupportedStateInitEncoding);
    }
    Ok(StateInit::Referenced)
}

/// Reads an internal-message header: one ignored tag bit, three flag bits,
/// both addresses, value, extra-currency marker, both fees, logical time and
/// unix timestamp.
pub fn read_message_header(slice: &mut Slice) -> Result<DecodedMessageHeader, DecodeError> {
    let _tag = slice.load_bit()?; // int_msg_info$0
    let ihr_disabled = slice.load_bit()?;
    let bounce = slice.load_bit()?;
    let bounced = slice.load_bit()?;
    let src = slice.load_address()?.as_ref().map(Into::into);
    let dest = slice.load_address()?.as_ref().map(Into::into);
    let value = slice.load_coins()?;
    let has_extra_currencies = slice.load_bit()?;
    let ihr_fee = slice.load_coins()?;
    let forward_fee = slice.load_coins()?;
    let created_lt = slice.load_u64()?;
    let created_at = slice.load_u32()?;

    Ok(DecodedMessageHeader {
        ihr_disabled,
        bounce,
        bounced,
        src,
        dest,
        value,
        has_extra_currencies,
        ihr_fee,
        forward_fee,
        created_lt,
        created_at,
    })
}

/// Locates and decodes a message body.
///
/// Flag bit 1: the body lives in the cell's first child reference, decoded
/// with a fresh cursor. Flag bit 0: the body continues in place if any bits
/// remain, otherwise there is no body.
pub fn read_body(slice: &mut Slice, depth: usize) -> Result<Option<DecodedBody>, DecodeError> {
    if slice.load_bit()? {
        let cell = slice.reference(0)?;
        return decode_body(&mut Slice::new(cell), depth).map(Some);
    }

    if slice.remaining_bits() > 0 {
        return decode_body(slice, depth).map(Some);
    }

    Ok(None)
}

/// Decodes one common message: header, state-init marker, body.
pub fn read_common_message(
    slice: &mut Slice,
    depth: usize,
) -> Result<DecodedCommonMessage, DecodeError> {
    if depth > MAX_MESSAGE_DEPTH {
        return Err(DecodeError::DepthLimitExceeded {
            limit: MAX_MESSAGE_DEPTH,
        });
    }

    let header = read_message_header(slice)?;
    let state_init = read_state_init(slice)?;
    let body = read_body(slice, depth)?;

    Ok(DecodedCommonMessage {
        header,
        state_init,
        body,
    })
}

/// Reads the wallet envelope: wallet id, expiration timestamp, seqno, op and
/// store mode, consumed unconditionally.
pub fn read_wallet_header(slice: &mut Slice) -> Result<WalletHeader, DecodeError> {
    let wallet_id = slice.load_u32()?;
    let expiration_timestamp = slice.load_u32()?;
    let seqno = slice.load_u32()?;
    let op = slice.load_uint(8)? as u8;
    let store_mode = slice.load_uint(8)? as u8;

    Ok(WalletHeader {
        wallet_id,
        expiration_timestamp,
        seqno,
        op,
        store_mode,
    })
}
