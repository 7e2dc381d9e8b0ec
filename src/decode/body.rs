//! Opcode dispatch: the first 32 bits of a body select its field layout.
//!
//! The known set is closed; everything else is the "unknown" terminal
//! classification, which is a valid result rather than an error.

use crate::decode::message::read_common_message;
use crate::decode::model::DecodedBody;
use crate::error::DecodeError;
use crate::tvm::slice::Slice;

/// Text comment body
pub const OP_COMMENT: u32 = 0x0000_0000;
/// Vesting contract: relay an arbitrary message
pub const OP_VESTING_SEND: u32 = 0xa773_3acd;
/// Vesting contract: withdraw unlocked coins
pub const OP_VESTING_WITHDRAW: u32 = 0x7b4b_42e6;
/// Vesting contract: extend the destination whitelist
pub const OP_VESTING_ADD_WHITELIST: u32 = 0x7258_a69b;
/// Nominator pool: withdraw a stake
pub const OP_NOMINATOR_STAKE_WITHDRAW: u32 = 0xda80_3efd;

/// The closed set of body layouts this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    VestingSend,
    VestingWithdraw,
    VestingAddWhitelist,
    NominatorStakeWithdraw,
    Comment,
    Unknown(u32),
}

impl Opcode {
    pub fn classify(raw: u32) -> Self {
        match raw {
            OP_VESTING_SEND => Opcode::VestingSend,
            OP_VESTING_WITHDRAW => Opcode::VestingWithdraw,
            OP_VESTING_ADD_WHITELIST => Opcode::VestingAddWhitelist,
            OP_NOMINATOR_STAKE_WITHDRAW => Opcode::NominatorStakeWithdraw,
            OP_COMMENT => Opcode::Comment,
            raw => Opcode::Unknown(raw),
        }
    }
}

/// Decodes one message body starting at the opcode.
pub fn decode_body(slice: &mut Slice, depth: usize) -> Result<DecodedBody, DecodeError> {
    let raw = slice.load_u32()?;

    match Opcode::classify(raw) {
        Opcode::VestingSend => {
            let query_id = slice.load_u64()?;
            let send_mode = slice.load_uint(8)? as u8;
            let cell = slice.reference(0)?;
            let out_message = read_common_message(&mut Slice::new(cell), depth + 1)?;

            Ok(DecodedBody::VestingSend {
                query_id,
                send_mode,
                out_message: Box::new(out_message),
            })
        }
        Opcode::VestingWithdraw => {
            let query_id = slice.load_u64()?;
            let amount = slice.load_coins()?;

            Ok(DecodedBody::VestingWithdraw { query_id, amount })
        }
        Opcode::VestingAddWhitelist => {
            let query_id = slice.load_u64()?;

            // Addresses follow back to back until the bits run out. Absent
            // entries are dropped; the first unreadable one ends the list.
            let mut addresses = Vec::new();
            while slice.remaining_bits() > 0 {
                match slice.load_address() {
                    Ok(Some(addr)) => addresses.push((&addr).into()),
                    Ok(None) => {}
                    Err(_) => break,
                }
            }

            Ok(DecodedBody::VestingAddWhitelist {
                query_id,
                addresses,
            })
        }
        Opcode::NominatorStakeWithdraw => {
            let query_id = slice.load_u64()?;
            let gas = slice.load_coins()?;
            let amount = slice.load_coins()?;

            Ok(DecodedBody::NominatorStakeWithdraw {
                query_id,
                gas,
                amount,
            })
        }
        Opcode::Comment => {
            let mut bytes = Vec::with_capacity(slice.remaining_bits() / 8);
            while slice.remaining_bits() > 0 {
                bytes.push(slice.load_byte()?);
            }

            let text = String::from_utf8_lossy(&bytes).into_owned();
            if text.is_empty() {
                return Ok(DecodedBody::Unknown { opcode: raw });
            }

            Ok(DecodedBody::Comment { text })
        }
        Opcode::Unknown(opcode) => Ok(DecodedBody::Unknown { opcode }),
    }
}
