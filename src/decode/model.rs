//! Output records produced by the decoder.
//!
//! Everything here is built once during a parse and never mutated afterwards.
//! Amounts and 64-bit ids serialize as decimal strings; field names follow
//! the wire vocabulary.

use crate::tvm::address::Address;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};
use std::collections::BTreeMap;

/// A decoded address plus its string renderings, computed at decode time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedAddress {
    pub workchain: i8,
    /// Hex-encoded 256-bit hash part
    pub hash: String,
    /// Raw `workchain:hash` form
    pub raw: String,
    /// User-friendly bounceable form
    pub bounceable: String,
    /// User-friendly non-bounceable form
    pub non_bounceable: String,
}

impl From<&Address> for DecodedAddress {
    fn from(addr: &Address) -> Self {
        Self {
            workchain: addr.workchain,
            hash: hex::encode(addr.hash_part),
            raw: addr.to_raw(),
            bounceable: addr.to_base64(true),
            non_bounceable: addr.to_base64(false),
        }
    }
}

/// Internal-message header, fields in wire order.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMessageHeader {
    pub ihr_disabled: bool,
    pub bounce: bool,
    pub bounced: bool,
    pub src: Option<DecodedAddress>,
    pub dest: Option<DecodedAddress>,
    #[serde_as(as = "DisplayFromStr")]
    pub value: u128,
    pub has_extra_currencies: bool,
    #[serde_as(as = "DisplayFromStr")]
    pub ihr_fee: u128,
    #[serde_as(as = "DisplayFromStr")]
    pub forward_fee: u128,
    #[serde_as(as = "DisplayFromStr")]
    pub created_lt: u64,
    pub created_at: u32,
}

/// Whether a message carried a state-init.
///
/// Contents are accepted but never decoded; callers still get to see that a
/// state-init was there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateInit {
    Absent,
    /// Supplied via a child reference, contents skipped
    Referenced,
}

impl StateInit {
    pub fn is_present(&self) -> bool {
        matches!(self, StateInit::Referenced)
    }
}

/// Decoded message body, one variant per known opcode class.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "opcode_name")]
pub enum DecodedBody {
    #[serde(rename = "vesting: send")]
    VestingSend {
        #[serde_as(as = "DisplayFromStr")]
        query_id: u64,
        send_mode: u8,
        out_message: Box<DecodedCommonMessage>,
    },
    #[serde(rename = "vesting: withdraw")]
    VestingWithdraw {
        #[serde_as(as = "DisplayFromStr")]
        query_id: u64,
        #[serde_as(as = "DisplayFromStr")]
        amount: u128,
    },
    #[serde(rename = "vesting: add to whitelist")]
    VestingAddWhitelist {
        #[serde_as(as = "DisplayFromStr")]
        query_id: u64,
        addresses: Vec<DecodedAddress>,
    },
    #[serde(rename = "nominator: stake withdraw")]
    NominatorStakeWithdraw {
        #[serde_as(as = "DisplayFromStr")]
        query_id: u64,
        #[serde_as(as = "DisplayFromStr")]
        gas: u128,
        #[serde_as(as = "DisplayFromStr")]
        amount: u128,
    },
    #[serde(rename = "comment")]
    Comment { text: String },
    #[serde(rename = "unknown")]
    Unknown { opcode: u32 },
}

/// Header + state-init + body shared by every internal message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedCommonMessage {
    pub header: DecodedMessageHeader,
    #[serde(rename = "stateInit")]
    pub state_init: StateInit,
    pub body: Option<DecodedBody>,
}

/// Fixed envelope fields of an externally-signed outgoing wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletHeader {
    pub wallet_id: u32,
    pub expiration_timestamp: u32,
    pub seqno: u32,
    pub op: u8,
    pub store_mode: u8,
}

/// Either every outgoing message indexed in encounter order, or — when the
/// body cell carries no child references — the bare wallet header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedTransaction {
    Messages(BTreeMap<usize, DecodedCommonMessage>),
    WalletHeader(WalletHeader),
}

/// Top-level parse output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPayload {
    /// Destination address from the outer envelope, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<DecodedAddress>,
    #[serde(flatten)]
    pub transaction: ParsedTransaction,
}

impl ParsedPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
