//! Data request messages, typed and textual.

use core::fmt;

use super::*;
use crate::{
    fee::{FeeLimit, ParseFeeError},
    types::OracleScriptId,
};

/// Prepare gas used when none is given.
pub const DEFAULT_PREPARE_GAS: u64 = 50_000;

/// Execute gas used when none is given.
pub const DEFAULT_EXECUTE_GAS: u64 = 300_000;

/// The fields of a data request before it is issued an ID.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct RequestParams {
    pub oracle_script_id: OracleScriptId,
    pub source_channel: Vec<u8>,
    pub calldata: Vec<u8>,
    pub ask_count: u64,
    pub min_count: u64,
    pub fee_limit: FeeLimit,
    pub prepare_gas: u64,
    pub execute_gas: u64,
}

/// A data request as typed by a user, every field still a string.
#[derive(Clone, Copy, Default, PartialEq, Eq, RuntimeDebug)]
pub struct RawRequest<'a> {
    pub oracle_script_id: &'a str,
    pub ask_count: &'a str,
    pub min_count: &'a str,
    /// Hex encoded, with or without a `0x` prefix.
    pub calldata: &'a str,
    pub channel: &'a str,
    pub prepare_gas: Option<&'a str>,
    pub execute_gas: Option<&'a str>,
    /// Coin list such as `100uband`.
    pub fee_limit: &'a str,
}

#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum ParseRequestError {
    /// A numeric field is not an unsigned 64-bit integer.
    InvalidInteger(&'static str),
    InvalidCalldata,
    MissingChannel,
    InvalidFeeLimit(ParseFeeError),
}

impl fmt::Display for ParseRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteger(field) => write!(f, "{} must be an unsigned integer", field),
            Self::InvalidCalldata => f.write_str("calldata must be hex encoded"),
            Self::MissingChannel => f.write_str("a channel is required"),
            Self::InvalidFeeLimit(err) => write!(f, "invalid fee limit: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseRequestError {}

impl From<ParseFeeError> for ParseRequestError {
    fn from(err: ParseFeeError) -> Self {
        Self::InvalidFeeLimit(err)
    }
}

/// Decodes hex calldata. An empty string is empty calldata.
pub fn parse_calldata_hex(calldata: &str) -> Result<Vec<u8>, ParseRequestError> {
    let calldata = calldata.trim();
    let calldata = calldata.strip_prefix("0x").unwrap_or(calldata);
    hex::decode(calldata).map_err(|_| ParseRequestError::InvalidCalldata)
}

fn parse_u64(value: &str, field: &'static str) -> Result<u64, ParseRequestError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseRequestError::InvalidInteger(field))
}

impl<'a> TryFrom<RawRequest<'a>> for RequestParams {
    type Error = ParseRequestError;

    fn try_from(raw: RawRequest<'a>) -> Result<Self, Self::Error> {
        let oracle_script_id = parse_u64(raw.oracle_script_id, "oracle script id")?;
        let ask_count = parse_u64(raw.ask_count, "ask count")?;
        let min_count = parse_u64(raw.min_count, "min count")?;
        let calldata = parse_calldata_hex(raw.calldata)?;

        let channel = raw.channel.trim();
        if channel.is_empty() {
            return Err(ParseRequestError::MissingChannel);
        }

        let prepare_gas = raw
            .prepare_gas
            .map(|gas| parse_u64(gas, "prepare gas"))
            .transpose()?
            .unwrap_or(DEFAULT_PREPARE_GAS);
        let execute_gas = raw
            .execute_gas
            .map(|gas| parse_u64(gas, "execute gas"))
            .transpose()?
            .unwrap_or(DEFAULT_EXECUTE_GAS);
        let fee_limit = raw.fee_limit.parse::<FeeLimit>()?;

        Ok(Self {
            oracle_script_id,
            source_channel: channel.as_bytes().to_vec(),
            calldata,
            ask_count,
            min_count,
            fee_limit,
            prepare_gas,
            execute_gas,
        })
    }
}
