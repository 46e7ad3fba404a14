use frame_support::{CloneNoBound, EqNoBound, PartialEqNoBound, RuntimeDebugNoBound};

use super::*;
use crate::fee::FeeLimit;

pub type RequestId = u64;

pub type OracleScriptId = u64;

pub type CalldataOf<T> = BoundedVec<u8, <T as Config>::MaxCalldataSize>;

pub type ChannelIdOf<T> = BoundedVec<u8, <T as Config>::MaxChannelIdLen>;

pub type ResultOf<T> = BoundedVec<u8, <T as Config>::MaxResultSize>;

/// A data request as it was accepted and handed to the transport.
///
/// Entries are written once, when their ID is issued, and never change afterwards.
#[derive(
    Encode,
    Decode,
    CloneNoBound,
    PartialEqNoBound,
    EqNoBound,
    RuntimeDebugNoBound,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound())]
pub struct OracleRequest<T: Config> {
    /// The oracle script to run on the oracle chain.
    pub oracle_script_id: OracleScriptId,
    /// The channel the request was sent through.
    pub source_channel: ChannelIdOf<T>,
    /// Script-specific input.
    pub calldata: CalldataOf<T>,
    /// Number of validators asked to report.
    pub ask_count: u64,
    /// Number of reports needed for the oracle chain to produce a result.
    pub min_count: u64,
    /// The most the sender is willing to pay on the oracle chain.
    pub fee_limit: FeeLimit,
    pub prepare_gas: u64,
    pub execute_gas: u64,
    pub sender: <T as frame_system::Config>::AccountId,
    /// The block in which the request was accepted.
    pub requested_at: <T as frame_system::Config>::BlockNumber,
}

/// Where a request stands, as seen from this chain.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum RequestStatus {
    /// Sent out and waiting for a result.
    Dispatched,
    /// A result has been recorded.
    Resolved,
    /// No result arrived within the configured timeout.
    TimedOut,
}
