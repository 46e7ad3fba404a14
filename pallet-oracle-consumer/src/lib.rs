#![cfg_attr(not(feature = "std"), no_std)]

//! Oracle consumer pallet.
//!
//! Lets a consumer chain post data requests to a remote oracle chain over a cross-chain channel,
//! and later correlates the asynchronously delivered results with the requests that caused them.
//!
//! Every accepted request is issued the next ID from a single monotonic counter, stored in an
//! append-only ledger and handed to the configured [`traits::OracleTransport`] within one
//! storage transaction. Results come back through [`traits::OnOracleResult`] (or the
//! `report_result` call) and are written at most once per request ID.

extern crate frame_support;
extern crate frame_system;
extern crate scale_info;
extern crate sp_runtime;

use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use sp_std::prelude::*;

pub use pallet::*;

/// The logging target for this pallet
pub(crate) const LOG_TARGET: &str = "oracle-consumer";

macro_rules! log {
    ($level:tt, $pattern:expr $(, $values:expr)* $(,)?) => {
        ::log::$level!(target: crate::LOG_TARGET, $pattern $(, $values)*)
    };
}

pub mod fee;
pub mod message;
#[cfg(test)]
mod mock;
mod query;
pub mod traits;
pub mod types;
pub mod validation;

#[frame_support::pallet]
pub mod pallet {
    use crate::prelude::*;

    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// The overarching event type.
        type Event: From<Event<Self>> + IsType<<Self as frame_system::Config>::Event>;

        /// The cross-chain transport that carries requests to the oracle chain.
        type Transport: OracleTransport<Self>;

        /// Origin allowed to deliver results through the `report_result` call.
        type ReportOrigin: EnsureOrigin<Self::Origin>;

        /// The maximum number of calldata bytes a request can carry.
        #[pallet::constant]
        type MaxCalldataSize: Get<u32>;

        /// The maximum number of bytes a result can take.
        #[pallet::constant]
        type MaxResultSize: Get<u32>;

        /// The maximum length of a channel identifier.
        #[pallet::constant]
        type MaxChannelIdLen: Get<u32>;

        /// Number of blocks a request may stay unresolved before it is marked as timed out.
        /// Zero disables timeouts altogether.
        #[pallet::constant]
        type RequestTimeout: Get<Self::BlockNumber>;
    }

    #[pallet::pallet]
    #[pallet::generate_store(pub(super) trait Store)]
    pub struct Pallet<T>(_);

    /// Every request ever dispatched, keyed by ID.
    #[pallet::storage]
    pub(super) type Requests<T: Config> =
        StorageMap<_, Twox64Concat, RequestId, OracleRequest<T>, OptionQuery>;

    /// Results delivered by the oracle chain, keyed by the ID of the request they resolve.
    #[pallet::storage]
    pub(super) type Results<T: Config> =
        StorageMap<_, Twox64Concat, RequestId, ResultOf<T>, OptionQuery>;

    /// The highest request ID issued so far. Zero until the first request.
    #[pallet::storage]
    pub(super) type LatestRequestId<T> = StorageValue<_, RequestId, ValueQuery>;

    /// Requests that went unresolved for longer than `RequestTimeout`, with the block in which
    /// they timed out.
    #[pallet::storage]
    pub(super) type TimedOut<T: Config> =
        StorageMap<_, Twox64Concat, RequestId, T::BlockNumber, OptionQuery>;

    /// Requests to check for timeout at the start of a given block.
    #[pallet::storage]
    pub(super) type ExpiringAt<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        T::BlockNumber,
        Twox64Concat,
        RequestId,
        (),
        OptionQuery,
    >;

    #[pallet::genesis_config]
    #[derive(Default)]
    pub struct GenesisConfig {
        /// Lets a chain resume issuing IDs after the last one known to the oracle chain.
        pub latest_request_id: RequestId,
    }

    #[pallet::genesis_build]
    impl<T: Config> GenesisBuild<T> for GenesisConfig {
        fn build(&self) {
            <LatestRequestId<T>>::put(self.latest_request_id);
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A request has been issued an ID and handed to the transport.
        RequestDispatched {
            request_id: RequestId,
            sender: T::AccountId,
            oracle_script_id: OracleScriptId,
        },
        /// A request has been resolved.
        ResultRecorded { request_id: RequestId },
        /// A result was delivered again for a request that is already resolved.
        DuplicateResultIgnored { request_id: RequestId },
        /// A request went unresolved for longer than the configured timeout.
        RequestTimedOut { request_id: RequestId },
    }

    /// Error for the oracle consumer pallet.
    #[pallet::error]
    pub enum Error<T> {
        /// The sender is not a usable account.
        InvalidSender,
        /// Oracle script IDs start at one.
        InvalidOracleScript,
        /// The ask count must be positive.
        InvalidAskCount,
        /// The min count is greater than the ask count.
        QuorumInconsistent,
        /// The min count must be positive.
        InvalidMinCount,
        /// The calldata exceeds `MaxCalldataSize`.
        OversizedCalldata,
        /// The channel identifier is empty or exceeds `MaxChannelIdLen`.
        InvalidChannel,
        /// A request already exists under the ID that was just allocated.
        DuplicateId,
        /// No more request IDs can be issued.
        RequestIdOverflow,
        /// Tried to follow up on a request ID that was never issued.
        UnknownRequest,
        /// The result of this request had already been recorded.
        DuplicateResult,
        /// The request timed out before its result arrived.
        RequestTimedOut,
        /// A result is too big.
        OversizedResult,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_initialize(now: BlockNumberFor<T>) -> Weight {
            traits::expire_requests::<T>(now)
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::weight(50_000_000)]
        pub fn request_data(
            origin: OriginFor<T>,
            oracle_script_id: OracleScriptId,
            source_channel: Vec<u8>,
            calldata: Vec<u8>,
            ask_count: u64,
            min_count: u64,
            fee_limit: FeeLimit,
            prepare_gas: u64,
            execute_gas: u64,
        ) -> DispatchResult {
            let params = RequestParams {
                oracle_script_id,
                source_channel,
                calldata,
                ask_count,
                min_count,
                fee_limit,
                prepare_gas,
                execute_gas,
            };

            <Pallet<T> as traits::OracleConsumer<T>>::request_data(origin, params).map(|_| ())
        }

        /// Records the result of a request, as reported by `ReportOrigin`.
        ///
        /// Unlike the transport callback, a redelivered result fails with `DuplicateResult`, so
        /// relayers pay for submitting the same result twice.
        #[pallet::weight(25_000_000)]
        pub fn report_result(
            origin: OriginFor<T>,
            request_id: RequestId,
            payload: Vec<u8>,
        ) -> DispatchResult {
            <Pallet<T> as traits::OracleConsumer<T>>::report_result(origin, request_id, payload)
        }
    }
}

pub mod prelude {
    pub use crate::fee::{Coin, FeeLimit};
    pub use crate::message::RequestParams;
    pub use crate::pallet::{
        Config as OracleConsumerConfig, Error as OracleConsumerError,
        Event as OracleConsumerEvent,
    };
    pub use crate::traits::*;
    pub use crate::types::*;
}
