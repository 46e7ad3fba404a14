use frame_support::transactional;
use frame_system::ensure_signed;
use sp_runtime::traits::{Saturating, Zero};

use crate::prelude::*;
use crate::validation::validate_request;

use super::*;

/// Entry points for posting requests and reporting their results.
pub trait OracleConsumer<T>
where
    T: Config,
{
    fn request_data(
        origin: OriginFor<T>,
        params: RequestParams,
    ) -> Result<RequestId, DispatchError>;
    fn report_result(
        origin: OriginFor<T>,
        request_id: RequestId,
        payload: Vec<u8>,
    ) -> DispatchResult;
}

/// The cross-chain transport that carries requests to the oracle chain.
///
/// `dispatch` runs inside the same storage transaction that issues the request ID, so an error
/// leaves no trace of the request on this chain.
pub trait OracleTransport<T: Config> {
    fn dispatch(request_id: RequestId, request: &OracleRequest<T>) -> DispatchResult;
}

/// Accepts every request without sending it anywhere.
impl<T: Config> OracleTransport<T> for () {
    fn dispatch(_request_id: RequestId, _request: &OracleRequest<T>) -> DispatchResult {
        Ok(())
    }
}

/// Receives results delivered by the transport.
///
/// Transports deliver at least once, so a result for a request that is already resolved is
/// accepted and dropped instead of being reported as a failure.
pub trait OnOracleResult {
    fn on_result(request_id: RequestId, payload: Vec<u8>) -> DispatchResult;
}

impl<T: Config> OracleConsumer<T> for Pallet<T> {
    #[transactional]
    fn request_data(
        origin: OriginFor<T>,
        params: RequestParams,
    ) -> Result<RequestId, DispatchError> {
        // Ensure that the transaction is signed, and get hold of signer data
        let sender = ensure_signed(origin)?;

        // Reject malformed requests before they get to consume an ID
        validate_request(&sender, &params).map_err(Error::<T>::from)?;

        let calldata: CalldataOf<T> = params
            .calldata
            .try_into()
            .map_err(|()| Error::<T>::OversizedCalldata)?;
        ensure!(
            !params.source_channel.is_empty(),
            Error::<T>::InvalidChannel
        );
        let source_channel: ChannelIdOf<T> = params
            .source_channel
            .try_into()
            .map_err(|()| Error::<T>::InvalidChannel)?;

        // Use next request ID
        let request_id = Pallet::<T>::next_request_id()?;
        let requested_at = frame_system::Pallet::<T>::block_number();

        let request = OracleRequest::<T> {
            oracle_script_id: params.oracle_script_id,
            source_channel,
            calldata,
            ask_count: params.ask_count,
            min_count: params.min_count,
            fee_limit: params.fee_limit,
            prepare_gas: params.prepare_gas,
            execute_gas: params.execute_gas,
            sender: sender.clone(),
            requested_at,
        };

        // Store the request and advance the latest ID together, then hand it to the transport.
        // A failure at any step rolls back the whole transaction.
        put_request::<T>(request_id, request.clone())?;
        LatestRequestId::<T>::put(request_id);
        T::Transport::dispatch(request_id, &request)?;
        schedule_expiry::<T>(request_id, requested_at);

        log!(
            debug,
            "dispatched request {} for oracle script {}",
            request_id,
            request.oracle_script_id
        );
        Self::deposit_event(Event::<T>::RequestDispatched {
            request_id,
            sender,
            oracle_script_id: request.oracle_script_id,
        });

        Ok(request_id)
    }

    fn report_result(
        origin: OriginFor<T>,
        request_id: RequestId,
        payload: Vec<u8>,
    ) -> DispatchResult {
        // Ensure that the sender is entitled to report
        T::ReportOrigin::ensure_origin(origin)?;

        record_result::<T>(request_id, payload)?;

        Ok(())
    }
}

impl<T: Config> OnOracleResult for Pallet<T> {
    fn on_result(request_id: RequestId, payload: Vec<u8>) -> DispatchResult {
        match record_result::<T>(request_id, payload) {
            Err(Error::<T>::DuplicateResult) => {
                log!(debug, "ignoring duplicate result for request {}", request_id);
                Self::deposit_event(Event::<T>::DuplicateResultIgnored { request_id });
                Ok(())
            }
            result => result.map_err(Into::into),
        }
    }
}

impl<T: Config> Pallet<T> {
    /// The ID the next accepted request will get.
    pub(crate) fn next_request_id() -> Result<RequestId, Error<T>> {
        LatestRequestId::<T>::get()
            .checked_add(1)
            .ok_or(Error::<T>::RequestIdOverflow)
    }
}

fn put_request<T: Config>(
    request_id: RequestId,
    request: OracleRequest<T>,
) -> Result<(), Error<T>> {
    <Requests<T>>::try_mutate(request_id, |entry| {
        // IDs are only issued here, so an occupied slot means the counter went backwards
        if entry.is_some() {
            log!(warn, "request {} is already in the ledger", request_id);
            return Err(Error::<T>::DuplicateId);
        }
        *entry = Some(request);

        Ok(())
    })
}

/// Stores the result of a known, unresolved request. The first result wins, even an empty one.
pub(crate) fn record_result<T: Config>(
    request_id: RequestId,
    payload: Vec<u8>,
) -> Result<(), Error<T>> {
    // Ensure the request exists and is still waiting for its result
    ensure!(
        <Requests<T>>::contains_key(request_id),
        Error::<T>::UnknownRequest
    );
    ensure!(
        !<TimedOut<T>>::contains_key(request_id),
        Error::<T>::RequestTimedOut
    );
    ensure!(
        !<Results<T>>::contains_key(request_id),
        Error::<T>::DuplicateResult
    );

    // Payloads are opaque, only their size is bounded
    let payload: ResultOf<T> = payload
        .try_into()
        .map_err(|()| Error::<T>::OversizedResult)?;

    <Results<T>>::insert(request_id, payload);
    log!(debug, "recorded result for request {}", request_id);
    Pallet::<T>::deposit_event(Event::<T>::ResultRecorded { request_id });

    Ok(())
}

fn schedule_expiry<T: Config>(request_id: RequestId, requested_at: T::BlockNumber) {
    let timeout = T::RequestTimeout::get();
    if timeout.is_zero() {
        return;
    }
    <ExpiringAt<T>>::insert(requested_at.saturating_add(timeout), request_id, ());
}

/// Marks the requests expiring at `now` that are still unresolved as timed out.
///
/// Neither requests nor results are removed, only the expiry bucket for `now`.
pub(crate) fn expire_requests<T: Config>(now: T::BlockNumber) -> Weight {
    let db_weight = T::DbWeight::get();
    let mut consumed_weight = db_weight.reads_writes(1, 1);

    for (request_id, ()) in <ExpiringAt<T>>::drain_prefix(now) {
        // The drained entry is read and removed, then the result store is checked
        consumed_weight = consumed_weight.saturating_add(db_weight.reads_writes(2, 1));
        if <Results<T>>::contains_key(request_id) {
            continue;
        }

        <TimedOut<T>>::insert(request_id, now);
        consumed_weight = consumed_weight.saturating_add(db_weight.writes(1));

        log!(trace, "request {} timed out at block {:?}", request_id, now);
        Pallet::<T>::deposit_event(Event::<T>::RequestTimedOut { request_id });
    }

    consumed_weight
}
