use crate::prelude::*;

use super::*;

/// Read-only accessors over the request ledger and the result store.
///
/// None of these wait for the oracle chain: a request without a result simply has no result
/// yet, possibly forever.
impl<T: Config> Pallet<T> {
    /// The highest request ID issued so far, or zero if none has been issued.
    pub fn latest_request_id() -> RequestId {
        LatestRequestId::<T>::get()
    }

    /// The result delivered for `request_id`, if any.
    ///
    /// `None` covers both unresolved and unknown requests; use [`Self::request`] to tell them
    /// apart.
    pub fn result(request_id: RequestId) -> Option<Vec<u8>> {
        Results::<T>::get(request_id).map(|payload| payload.into_inner())
    }

    pub fn request(request_id: RequestId) -> Option<OracleRequest<T>> {
        Requests::<T>::get(request_id)
    }

    pub fn request_status(request_id: RequestId) -> Option<RequestStatus> {
        if !Requests::<T>::contains_key(request_id) {
            return None;
        }

        let status = if Results::<T>::contains_key(request_id) {
            RequestStatus::Resolved
        } else if TimedOut::<T>::contains_key(request_id) {
            RequestStatus::TimedOut
        } else {
            RequestStatus::Dispatched
        };
        Some(status)
    }
}
