//! Stateless checks applied to a data request before it can consume a request ID.

use super::*;
use crate::message::RequestParams;

#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum ValidationError {
    InvalidSender,
    InvalidOracleScript,
    InvalidAskCount,
    QuorumInconsistent,
    InvalidMinCount,
}

impl<T: Config> From<ValidationError> for Error<T> {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidSender => Error::<T>::InvalidSender,
            ValidationError::InvalidOracleScript => Error::<T>::InvalidOracleScript,
            ValidationError::InvalidAskCount => Error::<T>::InvalidAskCount,
            ValidationError::QuorumInconsistent => Error::<T>::QuorumInconsistent,
            ValidationError::InvalidMinCount => Error::<T>::InvalidMinCount,
        }
    }
}

/// Checks a request's fields, reporting the first problem found.
///
/// The order of the checks is part of the contract: every node has to reject a request for
/// the same reason.
pub fn validate_request<AccountId: Encode>(
    sender: &AccountId,
    params: &RequestParams,
) -> Result<(), ValidationError> {
    ensure_sender(sender)?;
    ensure!(
        params.oracle_script_id > 0,
        ValidationError::InvalidOracleScript
    );
    ensure!(params.ask_count > 0, ValidationError::InvalidAskCount);
    ensure!(
        params.ask_count >= params.min_count,
        ValidationError::QuorumInconsistent
    );
    ensure!(params.min_count > 0, ValidationError::InvalidMinCount);

    Ok(())
}

/// Rejects the null account, whose encoding is empty or all zeroes.
pub fn ensure_sender<AccountId: Encode>(sender: &AccountId) -> Result<(), ValidationError> {
    let non_empty = sender.using_encoded(|bytes| bytes.iter().any(|byte| *byte != 0));
    ensure!(non_empty, ValidationError::InvalidSender);

    Ok(())
}
