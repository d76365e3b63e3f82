use near_sdk::AccountId;
use thiserror::Error;

use crate::request_id::RequestId;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConsumerError {
    #[error("Payment error: {0}")]
    Payment(String),
    #[error("Duplicate request: {subject} already has live request {request_id}")]
    DuplicateRequest {
        subject: AccountId,
        request_id: RequestId,
    },
    #[error("Unknown request: {0}")]
    UnknownRequest(RequestId),
    #[error("Unauthorized caller: {0}")]
    UnauthorizedCaller(AccountId),
    #[error("Request already closed: {0}")]
    AlreadyClosed(RequestId),
    #[error("Request expired: {0}")]
    ExpiredRequest(RequestId),
    #[error("Subject mismatch: request {request_id} is for {expected}")]
    SubjectMismatch {
        request_id: RequestId,
        expected: AccountId,
    },
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Invalid job spec: {0}")]
    InvalidJobSpec(String),
    #[error("Nothing to withdraw for {0}")]
    NothingToWithdraw(AccountId),
}
