use model::{
    error::ConsumerError,
    event::{ConsumerEvent, RequestFulfilled},
    request_id::RequestId,
    verification::{VerificationRequest, VerificationResult, VerificationStatus},
};
use near_sdk::{env, near_bindgen, AccountId, Promise};

use crate::{utils::OrPanic, Contract, ContractExt};

#[near_bindgen]
impl Contract {
    /// Oracle callback. Only the oracle the request was dispatched to may
    /// call it, and only before the request expires.
    pub fn fulfill_verification(
        &mut self,
        request_id: RequestId,
        subject: AccountId,
        is_verified: bool,
        category: u8,
    ) -> Promise {
        let request = self
            .internal_fulfill(
                &env::predecessor_account_id(),
                &request_id,
                subject,
                is_verified,
                category,
            )
            .or_panic();
        self.internal_start_payout(&request.oracle_id).or_panic()
    }
}

impl Contract {
    pub(crate) fn internal_fulfill(
        &mut self,
        caller: &AccountId,
        request_id: &RequestId,
        subject: AccountId,
        is_verified: bool,
        category: u8,
    ) -> Result<VerificationRequest, ConsumerError> {
        let request = self.requests.get(request_id);

        // In-flight requests stay bound to the oracle captured at issuance
        let authorized = match &request {
            Some(r) => &r.oracle_id == caller,
            None => &self.job_spec.oracle_id == caller,
        };
        if !authorized {
            return Err(ConsumerError::UnauthorizedCaller(caller.clone()));
        }

        let mut request =
            request.ok_or_else(|| ConsumerError::UnknownRequest(request_id.clone()))?;

        if request.status != VerificationStatus::PENDING {
            return Err(ConsumerError::AlreadyClosed(request.id));
        }

        let now = env::block_timestamp();
        if request.is_expired(now) {
            return Err(ConsumerError::ExpiredRequest(request.id));
        }

        if request.subject != subject {
            return Err(ConsumerError::SubjectMismatch {
                request_id: request.id,
                expected: request.subject,
            });
        }

        self.close_request(&mut request, VerificationStatus::FULFILLED, now)?;

        self.results.insert(
            &request.subject,
            &VerificationResult {
                is_verified,
                category,
                updated_at: now.into(),
                request_id: request.id.clone(),
            },
        );
        self.credit(&request.oracle_id, request.escrowed_amount.0);

        RequestFulfilled {
            request_id: request.id.clone(),
            subject: request.subject.clone(),
            is_verified,
            category,
        }
        .emit();

        Ok(request)
    }
}
