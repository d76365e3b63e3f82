use model::{
    error::ConsumerError,
    event::{ConsumerEvent, RequestCanceled},
    request_id::RequestId,
    verification::{VerificationRequest, VerificationStatus},
};
use near_sdk::{env, near_bindgen, AccountId, Promise};

use crate::{utils::OrPanic, Contract, ContractExt};

#[near_bindgen]
impl Contract {
    /// Cancels a pending request and refunds its escrow to the requester.
    /// Allowed at any time before the request closes, expired or not.
    pub fn cancel_request(&mut self, request_id: RequestId) -> Promise {
        let request = self
            .internal_cancel(&env::predecessor_account_id(), &request_id)
            .or_panic();
        self.internal_start_payout(&request.requester).or_panic()
    }
}

impl Contract {
    pub(crate) fn internal_cancel(
        &mut self,
        caller: &AccountId,
        request_id: &RequestId,
    ) -> Result<VerificationRequest, ConsumerError> {
        let mut request = self
            .requests
            .get(request_id)
            .ok_or_else(|| ConsumerError::UnknownRequest(request_id.clone()))?;

        if &request.requester != caller && !self.ownership.is_owner(caller) {
            return Err(ConsumerError::UnauthorizedCaller(caller.clone()));
        }

        self.close_request(
            &mut request,
            VerificationStatus::CANCELED,
            env::block_timestamp(),
        )?;
        self.credit(&request.requester, request.escrowed_amount.0);

        RequestCanceled {
            request_id: request.id.clone(),
            subject: request.subject.clone(),
            refund_amount: request.escrowed_amount,
        }
        .emit();

        Ok(request)
    }
}
