use model::{
    error::ConsumerError,
    event::{ConsumerEvent, RequestSent},
    job::{OracleJob, VerificationJobParams},
    request_id::RequestId,
    verification::{IssueRequest, VerificationRequest, VerificationStatus},
};
use near_sdk::{env, json_types::U128, log, near_bindgen, AccountId, PromiseOrValue};

use crate::{
    external::{ext_oracle, GAS_FOR_ON_JOB_DISPATCHED, GAS_FOR_ORACLE_REQUEST},
    utils::{is_promise_success, OrPanic},
    Contract, ContractExt,
};

pub const FULFILL_METHOD: &str = "fulfill_verification";

#[near_bindgen]
impl Contract {
    /// Payment hook for `ft_transfer_call` on the payment token. `msg` names
    /// the subject: `{"subject":"alice.near"}`. Resolves to the amount the
    /// token should refund to `sender_id`.
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        let request = self
            .internal_issue(&env::predecessor_account_id(), sender_id, amount.0, &msg)
            .or_panic();
        let excess = amount.0 - request.escrowed_amount.0;

        let job = OracleJob {
            request_id: request.id.clone(),
            job_id: request.job_id.clone(),
            callback_address: env::current_account_id(),
            callback_method: FULFILL_METHOD.to_string(),
            payment: request.escrowed_amount,
            expires_at: request.expires_at,
            params: VerificationJobParams::kyc_status(request.subject.clone()),
        };

        ext_oracle::ext(request.oracle_id.clone())
            .with_static_gas(GAS_FOR_ORACLE_REQUEST)
            .oracle_request(job)
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_ON_JOB_DISPATCHED)
                    .on_job_dispatched(request.id, amount, U128(excess)),
            )
            .into()
    }

    #[private]
    pub fn on_job_dispatched(&mut self, request_id: RequestId, amount: U128, excess: U128) -> U128 {
        self.internal_resolve_dispatch(&request_id, amount.0, excess.0, is_promise_success())
            .into()
    }
}

impl Contract {
    pub(crate) fn internal_issue(
        &mut self,
        token_id: &AccountId,
        requester: AccountId,
        amount: u128,
        msg: &str,
    ) -> Result<VerificationRequest, ConsumerError> {
        if token_id != &self.token_id {
            return Err(ConsumerError::Payment(format!(
                "unsupported token {}",
                token_id
            )));
        }

        let IssueRequest { subject } = msg.parse()?;

        let payment = self.job_spec.payment.0;
        if amount < payment {
            return Err(ConsumerError::Payment(format!(
                "insufficient payment: attached {} but job requires {}",
                amount, payment
            )));
        }

        let now = env::block_timestamp();
        if let Some(live) = self.live_request_for(&subject, now) {
            return Err(ConsumerError::DuplicateRequest {
                subject,
                request_id: live.id,
            });
        }

        let nonce = self.nonce;
        self.nonce += 1;

        let request = VerificationRequest {
            id: RequestId::derive(&env::current_account_id(), &subject, nonce),
            nonce,
            subject,
            requester,
            status: VerificationStatus::PENDING,
            escrowed_amount: payment.into(),
            oracle_id: self.job_spec.oracle_id.clone(),
            job_id: self.job_spec.job_id.clone(),
            created_at: now.into(),
            expires_at: now.saturating_add(self.job_spec.timeout.0).into(),
            updated_at: now.into(),
        };

        self.requests.insert(&request.id, &request);
        self.pending.insert(&request.id);
        self.live_by_subject.insert(&request.subject, &request.id);

        Ok(request)
    }

    /// Returns the amount to refund to the payer. A failed dispatch unwinds
    /// the issuance and refunds everything.
    pub(crate) fn internal_resolve_dispatch(
        &mut self,
        request_id: &RequestId,
        amount: u128,
        excess: u128,
        dispatched: bool,
    ) -> u128 {
        let request = match self.requests.get(request_id) {
            Some(r) => r,
            None => return amount,
        };

        if dispatched {
            // Canceled while the dispatch was in flight
            if request.status != VerificationStatus::PENDING {
                return excess;
            }
            self.latest_request_id = Some(request.id.clone());
            RequestSent {
                request_id: request.id,
                subject: request.subject,
                created_at: request.created_at,
            }
            .emit();
            return excess;
        }

        if request.status != VerificationStatus::PENDING {
            return excess;
        }

        self.requests.remove(request_id);
        self.untrack_pending(&request);
        log!(
            "Oracle dispatch failed for request {}, refunding {} to {}",
            request.id,
            amount,
            request.requester
        );
        amount
    }
}
