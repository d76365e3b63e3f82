use model::{
    error::ConsumerError,
    event::{ConsumerEvent, JobSpecUpdated},
    job::{JobId, JobSpec},
    request_id::RequestId,
    verification::{VerificationRequest, VerificationResult, VerificationStatus},
};
use near_sdk::{
    assert_one_yocto,
    borsh::{self, BorshDeserialize, BorshSerialize},
    collections::{LookupMap, UnorderedSet},
    env,
    json_types::{U128, U64},
    near_bindgen, AccountId, BorshStorageKey, PanicOnDefault,
};

use crate::{
    impl_ownership,
    ownership::{Ownable, Ownership},
    utils::OrPanic,
};

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(BorshStorageKey, BorshSerialize)]
enum StorageKey {
    OWNERSHIP,
    REQUESTS,
    PENDING,
    LIVE_BY_SUBJECT,
    RESULTS,
    PAYOUTS,
}

#[near_bindgen]
#[derive(PanicOnDefault, BorshDeserialize, BorshSerialize)]
pub struct Contract {
    pub ownership: Ownership,
    pub token_id: AccountId,
    pub job_spec: JobSpec,
    pub sign_up_url: String,
    /// Next nonce to hand out. Never decreases.
    pub nonce: u64,
    pub latest_request_id: Option<RequestId>,
    pub requests: LookupMap<RequestId, VerificationRequest>,
    pub pending: UnorderedSet<RequestId>,
    /// Most recent pending request per subject.
    pub live_by_subject: LookupMap<AccountId, RequestId>,
    pub results: LookupMap<AccountId, VerificationResult>,
    /// Released escrow not yet transferred out.
    pub payouts: LookupMap<AccountId, u128>,
}

#[near_bindgen]
impl Contract {
    #[init]
    pub fn new(
        owner_id: AccountId,
        token_id: AccountId,
        job_spec: JobSpec,
        sign_up_url: String,
    ) -> Self {
        job_spec.validate().or_panic();

        Self {
            ownership: Ownership::new(StorageKey::OWNERSHIP, owner_id),
            token_id,
            job_spec,
            sign_up_url,
            nonce: 0,
            latest_request_id: None,
            requests: LookupMap::new(StorageKey::REQUESTS),
            pending: UnorderedSet::new(StorageKey::PENDING),
            live_by_subject: LookupMap::new(StorageKey::LIVE_BY_SUBJECT),
            results: LookupMap::new(StorageKey::RESULTS),
            payouts: LookupMap::new(StorageKey::PAYOUTS),
        }
    }

    pub fn get_job_spec(&self) -> JobSpec {
        self.job_spec.clone()
    }

    pub fn get_payment_token(&self) -> AccountId {
        self.token_id.clone()
    }

    pub fn get_sign_up_url(&self) -> String {
        self.sign_up_url.clone()
    }

    #[payable]
    pub fn set_oracle(&mut self, oracle_id: AccountId) {
        assert_one_yocto();
        self.internal_update_job_spec(&env::predecessor_account_id(), |spec| {
            spec.oracle_id = oracle_id
        })
        .or_panic();
    }

    #[payable]
    pub fn set_job_id(&mut self, job_id: JobId) {
        assert_one_yocto();
        self.internal_update_job_spec(&env::predecessor_account_id(), |spec| {
            spec.job_id = job_id
        })
        .or_panic();
    }

    #[payable]
    pub fn set_payment(&mut self, payment: U128) {
        assert_one_yocto();
        self.internal_update_job_spec(&env::predecessor_account_id(), |spec| {
            spec.payment = payment
        })
        .or_panic();
    }

    #[payable]
    pub fn set_timeout(&mut self, timeout: U64) {
        assert_one_yocto();
        self.internal_update_job_spec(&env::predecessor_account_id(), |spec| {
            spec.timeout = timeout
        })
        .or_panic();
    }

    #[payable]
    pub fn set_sign_up_url(&mut self, sign_up_url: String) {
        assert_one_yocto();
        self.ownership
            .require_owner(&env::predecessor_account_id())
            .or_panic();
        self.sign_up_url = sign_up_url;
    }

    /// `None` means the subject was never verified.
    pub fn get_verification(&self, subject: AccountId) -> Option<VerificationResult> {
        self.results.get(&subject)
    }

    pub fn is_verified(&self, subject: AccountId) -> bool {
        self.results
            .get(&subject)
            .map_or(false, |result| result.is_verified)
    }

    pub fn get_verification_request(&self, request_id: RequestId) -> Option<VerificationRequest> {
        self.requests.get(&request_id)
    }

    /// One page of the pending set, sorted by nonce within the page.
    pub fn get_pending_requests(
        &self,
        from_index: Option<U64>,
        limit: Option<U64>,
    ) -> Vec<VerificationRequest> {
        let ids = self.pending.as_vector();
        let from = from_index.map_or(0, u64::from);
        let limit = limit.map_or(DEFAULT_PAGE_LIMIT, u64::from).min(MAX_PAGE_LIMIT);
        let to = from.saturating_add(limit).min(ids.len());

        let mut pending: Vec<VerificationRequest> = (from..to)
            .filter_map(|index| ids.get(index))
            .filter_map(|id| self.requests.get(&id))
            .collect();
        pending.sort_by_key(|r| r.nonce);
        pending
    }

    pub fn get_pending_count(&self) -> U64 {
        self.pending.len().into()
    }

    pub fn get_latest_request_id(&self) -> Option<RequestId> {
        self.latest_request_id.clone()
    }

    pub fn is_request_expired(&self, request_id: RequestId) -> Option<bool> {
        self.requests
            .get(&request_id)
            .map(|r| r.is_expired(env::block_timestamp()))
    }

    pub fn get_payout_balance(&self, account_id: AccountId) -> U128 {
        self.payouts.get(&account_id).unwrap_or(0).into()
    }
}

impl Contract {
    pub(crate) fn internal_update_job_spec(
        &mut self,
        caller: &AccountId,
        update: impl FnOnce(&mut JobSpec),
    ) -> Result<(), ConsumerError> {
        self.ownership.require_owner(caller)?;

        let mut job_spec = self.job_spec.clone();
        update(&mut job_spec);
        job_spec.validate()?;
        self.job_spec = job_spec;

        JobSpecUpdated {
            job_spec: self.job_spec.clone(),
        }
        .emit();
        Ok(())
    }

    pub(crate) fn live_request_for(
        &self,
        subject: &AccountId,
        now: u64,
    ) -> Option<VerificationRequest> {
        self.live_by_subject
            .get(subject)
            .and_then(|id| self.requests.get(&id))
            .filter(|r| r.is_live(now))
    }

    /// Drops a request from the pending indexes once it is no longer pending.
    pub(crate) fn untrack_pending(&mut self, request: &VerificationRequest) {
        self.pending.remove(&request.id);
        if self.live_by_subject.get(&request.subject).as_ref() == Some(&request.id) {
            self.live_by_subject.remove(&request.subject);
        }
    }

    pub(crate) fn close_request(
        &mut self,
        request: &mut VerificationRequest,
        status: VerificationStatus,
        now: u64,
    ) -> Result<(), ConsumerError> {
        request.close(status, now)?;
        self.requests.insert(&request.id, request);
        self.untrack_pending(request);
        Ok(())
    }
}

impl_ownership!(Contract, ownership);
