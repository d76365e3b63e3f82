use std::fmt::Display;

use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    json_types::{U128, U64},
    serde::{Deserialize, Serialize},
    AccountId,
};

use crate::{error::ConsumerError, request_id::RequestId};

/// Method the oracle worker runs for every verification job.
pub const KYC_STATUS_METHOD: &str = "kycStatus";

/// Oracle job identifier: 32 lowercase hex characters.
#[derive(BorshDeserialize, BorshSerialize, Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
#[serde(crate = "near_sdk::serde", try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    pub const LEN: usize = 32;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = ConsumerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let well_formed = s.len() == Self::LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(s))
        } else {
            Err(ConsumerError::InvalidJobSpec(format!(
                "job id must be {} lowercase hex characters, got {:?}",
                Self::LEN,
                s
            )))
        }
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(BorshDeserialize, BorshSerialize, Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct JobSpec {
    pub oracle_id: AccountId,
    pub job_id: JobId,
    pub payment: U128,
    /// Nanoseconds a request stays fulfillable after creation.
    pub timeout: U64,
}

impl JobSpec {
    pub fn validate(&self) -> Result<(), ConsumerError> {
        if self.payment.0 == 0 {
            return Err(ConsumerError::InvalidJobSpec(
                "payment must be positive".to_string(),
            ));
        }
        if self.timeout.0 == 0 {
            return Err(ConsumerError::InvalidJobSpec(
                "timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters the oracle worker needs to run a KYC status check.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct VerificationJobParams {
    pub method: String,
    pub address: AccountId,
}

impl VerificationJobParams {
    pub fn kyc_status(subject: AccountId) -> Self {
        Self {
            method: KYC_STATUS_METHOD.to_string(),
            address: subject,
        }
    }
}

/// Submitted to the oracle dispatch contract.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct OracleJob {
    pub request_id: RequestId,
    pub job_id: JobId,
    pub callback_address: AccountId,
    pub callback_method: String,
    pub payment: U128,
    pub expires_at: U64,
    pub params: VerificationJobParams,
}
