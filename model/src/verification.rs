use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    json_types::{U128, U64},
    serde::{Deserialize, Serialize},
    AccountId,
};

use crate::{
    error::ConsumerError,
    job::JobId,
    request_id::RequestId,
    sequential_id::SequentialId,
};

#[derive(BorshDeserialize, BorshSerialize, Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Copy)]
#[serde(crate = "near_sdk::serde")]
pub enum VerificationStatus {
    PENDING,
    FULFILLED,
    CANCELED,
}

#[derive(BorshDeserialize, BorshSerialize, Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct VerificationRequest {
    pub id: RequestId,
    pub nonce: u64,
    pub subject: AccountId,
    pub requester: AccountId,
    pub status: VerificationStatus,
    pub escrowed_amount: U128,
    pub oracle_id: AccountId,
    pub job_id: JobId,
    pub created_at: U64,
    pub expires_at: U64,
    pub updated_at: U64,
}

impl VerificationRequest {
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at.0
    }

    /// Pending and still inside its fulfillment window.
    pub fn is_live(&self, now: u64) -> bool {
        self.status == VerificationStatus::PENDING && !self.is_expired(now)
    }

    /// Moves a pending request into a terminal status.
    pub fn close(&mut self, status: VerificationStatus, now: u64) -> Result<(), ConsumerError> {
        if self.status != VerificationStatus::PENDING {
            return Err(ConsumerError::AlreadyClosed(self.id.clone()));
        }
        self.status = status;
        self.updated_at = now.into();
        Ok(())
    }
}

impl SequentialId<u64> for VerificationRequest {
    fn seq_id(&self) -> u64 {
        self.nonce
    }
}

/// Latest fulfilled outcome for a subject.
#[derive(BorshDeserialize, BorshSerialize, Deserialize, Serialize, PartialEq, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct VerificationResult {
    pub is_verified: bool,
    pub category: u8,
    pub updated_at: U64,
    pub request_id: RequestId,
}

/// `msg` payload accompanying an `ft_transfer_call` payment.
#[derive(Deserialize, Serialize, PartialEq, Debug)]
#[serde(crate = "near_sdk::serde", deny_unknown_fields)]
pub struct IssueRequest {
    pub subject: AccountId,
}

impl std::str::FromStr for IssueRequest {
    type Err = ConsumerError;

    fn from_str(msg: &str) -> Result<Self, Self::Err> {
        near_sdk::serde_json::from_str(msg).map_err(|e| ConsumerError::InvalidMessage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use near_sdk::serde_json;

    use super::*;

    fn request(status: VerificationStatus) -> VerificationRequest {
        VerificationRequest {
            id: RequestId([1u8; 32]),
            nonce: 3,
            subject: "alice.near".parse().unwrap(),
            requester: "bob.near".parse().unwrap(),
            status,
            escrowed_amount: 10u128.into(),
            oracle_id: "oracle.near".parse().unwrap(),
            job_id: JobId::try_from("509e8dd8de054d3f918640ab0a2b77d8".to_string()).unwrap(),
            created_at: 100u64.into(),
            expires_at: 200u64.into(),
            updated_at: 100u64.into(),
        }
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let r = request(VerificationStatus::PENDING);
        assert!(!r.is_expired(200));
        assert!(r.is_expired(201));
        assert!(r.is_live(200));
        assert!(!r.is_live(201));
    }

    #[test]
    fn terminal_requests_are_not_live() {
        assert!(!request(VerificationStatus::FULFILLED).is_live(150));
        assert!(!request(VerificationStatus::CANCELED).is_live(150));
    }

    #[test]
    fn close_only_from_pending() {
        let mut r = request(VerificationStatus::PENDING);
        r.close(VerificationStatus::FULFILLED, 150).expect("pending closes");
        assert_eq!(r.status, VerificationStatus::FULFILLED);
        assert_eq!(r.updated_at.0, 150);

        assert_eq!(
            r.close(VerificationStatus::CANCELED, 160),
            Err(ConsumerError::AlreadyClosed(RequestId([1u8; 32])))
        );
        assert_eq!(r.status, VerificationStatus::FULFILLED);
        assert_eq!(r.updated_at.0, 150);
    }

    #[test]
    fn status_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&VerificationStatus::CANCELED).unwrap(),
            "\"CANCELED\""
        );
    }

    #[test]
    fn issue_request_parsing() {
        let parsed: IssueRequest = r#"{"subject":"alice.near"}"#.parse().expect("valid msg");
        assert_eq!(parsed.subject.as_str(), "alice.near");

        for bad in ["", "{}", r#"{"subject":""}"#, r#"{"subject":"alice.near","x":1}"#] {
            assert!(
                matches!(bad.parse::<IssueRequest>(), Err(ConsumerError::InvalidMessage(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
