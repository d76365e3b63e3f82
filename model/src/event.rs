//! NEP-297 event logs.
//!
//! Every event is written to the host log as
//! `EVENT_JSON:{"standard":"kyc_consumer","version":"1.0.0","event":"<name>","data":[{..}]}`.

use near_sdk::{
    env,
    json_types::{U128, U64},
    serde::Serialize,
    serde_json, AccountId,
};

use crate::{job::JobSpec, request_id::RequestId};

pub const EVENT_STANDARD: &str = "kyc_consumer";
pub const EVENT_VERSION: &str = "1.0.0";
pub const EVENT_LOG_PREFIX: &str = "EVENT_JSON:";

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct EventLog<'a, T: Serialize> {
    standard: &'static str,
    version: &'static str,
    event: &'static str,
    data: [&'a T; 1],
}

pub trait ConsumerEvent: Serialize + Sized {
    const NAME: &'static str;

    fn to_log(&self) -> String {
        let log = EventLog {
            standard: EVENT_STANDARD,
            version: EVENT_VERSION,
            event: Self::NAME,
            data: [self],
        };
        let json = serde_json::to_string(&log)
            .unwrap_or_else(|e| env::panic_str(&format!("Cannot serialize event: {}", e)));
        format!("{}{}", EVENT_LOG_PREFIX, json)
    }

    fn emit(&self) {
        env::log_str(&self.to_log());
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct RequestSent {
    pub request_id: RequestId,
    pub subject: AccountId,
    pub created_at: U64,
}

impl ConsumerEvent for RequestSent {
    const NAME: &'static str = "request_sent";
}

#[derive(Serialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct RequestFulfilled {
    pub request_id: RequestId,
    pub subject: AccountId,
    pub is_verified: bool,
    pub category: u8,
}

impl ConsumerEvent for RequestFulfilled {
    const NAME: &'static str = "request_fulfilled";
}

#[derive(Serialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct RequestCanceled {
    pub request_id: RequestId,
    pub subject: AccountId,
    pub refund_amount: U128,
}

impl ConsumerEvent for RequestCanceled {
    const NAME: &'static str = "request_canceled";
}

#[derive(Serialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct JobSpecUpdated {
    pub job_spec: JobSpec,
}

impl ConsumerEvent for JobSpecUpdated {
    const NAME: &'static str = "job_spec_updated";
}

#[derive(Serialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct Payout {
    pub account_id: AccountId,
    pub amount: U128,
}

impl ConsumerEvent for Payout {
    const NAME: &'static str = "payout";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_canceled_log_format() {
        let event = RequestCanceled {
            request_id: RequestId([0u8; 32]),
            subject: "alice.near".parse().unwrap(),
            refund_amount: 1_000_000_000_000_000_000u128.into(),
        };

        assert_eq!(
            event.to_log(),
            concat!(
                r#"EVENT_JSON:{"standard":"kyc_consumer","version":"1.0.0","event":"request_canceled","#,
                r#""data":[{"request_id":"11111111111111111111111111111111","subject":"alice.near","refund_amount":"1000000000000000000"}]}"#,
            )
        );
    }
}
