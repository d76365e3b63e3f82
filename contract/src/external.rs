use model::job::OracleJob;
use near_sdk::{ext_contract, json_types::U128, AccountId, Gas};

pub const GAS_FOR_ORACLE_REQUEST: Gas = Gas(20_000_000_000_000);
pub const GAS_FOR_ON_JOB_DISPATCHED: Gas = Gas(15_000_000_000_000);
pub const GAS_FOR_FT_TRANSFER: Gas = Gas(10_000_000_000_000);
pub const GAS_FOR_ON_PAYOUT_SETTLED: Gas = Gas(10_000_000_000_000);

/// NEP-141 payment token.
#[ext_contract(ext_ft)]
pub trait FungibleToken {
    fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
}

/// Oracle dispatch contract. Forwards the job off-chain and later calls
/// `job.callback_method` on `job.callback_address`.
#[ext_contract(ext_oracle)]
pub trait OracleDispatch {
    fn oracle_request(&mut self, job: OracleJob);
}
