use model::{
    error::ConsumerError,
    event::{ConsumerEvent, Payout},
};
use near_sdk::{env, json_types::U128, log, near_bindgen, AccountId, Promise};

use crate::{
    external::{ext_ft, GAS_FOR_FT_TRANSFER, GAS_FOR_ON_PAYOUT_SETTLED},
    utils::{is_promise_success, OrPanic},
    Contract, ContractExt,
};

#[near_bindgen]
impl Contract {
    /// Retries the transfer of the caller's released escrow.
    pub fn withdraw(&mut self) -> Promise {
        self.internal_start_payout(&env::predecessor_account_id())
            .or_panic()
    }

    #[private]
    pub fn on_payout_settled(&mut self, account_id: AccountId, amount: U128) {
        self.internal_resolve_payout(account_id, amount.0, is_promise_success());
    }
}

impl Contract {
    pub(crate) fn credit(&mut self, account_id: &AccountId, amount: u128) {
        let balance = self.payouts.get(account_id).unwrap_or(0);
        self.payouts.insert(account_id, &(balance + amount));
    }

    /// Debits the whole payout balance of `account_id` and transfers it.
    pub(crate) fn internal_start_payout(
        &mut self,
        account_id: &AccountId,
    ) -> Result<Promise, ConsumerError> {
        let amount = self
            .payouts
            .remove(account_id)
            .filter(|amount| *amount > 0)
            .ok_or_else(|| ConsumerError::NothingToWithdraw(account_id.clone()))?;

        Ok(ext_ft::ext(self.token_id.clone())
            .with_attached_deposit(1)
            .with_static_gas(GAS_FOR_FT_TRANSFER)
            .ft_transfer(
                account_id.clone(),
                amount.into(),
                Some("kyc consumer escrow release".to_string()),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_ON_PAYOUT_SETTLED)
                    .on_payout_settled(account_id.clone(), amount.into()),
            ))
    }

    pub(crate) fn internal_resolve_payout(
        &mut self,
        account_id: AccountId,
        amount: u128,
        transferred: bool,
    ) {
        if transferred {
            Payout {
                account_id,
                amount: amount.into(),
            }
            .emit();
        } else {
            log!(
                "Transfer of {} to {} failed, restoring payout balance",
                amount,
                account_id
            );
            self.credit(&account_id, amount);
        }
    }
}
