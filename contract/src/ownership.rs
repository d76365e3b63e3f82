use model::error::ConsumerError;
use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    collections::LazyOption,
    AccountId, IntoStorageKey,
};

use crate::utils::prefix_key;

/// Administrative role with a two-step handover.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct Ownership {
    pub owner: AccountId,
    pub proposed_owner: LazyOption<AccountId>,
}

impl Ownership {
    pub fn new<S>(storage_key_prefix: S, owner_id: AccountId) -> Self
    where
        S: IntoStorageKey,
    {
        let k = storage_key_prefix.into_storage_key();

        Self {
            owner: owner_id,
            proposed_owner: LazyOption::new(prefix_key(&k, b"p"), None),
        }
    }

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.owner == account_id
    }

    pub fn require_owner(&self, caller: &AccountId) -> Result<(), ConsumerError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(ConsumerError::UnauthorizedCaller(caller.clone()))
        }
    }

    pub fn propose_owner(
        &mut self,
        caller: &AccountId,
        account_id: Option<AccountId>,
    ) -> Result<(), ConsumerError> {
        self.require_owner(caller)?;
        if let Some(a) = account_id {
            self.proposed_owner.set(&a);
        } else {
            self.proposed_owner.remove();
        }
        Ok(())
    }

    pub fn accept_owner(&mut self, caller: &AccountId) -> Result<(), ConsumerError> {
        match self.proposed_owner.get() {
            Some(proposed) if &proposed == caller => {
                self.proposed_owner.remove();
                self.owner = proposed;
                Ok(())
            }
            _ => Err(ConsumerError::UnauthorizedCaller(caller.clone())),
        }
    }
}

pub trait Ownable {
    fn own_get_owner(&self) -> AccountId;
    fn own_get_proposed_owner(&self) -> Option<AccountId>;
    fn own_propose_owner(&mut self, account_id: Option<AccountId>);
    fn own_accept_owner(&mut self);
}

#[macro_export]
macro_rules! impl_ownership {
    ($contract: ident, $ownership: ident) => {
        #[near_bindgen]
        impl Ownable for $contract {
            fn own_get_owner(&self) -> AccountId {
                self.$ownership.owner.clone()
            }

            fn own_get_proposed_owner(&self) -> Option<AccountId> {
                self.$ownership.proposed_owner.get()
            }

            #[payable]
            fn own_propose_owner(&mut self, account_id: Option<AccountId>) {
                assert_one_yocto();
                self.$ownership
                    .propose_owner(&env::predecessor_account_id(), account_id)
                    .or_panic();
            }

            #[payable]
            fn own_accept_owner(&mut self) {
                assert_one_yocto();
                self.$ownership
                    .accept_owner(&env::predecessor_account_id())
                    .or_panic();
            }
        }
    };
}
