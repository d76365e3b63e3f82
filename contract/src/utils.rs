use model::error::ConsumerError;
use near_sdk::{env, PromiseResult};

pub fn prefix_key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    [prefix, key].concat()
}

/// Whether the single promise this callback is chained to succeeded.
pub fn is_promise_success() -> bool {
    env::promise_results_count() == 1
        && matches!(env::promise_result(0), PromiseResult::Successful(_))
}

pub trait OrPanic<T> {
    /// Aborts the receipt with the error's message, reverting all state changes.
    fn or_panic(self) -> T;
}

impl<T> OrPanic<T> for Result<T, ConsumerError> {
    fn or_panic(self) -> T {
        self.unwrap_or_else(|e| env::panic_str(&e.to_string()))
    }
}
