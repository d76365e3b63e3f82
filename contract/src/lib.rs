mod external;
mod ownership;
mod utils;

mod cancellation;
mod contract;
mod fulfillment;
mod issuance;
mod payout;
pub use contract::*;
