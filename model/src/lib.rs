pub mod error;
pub mod event;
pub mod job;
pub mod request_id;
pub mod sequential_id;
pub mod verification;
