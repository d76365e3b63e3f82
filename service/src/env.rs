pub const NETWORK_CONFIG: &str = "NETWORK_CONFIG";
pub const CONTRACT_ID: &str = "CONTRACT_ID";
pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
