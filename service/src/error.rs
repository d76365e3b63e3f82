use near_jsonrpc_primitives::types::query::QueryResponseKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
    #[error("Could not read network config {path}: {source}")]
    NetworkConfigIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not parse network config: {0}")]
    NetworkConfigParse(#[from] serde_json::Error),
    #[error("Could not parse view result: {0}")]
    ViewResultParse(serde_json::Error),
    #[error("JSON RPC error: {0}")]
    JsonRpc(String),
    #[error("Incompatible response type from RPC {0:?}")]
    IncompatibleRpcResponseType(QueryResponseKind),
}
