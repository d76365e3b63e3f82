use model::verification::VerificationRequest;
use near_jsonrpc_client::{methods, JsonRpcClient};
use near_jsonrpc_primitives::types::query::QueryResponseKind;
use near_primitives::types::{AccountId, BlockReference, Finality, FunctionArgs};
use near_primitives::views::QueryRequest;
use serde::de::DeserializeOwned;
use serde_json::from_slice;

use crate::error::MonitorError;

pub async fn view<T: DeserializeOwned>(
    client: &JsonRpcClient,
    contract_id: &AccountId,
    method_name: &str,
    args: &serde_json::Value,
) -> Result<T, MonitorError> {
    let request = methods::query::RpcQueryRequest {
        block_reference: BlockReference::Finality(Finality::Final),
        request: QueryRequest::CallFunction {
            account_id: contract_id.clone(),
            method_name: method_name.to_string(),
            args: FunctionArgs::from(args.to_string().into_bytes()),
        },
    };

    let response = client
        .call(request)
        .await
        .map_err(|e| MonitorError::JsonRpc(e.to_string()))?;

    if let QueryResponseKind::CallResult(result) = response.kind {
        parse_view_result(&result.result[..])
    } else {
        Err(MonitorError::IncompatibleRpcResponseType(response.kind))
    }
}

pub fn parse_view_result<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MonitorError> {
    from_slice(bytes).map_err(MonitorError::ViewResultParse)
}

/// Largest page the contract serves from `get_pending_requests`.
pub const PAGE_LIMIT: u64 = 100;

/// Collects every page of the contract's pending set.
pub async fn pending_requests(
    client: &JsonRpcClient,
    contract_id: &AccountId,
) -> Result<Vec<VerificationRequest>, MonitorError> {
    let mut pending = vec![];
    loop {
        let page: Vec<VerificationRequest> = view(
            client,
            contract_id,
            "get_pending_requests",
            &page_args(pending.len() as u64),
        )
        .await?;
        let last = (page.len() as u64) < PAGE_LIMIT;
        pending.extend(page);
        if last {
            return Ok(pending);
        }
    }
}

fn page_args(from_index: u64) -> serde_json::Value {
    serde_json::json!({
        "from_index": from_index.to_string(),
        "limit": PAGE_LIMIT.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::error::MonitorError;

    #[test]
    fn parse_view_result_decodes_payload() {
        let parsed: Vec<u64> = super::parse_view_result(b"[1,2,3]").expect("valid payload");
        assert_eq!(parsed, vec![1, 2, 3]);
    }

    #[test]
    fn page_args_use_string_encoded_integers() {
        assert_eq!(
            super::page_args(200),
            serde_json::json!({"from_index": "200", "limit": "100"})
        );
    }

    #[test]
    fn malformed_view_result_reported_as_view_error() {
        let err = super::parse_view_result::<Vec<u64>>(b"{oops").unwrap_err();

        assert!(matches!(err, MonitorError::ViewResultParse(_)));
        assert!(err.to_string().starts_with("Could not parse view result"));
    }
}
