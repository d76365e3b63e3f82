use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network_id: String,
    pub node_url: String,
    pub archival_url: Option<String>,
    pub wallet_url: Option<String>,
    pub helper_url: Option<String>,
    pub explorer_url: Option<String>,
}

pub fn load(path: &str) -> Result<NetworkConfig, MonitorError> {
    let handle = fs::File::open(path).map_err(|source| MonitorError::NetworkConfigIo {
        path: path.to_string(),
        source,
    })?;
    let reader = std::io::BufReader::new(handle);

    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::NetworkConfig;

    #[test]
    fn parse_testnet_config() {
        let config: NetworkConfig = serde_json::from_str(
            r#"{
                "networkId": "testnet",
                "nodeUrl": "https://rpc.testnet.near.org",
                "walletUrl": "https://wallet.testnet.near.org",
                "helperUrl": "https://helper.testnet.near.org",
                "explorerUrl": "https://explorer.testnet.near.org"
            }"#,
        )
        .expect("Cannot parse");

        assert_eq!(config.network_id, "testnet");
        assert_eq!(config.node_url, "https://rpc.testnet.near.org");
        assert_eq!(config.archival_url, None);
    }

    #[test]
    fn node_url_required() {
        assert!(serde_json::from_str::<NetworkConfig>(r#"{"networkId":"testnet"}"#).is_err());
    }

    #[test]
    fn load_missing_file() {
        assert!(super::load("/nonexistent/network.json").is_err());
    }
}
