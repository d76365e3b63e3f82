use std::fmt::Display;

use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    serde::{de::*, Serialize, Serializer},
    AccountId,
};
use sha2::{Digest, Sha256};

/// Correlates an issued request with the oracle's callback.
#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct RequestId(pub [u8; 32]);

impl RequestId {
    /// `sha256(consumer ‖ 0x00 ‖ subject ‖ 0x00 ‖ nonce_le)`
    pub fn derive(consumer_id: &AccountId, subject: &AccountId, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(consumer_id.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(subject.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(nonce.to_le_bytes());
        Self(hasher.finalize().into())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct RequestIdVisitor;

impl<'de> Visitor<'de> for RequestIdVisitor {
    type Value = RequestId;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("base58-encoded 32-byte request id")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: near_sdk::serde::de::Error,
    {
        let bytes = bs58::decode(v)
            .into_vec()
            .map_err(|e| E::custom(format!("base58 decode error: {}", e)))?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map(RequestId)
            .map_err(|_| E::invalid_length(bytes.len(), &self))
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<RequestId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(RequestIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use near_sdk::{serde_json, AccountId};

    use super::RequestId;

    fn sequential_bytes() -> RequestId {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        RequestId(bytes)
    }

    #[test]
    fn request_id_serialize() {
        let expected = "\"1thX6LZfHDZZKUs92febYZhYRcXddmzfzF2NvTkPNE\"";
        let actual = serde_json::to_string(&sequential_bytes()).expect("Cannot serialize");
        assert_eq!(expected, actual);
    }

    #[test]
    fn request_id_deserialize() {
        let actual: RequestId =
            serde_json::from_str("\"1thX6LZfHDZZKUs92febYZhYRcXddmzfzF2NvTkPNE\"")
                .expect("Cannot deserialize");
        assert_eq!(sequential_bytes(), actual);
    }

    #[test]
    fn request_id_rejects_short_input() {
        // "2yGEbwRGRKr9Udf39" is only 12 bytes
        let result = serde_json::from_str::<RequestId>("\"2yGEbwRGRKr9Udf39\"");
        assert!(result.is_err());
    }

    #[test]
    fn derive_is_deterministic() {
        let consumer: AccountId = "consumer.near".parse().unwrap();
        let subject: AccountId = "alice.near".parse().unwrap();

        let id = RequestId::derive(&consumer, &subject, 7);
        assert_eq!(id.to_string(), "AfyRDVUNd61nk5g2Wg6QU3fFrK4t2sKiLvtPBbrtCgNd");
        assert_eq!(id, RequestId::derive(&consumer, &subject, 7));
    }

    #[test]
    fn derive_separates_nonces_and_subjects() {
        let consumer: AccountId = "consumer.near".parse().unwrap();
        let alice: AccountId = "alice.near".parse().unwrap();
        let bob: AccountId = "bob.near".parse().unwrap();

        assert_ne!(
            RequestId::derive(&consumer, &alice, 0),
            RequestId::derive(&consumer, &alice, 1)
        );
        assert_ne!(
            RequestId::derive(&consumer, &alice, 0),
            RequestId::derive(&consumer, &bob, 0)
        );
    }
}
