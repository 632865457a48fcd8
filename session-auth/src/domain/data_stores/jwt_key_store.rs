use jsonwebtoken::{DecodingKey, EncodingKey};
use std::collections::HashMap;

use crate::utils::ConfigError;

#[derive(Clone)]
pub struct JwtKeyStore {
    // active key used for signing
    active_kid: String,
    active_key: EncodingKey,
    // all accepted keys for verifying (kid -> key)
    keys: HashMap<String, DecodingKey>,
}

impl JwtKeyStore {
    pub fn new(jwt_keys: &[(String, Vec<u8>)], jwt_active_kid: &str) -> Result<Self, ConfigError> {
        let active_secret = jwt_keys
            .iter()
            .find(|(kid, _)| kid == jwt_active_kid)
            .map(|(_, secret)| secret)
            .ok_or(ConfigError::Invalid("active kid not found in JWT keys"))?;

        let keys = jwt_keys
            .iter()
            .map(|(kid, secret)| (kid.clone(), DecodingKey::from_secret(secret)))
            .collect();

        Ok(Self {
            active_kid: jwt_active_kid.to_string(),
            active_key: EncodingKey::from_secret(active_secret),
            keys,
        })
    }

    pub fn encoding_key_and_kid(&self) -> (&EncodingKey, &str) {
        (&self.active_key, &self.active_kid)
    }

    pub fn decoding_key_for_kid(&self, kid: Option<&str>) -> Option<&DecodingKey> {
        let k = kid.unwrap_or(&self.active_kid);
        self.keys.get(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<(String, Vec<u8>)> {
        vec![
            ("old".to_string(), vec![1u8; 32]),
            ("new".to_string(), vec![2u8; 32]),
        ]
    }

    #[test]
    fn rejects_unknown_active_kid() {
        assert!(JwtKeyStore::new(&keys(), "missing").is_err());
    }

    #[test]
    fn looks_up_keys_by_kid() {
        let store = JwtKeyStore::new(&keys(), "new").unwrap();
        assert_eq!(store.encoding_key_and_kid().1, "new");
        assert!(store.decoding_key_for_kid(Some("old")).is_some());
        assert!(store.decoding_key_for_kid(None).is_some());
        assert!(store.decoding_key_for_kid(Some("other")).is_none());
    }
}
