use crate::core::kernel::{SignatureResult, Signer};
use md5::{Digest, Md5};
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;

/// Huobi v3 MD5 signer
///
/// The signed payload is every request parameter plus `access_key`, `secret_key`
/// and `created`, each rendered as `key=value`, sorted as plain strings and joined
/// with `&`. The lowercase hex MD5 of that payload goes out as `sign`. The secret
/// only ever enters the digest; it is not part of the transmitted parameters.
#[derive(Debug, Clone)]
pub struct HuobiSigner {
    access_key: String,
    secret_key: Secret<String>,
}

impl HuobiSigner {
    pub fn new(access_key: String, secret_key: String) -> Self {
        Self {
            access_key,
            secret_key: Secret::new(secret_key),
        }
    }

    /// Sort `key=value` entries as strings and join them with `&`
    pub fn canonical_payload(entries: &[String]) -> String {
        let mut sorted = entries.to_vec();
        sorted.sort();
        sorted.join("&")
    }

    /// Lowercase hex MD5 of `payload`
    pub fn digest(payload: &str) -> String {
        hex::encode(Md5::digest(payload.as_bytes()))
    }

    /// Sign `params` as of `created` (Unix seconds)
    ///
    /// Returns the parameters to transmit: the sorted signed set without the
    /// secret, followed by `sign`.
    pub fn sign_params(&self, params: &[(&str, &str)], created: u64) -> Vec<(String, String)> {
        let created = created.to_string();
        let mut entries: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        entries.push(("access_key".to_string(), self.access_key.clone()));
        entries.push(("created".to_string(), created));

        let mut signed_input: Vec<String> = entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        signed_input.push(format!("secret_key={}", self.secret_key.expose_secret()));
        let signature = Self::digest(&Self::canonical_payload(&signed_input));

        entries.sort_by_cached_key(|(k, v)| format!("{}={}", k, v));
        entries.push(("sign".to_string(), signature));
        entries
    }
}

impl Signer for HuobiSigner {
    fn sign_request(
        &self,
        _method: &str,
        _endpoint: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> SignatureResult {
        Ok((HashMap::new(), self.sign_params(params, timestamp)))
    }
}
