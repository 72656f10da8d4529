use crate::core::errors::ExchangeError;
use std::collections::HashMap;

/// Result type for signing operations: (headers, signed parameters in wire order)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// This trait provides a unified interface for the authentication scheme of an
/// exchange. The transport calls it for every authenticated request and sends
/// exactly the headers and parameters it returns.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and the parameter list to transmit
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `params` - Unsigned request parameters
    /// * `timestamp` - Request timestamp in Unix seconds
    ///
    /// # Returns
    /// Tuple of (headers, signed_params) to include in the request
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> SignatureResult;
}
