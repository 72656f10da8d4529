/// Transport layer shared by exchange connectors
///
/// The kernel holds only exchange-agnostic plumbing:
///
/// - `RestClient`: HTTP interface (GET with query, form-encoded POST)
/// - `ReqwestRest`: reqwest implementation with pluggable signing
/// - `Signer`: authentication seam, implemented per exchange
///
/// Connectors are generic over `RestClient`, so tests can substitute a scripted
/// transport and observe exactly which requests were issued.
///
/// ```rust,no_run
/// use lotusx_huobi::core::kernel::*;
/// use lotusx_huobi::exchanges::huobi::signer::HuobiSigner;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new("https://api.huobi.com".to_string(), "huobi".to_string());
/// let signer = Arc::new(HuobiSigner::new("access".to_string(), "secret".to_string()));
/// let rest = RestClientBuilder::new(rest_config).with_signer(signer).build()?;
/// assert!(rest.can_sign());
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{SignatureResult, Signer};
