//! HTTP client helper with native-tls support.
//!
//! Provider calls go through an agent that uses the platform TLS library
//! (Schannel on Windows, OpenSSL on Linux, Security.framework on macOS) and
//! the system root certificates.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Maximum accepted size for a model API response body (4 MB).
pub const MAX_API_RESPONSE_SIZE: u64 = 4 * 1024 * 1024;

/// User-Agent sent with every provider request.
pub const USER_AGENT: &str = concat!("errflow/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP agent with native-tls and a global request timeout.
pub fn agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .build()
        .into()
}
