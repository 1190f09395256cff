//! Package registry lookups

use std::time::Duration;

use crate::error::{ReleaseError, Result};

/// Answers whether a module version already exists in a registry
pub trait RegistryClient: Send + Sync {
    /// `Ok(true)` when the version exists, `Ok(false)` when the registry
    /// definitively reports it missing, `Err` for any other failure.
    fn version_exists(&self, registry: &str, module: &str, version: &str) -> Result<bool>;
}

/// URL of a single published version document
pub fn version_url(registry: &str, module: &str, version: &str) -> String {
    format!("{}/{}/{}", registry.trim_end_matches('/'), module, version)
}

/// Unauthenticated HTTP lookup backed by `ureq`
pub struct HttpRegistryClient {
    agent: ureq::Agent,
}

impl HttpRegistryClient {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        HttpRegistryClient { agent }
    }
}

impl Default for HttpRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for HttpRegistryClient {
    fn version_exists(&self, registry: &str, module: &str, version: &str) -> Result<bool> {
        let url = version_url(registry, module, version);
        log::debug!("GET {}", url);

        match self.agent.get(&url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(ureq::Error::Status(code, response)) => Err(ReleaseError::registry(format!(
                "{} returned {} ({})",
                url,
                code,
                response.status_text()
            ))),
            Err(err) => Err(ReleaseError::registry(format!("{}: {}", url, err))),
        }
    }
}
