//! Checks a candidate API key before it is handed to the vault.
//!
//! The vault stores whatever it is given, so callers run one or more
//! [`KeyValidator`]s first.  `BlankCheck` is local and always cheap;
//! `RemoteCheck` (feature `remote-check`) asks the generative-AI service
//! whether it accepts the key.

use crate::errors::Result;

/// Outcome of a validation hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted,
    Rejected(String),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A hook that decides whether a candidate secret is worth saving.
///
/// `Err` means the check itself could not run; `Ok(Rejected(..))` means
/// it ran and said no.
pub trait KeyValidator {
    fn check(&self, candidate: &str) -> Result<Validation>;
}

/// Rejects empty and whitespace-only candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankCheck;

impl KeyValidator for BlankCheck {
    fn check(&self, candidate: &str) -> Result<Validation> {
        if candidate.trim().is_empty() {
            Ok(Validation::Rejected("API key is empty".into()))
        } else {
            Ok(Validation::Accepted)
        }
    }
}

/// Run every validator in order, stopping at the first rejection.
pub fn run_all(validators: &[&dyn KeyValidator], candidate: &str) -> Result<Validation> {
    for validator in validators {
        let verdict = validator.check(candidate)?;
        if !verdict.is_accepted() {
            return Ok(verdict);
        }
    }
    Ok(Validation::Accepted)
}

#[cfg(feature = "remote-check")]
pub use remote::RemoteCheck;

#[cfg(feature = "remote-check")]
mod remote {
    use std::time::Duration;

    use super::{KeyValidator, Validation};
    use crate::errors::Result;

    /// Model-listing endpoint of the Gemini API.  Any authenticated
    /// request works; listing models is the cheapest one.
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

    const TIMEOUT_SECS: u64 = 10;

    /// Validates a key by making one authenticated request with it.
    #[derive(Debug, Clone)]
    pub struct RemoteCheck {
        endpoint: String,
        timeout: Duration,
    }

    impl Default for RemoteCheck {
        fn default() -> Self {
            Self {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout: Duration::from_secs(TIMEOUT_SECS),
            }
        }
    }

    impl RemoteCheck {
        pub fn new(endpoint: &str) -> Self {
            Self {
                endpoint: endpoint.to_string(),
                ..Self::default()
            }
        }
    }

    impl KeyValidator for RemoteCheck {
        fn check(&self, candidate: &str) -> Result<Validation> {
            let config = ureq::Agent::config_builder()
                .timeout_global(Some(self.timeout))
                .http_status_as_error(false)
                .build();
            let agent = ureq::Agent::new_with_config(config);

            let user_agent = format!("mnemovault/{}", env!("CARGO_PKG_VERSION"));

            // The key goes in a header so it never shows up in URLs or logs.
            let response = agent
                .get(self.endpoint.as_str())
                .header("x-goog-api-key", candidate)
                .header("User-Agent", user_agent.as_str())
                .call();

            match response {
                Ok(resp) if resp.status().is_success() => Ok(Validation::Accepted),
                Ok(resp) => {
                    tracing::debug!(status = resp.status().as_u16(), "key check rejected");
                    Ok(Validation::Rejected(format!(
                        "the service refused the key (HTTP {})",
                        resp.status().as_u16()
                    )))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "key check could not reach the service");
                    Ok(Validation::Rejected(
                        "invalid API key or the service cannot be reached".into(),
                    ))
                }
            }
        }
    }
}
