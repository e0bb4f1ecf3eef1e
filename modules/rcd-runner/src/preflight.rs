//! Capability checks run before a batch starts. The runner assumes they passed.

use tracing::{error, info};

use crate::config::{AppConfig, Credentials};
use crate::error::EnvironmentError;

pub trait CapabilityCheck {
    fn name(&self) -> &'static str;
    fn check(&self) -> Result<(), EnvironmentError>;
}

/// A bearer token or a complete client-credentials set is configured.
pub struct CredentialsConfigured<'a>(pub &'a AppConfig);

impl CapabilityCheck for CredentialsConfigured<'_> {
    fn name(&self) -> &'static str {
        "credentials"
    }

    fn check(&self) -> Result<(), EnvironmentError> {
        match self.0.credentials() {
            Some(_) => Ok(()),
            None => Err(EnvironmentError::MissingCredentials),
        }
    }
}

/// The admin endpoint is an absolute https URL.
pub struct AdminEndpoint<'a>(pub &'a str);

impl CapabilityCheck for AdminEndpoint<'_> {
    fn name(&self) -> &'static str {
        "admin_endpoint"
    }

    fn check(&self) -> Result<(), EnvironmentError> {
        let rest = self.0.strip_prefix("https://").unwrap_or_default();
        if rest.is_empty() || rest.starts_with('/') {
            return Err(EnvironmentError::InvalidAdminUrl(self.0.to_string()));
        }
        Ok(())
    }
}

/// Run checks in order, stopping at the first failure.
pub fn run_checks(checks: &[&dyn CapabilityCheck]) -> Result<(), EnvironmentError> {
    for check in checks {
        if let Err(e) = check.check() {
            error!(check = check.name(), error = %e, "Pre-flight check failed");
            return Err(e);
        }
        info!(check = check.name(), "Pre-flight check passed");
    }
    Ok(())
}

/// Standard pre-flight for a run; yields the credentials to connect with.
pub fn check_environment(
    config: &AppConfig,
    admin_url: &str,
) -> Result<Credentials, EnvironmentError> {
    run_checks(&[&CredentialsConfigured(config), &AdminEndpoint(admin_url)])?;
    config
        .credentials()
        .ok_or(EnvironmentError::MissingCredentials)
}
