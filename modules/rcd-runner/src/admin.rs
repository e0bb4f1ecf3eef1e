//! The admin service seam.
//!
//! `SiteAdmin` is everything the batch needs from the tenant admin endpoint.
//! `SpoSiteAdmin` backs it with the REST client; tests substitute a recording
//! mock so no network is involved.

use async_trait::async_trait;
use spo_admin_client::{SpoAdminClient, TokenClient};
use tracing::info;

use crate::config::Credentials;
use crate::error::{RemoteCallError, RemoteOperation, RemoteResult};

/// Current state of one site as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteState {
    pub title: String,
    pub url: String,
    pub restricted: bool,
}

#[async_trait]
pub trait SiteAdmin: Send + Sync {
    /// Open a session against the tenant admin endpoint.
    async fn connect(&mut self, admin_url: &str) -> RemoteResult<()>;

    /// Release the session.
    async fn disconnect(&mut self) -> RemoteResult<()>;

    async fn get_site(&self, identity: &str) -> RemoteResult<SiteState>;

    async fn set_site_flag(&self, identity: &str, restricted: bool) -> RemoteResult<()>;

    /// Request the org-wide discoverability report. Safe to repeat.
    async fn trigger_discoverability_report(&self, force: bool) -> RemoteResult<()>;

    /// Latest report contents as text.
    async fn get_discoverability_report(&self) -> RemoteResult<String>;
}

/// Production `SiteAdmin` over the SharePoint Online admin REST client.
pub struct SpoSiteAdmin {
    credentials: Credentials,
    tokens: TokenClient,
    session: Option<SpoAdminClient>,
}

impl SpoSiteAdmin {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            tokens: TokenClient::new(),
            session: None,
        }
    }

    pub fn with_token_client(credentials: Credentials, tokens: TokenClient) -> Self {
        Self {
            credentials,
            tokens,
            session: None,
        }
    }

    fn session(&self, operation: RemoteOperation) -> RemoteResult<&SpoAdminClient> {
        self.session
            .as_ref()
            .ok_or_else(|| RemoteCallError::new(operation, "not connected to the admin endpoint"))
    }
}

#[async_trait]
impl SiteAdmin for SpoSiteAdmin {
    async fn connect(&mut self, admin_url: &str) -> RemoteResult<()> {
        let token = match &self.credentials {
            Credentials::AccessToken(token) => token.clone(),
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => {
                let scope = format!("{}/.default", admin_url.trim_end_matches('/'));
                self.tokens
                    .client_credentials(tenant_id, client_id, client_secret, &scope)
                    .await
                    .map_err(|e| RemoteCallError::new(RemoteOperation::Connect, e))?
            }
        };

        self.session = Some(SpoAdminClient::new(admin_url, token));
        info!(admin_url, "Connected to tenant admin endpoint");
        Ok(())
    }

    async fn disconnect(&mut self) -> RemoteResult<()> {
        match self.session.take() {
            Some(client) => {
                info!(admin_url = client.admin_url(), "Disconnected from tenant admin endpoint");
                Ok(())
            }
            None => Err(RemoteCallError::new(
                RemoteOperation::Disconnect,
                "no active session",
            )),
        }
    }

    async fn get_site(&self, identity: &str) -> RemoteResult<SiteState> {
        let site = self
            .session(RemoteOperation::GetSite)?
            .site_properties(identity)
            .await
            .map_err(|e| RemoteCallError::new(RemoteOperation::GetSite, e))?;

        Ok(SiteState {
            title: site.title,
            url: site.url,
            restricted: site.restrict_content_org_wide_search,
        })
    }

    async fn set_site_flag(&self, identity: &str, restricted: bool) -> RemoteResult<()> {
        self.session(RemoteOperation::SetSiteFlag)?
            .set_restrict_content_org_wide_search(identity, restricted)
            .await
            .map_err(|e| RemoteCallError::new(RemoteOperation::SetSiteFlag, e))
    }

    async fn trigger_discoverability_report(&self, force: bool) -> RemoteResult<()> {
        self.session(RemoteOperation::TriggerReport)?
            .start_discoverability_report(force)
            .await
            .map_err(|e| RemoteCallError::new(RemoteOperation::TriggerReport, e))
    }

    async fn get_discoverability_report(&self) -> RemoteResult<String> {
        self.session(RemoteOperation::GetReport)?
            .discoverability_report()
            .await
            .map_err(|e| RemoteCallError::new(RemoteOperation::GetReport, e))
    }
}
