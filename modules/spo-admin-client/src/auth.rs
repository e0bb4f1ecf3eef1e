use crate::error::{Result, SpoError};
use crate::types::TokenResponse;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Acquires app-only bearer tokens for the tenant admin endpoint.
pub struct TokenClient {
    client: reqwest::Client,
    authority: String,
}

impl TokenClient {
    pub fn new() -> Self {
        Self::with_authority(DEFAULT_AUTHORITY)
    }

    /// Point at a different identity authority (sovereign clouds, tests).
    pub fn with_authority(authority: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            authority: authority.trim_end_matches('/').to_string(),
        }
    }

    /// OAuth2 client-credentials grant against the v2 token endpoint.
    /// `scope` is normally `<admin_url>/.default`.
    pub async fn client_credentials(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
        scope: &str,
    ) -> Result<String> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.authority, tenant_id);
        tracing::debug!(tenant_id, client_id, scope, "Requesting app-only token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", scope),
        ];

        let resp = self.client.post(&url).form(&form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpoError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = resp.json().await?;
        if token.access_token.is_empty() {
            return Err(SpoError::Auth("token endpoint returned an empty access_token".into()));
        }

        tracing::debug!(expires_in = ?token.expires_in, "Token acquired");
        Ok(token.access_token)
    }
}

impl Default for TokenClient {
    fn default() -> Self {
        Self::new()
    }
}
