/// How the runner authenticates against the tenant admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A pre-acquired bearer token.
    AccessToken(String),
    /// App-only client-credentials grant.
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

/// Secrets and endpoint overrides loaded from environment variables.
/// Invocation shape (sites, action, log location) comes from the CLI.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub access_token: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub admin_url: Option<String>,
}

impl AppConfig {
    /// Reads the process environment; `main` loads `.env` before this runs.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            access_token: get("SPO_ACCESS_TOKEN"),
            tenant_id: get("SPO_TENANT_ID"),
            client_id: get("SPO_CLIENT_ID"),
            client_secret: get("SPO_CLIENT_SECRET"),
            admin_url: get("SPO_ADMIN_URL"),
        }
    }

    /// A bearer token wins over client credentials when both are present.
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(token) = &self.access_token {
            return Some(Credentials::AccessToken(token.clone()));
        }
        match (&self.tenant_id, &self.client_id, &self.client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                Some(Credentials::ClientSecret {
                    tenant_id: tenant_id.clone(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{}...({} chars)", head, val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => preview(v),
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SPO_ACCESS_TOKEN: {}", preview_opt(&self.access_token));
        tracing::info!("  SPO_TENANT_ID: {}", self.tenant_id.as_deref().unwrap_or("<not set>"));
        tracing::info!("  SPO_CLIENT_ID: {}", self.client_id.as_deref().unwrap_or("<not set>"));
        tracing::info!("  SPO_CLIENT_SECRET: {}", preview_opt(&self.client_secret));
        tracing::info!("  SPO_ADMIN_URL: {}", self.admin_url.as_deref().unwrap_or("<not set>"));
    }
}
