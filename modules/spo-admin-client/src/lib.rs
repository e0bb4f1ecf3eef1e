pub mod auth;
pub mod error;
pub mod types;

pub use auth::TokenClient;
pub use error::{Result, SpoError};
pub use types::SiteProperties;

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::{RestrictContentPatch, SetSitePropertiesRequest, SitePropertiesRequest, StartReportRequest};

const ODATA_ACCEPT: &str = "application/json;odata=nometadata";

const GET_SITE_PROPERTIES: &str = "/_api/SPO.Tenant/GetSitePropertiesByUrl";
const SET_SITE_PROPERTIES: &str = "/_api/SPO.Tenant/SetSitePropertiesByUrl";
const START_DISCOVERABILITY_REPORT: &str =
    "/_api/SPO.Tenant/StartRestrictedContentDiscoverabilityReport";
const GET_DISCOVERABILITY_REPORT: &str =
    "/_api/SPO.Tenant/GetRestrictedContentDiscoverabilityReport";

/// Derive the tenant admin endpoint from a tenant domain.
///
/// Accepts the bare tenant name (`contoso`), the initial domain
/// (`contoso.onmicrosoft.com`) or the SharePoint host (`contoso.sharepoint.com`).
pub fn admin_url_for_tenant(tenant: &str) -> String {
    let host = tenant
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    let name = host.split('.').next().unwrap_or(host);
    let name = name.strip_suffix("-admin").unwrap_or(name);
    format!("https://{}-admin.sharepoint.com", name.to_lowercase())
}

/// Client for the SharePoint Online tenant admin REST surface.
pub struct SpoAdminClient {
    client: reqwest::Client,
    admin_url: String,
    token: String,
}

impl SpoAdminClient {
    pub fn new(admin_url: &str, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            admin_url: admin_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn admin_url(&self) -> &str {
        &self.admin_url
    }

    /// Read the tenant-level properties of one site.
    pub async fn site_properties(&self, site_url: &str) -> Result<SiteProperties> {
        let body = SitePropertiesRequest {
            url: site_url,
            include_detail: false,
        };
        let resp = self.post(GET_SITE_PROPERTIES, &body).await?;
        Self::parse(resp).await
    }

    /// Set or clear Restricted Content Discovery on one site.
    pub async fn set_restrict_content_org_wide_search(
        &self,
        site_url: &str,
        restrict: bool,
    ) -> Result<()> {
        let body = SetSitePropertiesRequest {
            url: site_url,
            properties: RestrictContentPatch {
                restrict_content_org_wide_search: restrict,
            },
        };
        self.post(SET_SITE_PROPERTIES, &body).await?;
        tracing::debug!(site_url, restrict, "Site property updated");
        Ok(())
    }

    /// Ask the service to compute the org-wide discoverability report.
    /// The service accepts repeated requests; generation runs asynchronously.
    pub async fn start_discoverability_report(&self, force: bool) -> Result<()> {
        self.post(START_DISCOVERABILITY_REPORT, &StartReportRequest { force })
            .await?;
        tracing::debug!(force, "Discoverability report requested");
        Ok(())
    }

    /// Fetch whatever report the service currently holds, as raw text.
    pub async fn discoverability_report(&self) -> Result<String> {
        let url = format!("{}{}", self.admin_url, GET_DISCOVERABILITY_REPORT);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ODATA_ACCEPT)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.text().await?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.admin_url, path);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ODATA_ACCEPT)
            .json(body)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
