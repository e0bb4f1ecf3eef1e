use serde::{Deserialize, Serialize};

// --- Site properties ---

/// Request body for GetSitePropertiesByUrl.
#[derive(Debug, Clone, Serialize)]
pub struct SitePropertiesRequest<'a> {
    pub url: &'a str,
    #[serde(rename = "includeDetail")]
    pub include_detail: bool,
}

/// The subset of tenant site properties this client reads.
/// The admin endpoint answers in PascalCase under `odata=nometadata`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SiteProperties {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "RestrictContentOrgWideSearch", default)]
    pub restrict_content_org_wide_search: bool,
}

/// Request body for SetSitePropertiesByUrl.
#[derive(Debug, Clone, Serialize)]
pub struct SetSitePropertiesRequest<'a> {
    pub url: &'a str,
    pub properties: RestrictContentPatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestrictContentPatch {
    #[serde(rename = "RestrictContentOrgWideSearch")]
    pub restrict_content_org_wide_search: bool,
}

// --- Discoverability report ---

/// Request body for StartRestrictedContentDiscoverabilityReport.
#[derive(Debug, Clone, Serialize)]
pub struct StartReportRequest {
    pub force: bool,
}

// --- OAuth ---

/// Successful response from the identity platform token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
