use tracing::info;

use crate::admin::SiteAdmin;
use crate::error::RemoteResult;

/// Request a fresh org-wide discoverability report and read back whatever the
/// service currently holds.
///
/// Generation is asynchronous on the service side and is not awaited, so the
/// text returned may belong to an earlier run. A failed trigger skips the read.
pub async fn generate_report<A: SiteAdmin + ?Sized>(admin: &A) -> RemoteResult<String> {
    admin.trigger_discoverability_report(true).await?;
    info!("Discoverability report requested (force=true)");

    let text = admin.get_discoverability_report().await?;
    info!("Restricted content discoverability report:\n{text}");
    Ok(text)
}
