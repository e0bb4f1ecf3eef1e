use tracing::{error, info, warn};

use crate::admin::SiteAdmin;
use crate::error::RemoteResult;
use crate::types::{status_line, OutcomeStatus, RunSummary, SiteOutcome, SiteTarget};

/// Apply `restricted` to every target in order, one site at a time.
///
/// Blank entries are skipped. A failed remote call is logged and counted and
/// the loop moves on; there is no retry and no rollback of earlier sites.
pub async fn process_sites<A: SiteAdmin + ?Sized>(
    admin: &A,
    restricted: bool,
    targets: &[SiteTarget],
    summary: &mut RunSummary,
) -> Vec<SiteOutcome> {
    let total = targets.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, target) in targets.iter().enumerate() {
        if target.is_blank() {
            summary.skipped += 1;
            warn!(line = i + 1, "Skipping blank site entry");
            outcomes.push(SiteOutcome {
                url: target.as_str().to_string(),
                status: OutcomeStatus::Skipped,
            });
            continue;
        }

        let identity = target.identity();
        let status = match apply(admin, identity, restricted).await {
            Ok((title, url, now_restricted)) => {
                info!("{}", status_line(&title, &url, now_restricted));
                if restricted {
                    summary.processed += 1;
                } else {
                    summary.removed += 1;
                }
                OutcomeStatus::Applied {
                    title,
                    restricted: now_restricted,
                }
            }
            Err(e) => {
                summary.failed += 1;
                error!(site = identity, error = %e, "Failed to update site");
                OutcomeStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        outcomes.push(SiteOutcome {
            url: identity.to_string(),
            status,
        });

        if (i + 1) % 50 == 0 {
            info!(done = i + 1, total, "Batch progress. {summary}");
        }
    }

    outcomes
}

/// Write the flag, then read the site back so the log shows what the service holds.
async fn apply<A: SiteAdmin + ?Sized>(
    admin: &A,
    identity: &str,
    restricted: bool,
) -> RemoteResult<(String, String, bool)> {
    admin.set_site_flag(identity, restricted).await?;
    let site = admin.get_site(identity).await?;
    Ok((site.title, site.url, site.restricted))
}
