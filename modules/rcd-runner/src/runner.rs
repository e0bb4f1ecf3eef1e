use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::admin::SiteAdmin;
use crate::batch::process_sites;
use crate::error::RunError;
use crate::input::{resolve, InputRequest};
use crate::report::generate_report;
use crate::types::{ActionRequest, RunSummary, SiteOutcome};

/// One invocation of the runner.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: InputRequest,
    pub admin_url: String,
    /// Release the admin session once the run is over.
    pub disconnect: bool,
}

/// Everything a run produced. `error` is the step that aborted the run, if any;
/// per-site failures are in `outcomes` and `summary.failed` instead.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub summary: RunSummary,
    pub outcomes: Vec<SiteOutcome>,
    pub report: Option<String>,
    pub error: Option<RunError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Default)]
struct RunState {
    summary: RunSummary,
    outcomes: Vec<SiteOutcome>,
    report: Option<String>,
    connected: bool,
    batch_ran: bool,
}

/// Resolve input, connect, run the batch or the report, then always emit the
/// summary and honour the disconnect request, whichever step failed.
pub async fn run<A: SiteAdmin + ?Sized>(admin: &mut A, request: &RunRequest) -> RunReport {
    let run_id = Uuid::new_v4();
    let span = info_span!("run", %run_id);

    async move {
        let mut state = RunState::default();

        let error = match execute(admin, request, &mut state).await {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "Run aborted");
                Some(e)
            }
        };

        finish(admin, request, &state).await;

        RunReport {
            run_id,
            summary: state.summary,
            outcomes: state.outcomes,
            report: state.report,
            error,
        }
    }
    .instrument(span)
    .await
}

async fn execute<A: SiteAdmin + ?Sized>(
    admin: &mut A,
    request: &RunRequest,
    state: &mut RunState,
) -> Result<(), RunError> {
    let resolved = resolve(&request.input)?;

    info!(admin_url = %request.admin_url, "Connecting to tenant admin endpoint");
    admin.connect(&request.admin_url).await?;
    state.connected = true;

    match resolved.action {
        ActionRequest::GenerateReport => {
            let text = generate_report(&*admin).await?;
            state.report = Some(text);
        }
        ActionRequest::SetFlag | ActionRequest::ClearFlag => {
            let restricted = resolved.action == ActionRequest::SetFlag;
            info!(action = %resolved.action, sites = resolved.targets.len(), "Starting batch");
            state.batch_ran = true;
            state.outcomes =
                process_sites(&*admin, restricted, &resolved.targets, &mut state.summary).await;
        }
    }

    Ok(())
}

async fn finish<A: SiteAdmin + ?Sized>(admin: &mut A, request: &RunRequest, state: &RunState) {
    let s = &state.summary;
    info!("Total sites processed: {}", s.processed);
    info!("Total sites removed: {}", s.removed);
    if state.batch_ran {
        info!("Total sites skipped: {}", s.skipped);
        info!("Total sites failed: {}", s.failed);
    }
    info!("Run complete. {s}");

    if !state.connected {
        return;
    }
    if request.disconnect {
        if let Err(e) = admin.disconnect().await {
            warn!(error = %e, "Failed to release admin session");
        }
    } else {
        info!("Leaving admin session open");
    }
}
