use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::InputError;
use crate::types::{ActionRequest, ResolvedInput, SiteTarget, TargetSource};

/// What the operator asked for, before validation.
#[derive(Debug, Clone, Default)]
pub struct InputRequest {
    pub site_url: Option<String>,
    pub input_file: Option<PathBuf>,
    pub set_flag: bool,
    pub clear_flag: bool,
    pub generate_report: bool,
}

/// Turn an `InputRequest` into an ordered target list and a single action.
///
/// Lines from an input file are kept verbatim; blank entries are left in
/// place so the batch can count them as skipped.
pub fn resolve(request: &InputRequest) -> Result<ResolvedInput, InputError> {
    let (targets, source) = match (&request.site_url, &request.input_file) {
        (Some(_), Some(_)) => return Err(InputError::ConflictingSources),
        (Some(url), None) => (vec![SiteTarget::new(url.clone())], TargetSource::SingleUrl),
        (None, Some(path)) => (read_targets(path)?, TargetSource::File(path.clone())),
        (None, None) => {
            if request.generate_report {
                return Ok(ResolvedInput {
                    action: ActionRequest::GenerateReport,
                    targets: Vec::new(),
                    source: TargetSource::None,
                });
            }
            return Err(InputError::NoActionSpecified);
        }
    };

    let action = match (request.set_flag, request.clear_flag) {
        (true, true) => return Err(InputError::ConflictingActions),
        (true, false) => ActionRequest::SetFlag,
        (false, true) => ActionRequest::ClearFlag,
        (false, false) => return Err(InputError::NoActionSpecified),
    };

    if request.generate_report {
        warn!("Report generation cannot be combined with a site batch; ignoring --generate-report");
    }

    info!(count = targets.len(), %action, ?source, "Resolved site targets");
    Ok(ResolvedInput {
        action,
        targets,
        source,
    })
}

fn read_targets(path: &Path) -> Result<Vec<SiteTarget>, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !is_plain_text(path) {
        return Err(InputError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(content.lines().map(SiteTarget::new).collect())
}

fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}
