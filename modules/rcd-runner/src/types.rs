use std::fmt;
use std::path::PathBuf;

/// One site identity as it came from the input, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTarget(String);

impl SiteTarget {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace-only entries are skipped, never sent to the service.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Identity passed to the admin API.
    pub fn identity(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Display for SiteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequest {
    SetFlag,
    ClearFlag,
    GenerateReport,
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetFlag => write!(f, "set"),
            Self::ClearFlag => write!(f, "clear"),
            Self::GenerateReport => write!(f, "report"),
        }
    }
}

/// Where the target list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    None,
    SingleUrl,
    File(PathBuf),
}

/// Output of input resolution: what to do, and to which sites, in order.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub action: ActionRequest,
    pub targets: Vec<SiteTarget>,
    pub source: TargetSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Applied { title: String, restricted: bool },
    Skipped,
    Failed { error: String },
}

/// Result of processing one site entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutcome {
    pub url: String,
    pub status: OutcomeStatus,
}

/// Status line written for every site the service confirmed.
pub fn status_line(title: &str, url: &str, restricted: bool) -> String {
    format!(
        "Site: {title} | URL: {url} | RestrictContentOrgWideSearch: {}",
        if restricted { "True" } else { "False" }
    )
}

/// Counters for one invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub skipped: u64,
    pub removed: u64,
    pub failed: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} skipped={} removed={} failed={}",
            self.processed, self.skipped, self.removed, self.failed,
        )
    }
}
