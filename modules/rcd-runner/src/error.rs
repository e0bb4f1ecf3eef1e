//! Error taxonomy for a run: environment, input, and remote call failures.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pre-flight failures. Nothing has run yet when one of these surfaces.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Neither a bearer token nor a complete client-credentials set was configured
    #[error("missing credentials: set SPO_ACCESS_TOKEN, or SPO_TENANT_ID, SPO_CLIENT_ID and SPO_CLIENT_SECRET")]
    MissingCredentials,

    #[error("admin endpoint must be an https URL: {0}")]
    InvalidAdminUrl(String),

    /// The log directory or file could not be opened
    #[error("log sink unavailable at {path}: {source}")]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Problems with what the operator asked for.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no action specified: pass a site URL or input file with --set/--clear, or --generate-report")]
    NoActionSpecified,

    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("unsupported input file format (expected .txt): {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("pass either a single site URL or an input file, not both")]
    ConflictingSources,

    #[error("--set and --clear are mutually exclusive")]
    ConflictingActions,

    #[error("failed to read input file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which admin API call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    Connect,
    Disconnect,
    GetSite,
    SetSiteFlag,
    TriggerReport,
    GetReport,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Disconnect => write!(f, "disconnect"),
            Self::GetSite => write!(f, "get_site"),
            Self::SetSiteFlag => write!(f, "set_site_flag"),
            Self::TriggerReport => write!(f, "trigger_discoverability_report"),
            Self::GetReport => write!(f, "get_discoverability_report"),
        }
    }
}

/// A failed call against the admin service.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct RemoteCallError {
    pub operation: RemoteOperation,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl RemoteCallError {
    pub fn new(
        operation: RemoteOperation,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Remote(#[from] RemoteCallError),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteCallError>;
