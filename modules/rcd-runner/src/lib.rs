pub mod admin;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod preflight;
pub mod report;
pub mod runner;
pub mod types;

pub use admin::{SiteAdmin, SiteState, SpoSiteAdmin};
pub use config::{AppConfig, Credentials};
pub use error::{EnvironmentError, InputError, RemoteCallError, RemoteOperation, RunError};
pub use input::InputRequest;
pub use runner::{run, RunReport, RunRequest};
pub use types::{ActionRequest, OutcomeStatus, RunSummary, SiteOutcome, SiteTarget};
