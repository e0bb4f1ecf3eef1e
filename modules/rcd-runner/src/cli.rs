use std::path::PathBuf;

use clap::Parser;

use crate::input::InputRequest;
use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

#[derive(Parser, Debug)]
#[command(name = "rcd")]
#[command(about = "Toggle Restricted Content Discovery on SharePoint Online sites")]
#[command(version)]
pub struct Cli {
    /// Tenant domain (contoso, contoso.onmicrosoft.com or contoso.sharepoint.com)
    #[arg(long, env = "SPO_TENANT")]
    pub tenant: String,

    /// Single site URL to update
    #[arg(long, conflicts_with = "input_file")]
    pub site_url: Option<String>,

    /// Text file with one site URL per line
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Turn Restricted Content Discovery on
    #[arg(long, conflicts_with = "clear")]
    pub set: bool,

    /// Turn Restricted Content Discovery off
    #[arg(long)]
    pub clear: bool,

    /// Request the org-wide discoverability report and print the latest one
    #[arg(long)]
    pub generate_report: bool,

    /// Release the admin session when done
    #[arg(long)]
    pub disconnect: bool,

    /// Directory for the log file (created if missing)
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Log file name
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Override the tenant admin endpoint
    #[arg(long)]
    pub admin_url: Option<String>,
}

impl Cli {
    pub fn input_request(&self) -> InputRequest {
        InputRequest {
            site_url: self.site_url.clone(),
            input_file: self.input_file.clone(),
            set_flag: self.set,
            clear_flag: self.clear,
            generate_report: self.generate_report,
        }
    }

    /// `--admin-url`, then `configured`, then the URL derived from `--tenant`.
    pub fn admin_url(&self, configured: Option<&str>) -> String {
        self.admin_url
            .as_deref()
            .or(configured)
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| spo_admin_client::admin_url_for_tenant(&self.tenant))
    }
}
