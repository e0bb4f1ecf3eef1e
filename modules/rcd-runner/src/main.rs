use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use rcd_runner::{cli::Cli, logging, preflight, runner, AppConfig, RunRequest, SpoSiteAdmin};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let log_path = match logging::init(&cli.log_dir, &cli.log_file) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    info!(log = %log_path.display(), "Restricted Content Discovery runner starting");

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = AppConfig::from_env();
    config.log_redacted();

    let admin_url = cli.admin_url(config.admin_url.as_deref());
    let credentials = preflight::check_environment(&config, &admin_url)?;

    let request = RunRequest {
        input: cli.input_request(),
        admin_url,
        disconnect: cli.disconnect,
    };

    let mut admin = SpoSiteAdmin::new(credentials);
    let report = runner::run(&mut admin, &request).await;

    info!(run_id = %report.run_id, "Finished. {}", report.summary);

    Ok(report.is_success())
}
