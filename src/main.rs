use std::process::ExitCode;

use clap::{Parser, Subcommand};

use azure_pr_backup::azure::client::AzureDevOpsClient;
use azure_pr_backup::core::backup::BackupOrchestrator;
use azure_pr_backup::core::deadline::run_with_deadline;
use azure_pr_backup::core::restore::RestoreOrchestrator;
use azure_pr_backup::logger::cleanup::{cleanup_old_logs, LOG_RETENTION};
use azure_pr_backup::logger::init::init_logger;
use azure_pr_backup::store::snapshot::SnapshotStore;
use azure_pr_backup::utils::config::AppConfig;
use azure_pr_backup::utils::error::BackupResult;

#[derive(Parser)]
#[command(version, about = "Back up and restore Azure DevOps pull requests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot active pull requests and their comment threads
    Backup,
    /// Push a snapshot's pull requests back to Azure DevOps
    Restore {
        /// Snapshot file to restore from; overrides RESTORE_STATE_FILE
        #[arg(long)]
        state_file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[main] {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logs_init_status = init_logger(config.log_dir(), config.log_level());
    if !logs_init_status {
        log::error!("[main] Unable to set up file logger, logging to stdout only");
    }
    cleanup_old_logs(config.log_dir(), LOG_RETENTION);

    let run_deadline = config.run_deadline();
    let run_res = run_with_deadline(run_deadline, run_command(cli.command, config)).await;
    match run_res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("[main] Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run completed without per-PR failures that need
/// operator attention.
async fn run_command(command: Command, config: AppConfig) -> BackupResult<bool> {
    let client = AzureDevOpsClient::new(&config)?;
    let store = SnapshotStore::new(config.backup_root().clone());
    match command {
        Command::Backup => {
            let report = BackupOrchestrator::new(client, store)
                .backup_active_pull_requests()
                .await?;
            log::info!(
                "[run_command] Backup finished: {} pull requests, snapshot {:?}, {} errors",
                report.pull_requests.len(),
                report.snapshot_path,
                report.failures.len()
            );
            Ok(true)
        }
        Command::Restore { state_file } => {
            let config = config.with_restore_state_file(state_file);
            let report = RestoreOrchestrator::new(client, store)
                .restore_pull_requests(config.restore_state_file())
                .await?;
            Ok(report.failed() == 0)
        }
    }
}
