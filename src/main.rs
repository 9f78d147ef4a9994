// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use csvloader::utils::logging::{format_info, format_success, format_warning, init_logger};
use csvloader::{
    AzureDeveloperCliCredential, BlobServiceClient, Config, ConfigOverrides, Loader, RunOutcome,
    SearchServiceClient, TokenCredential,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "csvloader")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Load each CSV file into a single entry in Azure AI Search, uploading to blob storage and indexing in a search index",
    long_about = None,
    after_help = "Example: csvloader '*.csv' --storageaccount myaccount --container mycontainer --searchservice mysearch --index myindex -v"
)]
struct Cli {
    /// File name pattern matched inside the CSV folder (default: *.csv)
    files: Option<String>,

    /// Azure Blob Storage account name
    #[arg(long)]
    storageaccount: Option<String>,

    /// Azure Blob Storage container name
    #[arg(long)]
    container: Option<String>,

    /// Directory (tenant) to authenticate against
    #[arg(long)]
    tenantid: Option<String>,

    /// Azure AI Search service where content is indexed (must exist already)
    #[arg(long)]
    searchservice: Option<String>,

    /// Search index name (created if it does not exist)
    #[arg(long)]
    index: Option<String>,

    /// Delete the search index and the storage container
    #[arg(long, action = ArgAction::SetTrue)]
    deleteindex: bool,

    /// Folder the CSV files are read from
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            storage_account: self.storageaccount.clone(),
            container: self.container.clone(),
            tenant_id: self.tenantid.clone(),
            search_service: self.searchservice.clone(),
            index: self.index.clone(),
            csv_dir: self.csv_dir.clone(),
            pattern: self.files.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("=== csvloader starting ===");

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(cli.overrides());
    config.validate().context("Invalid configuration")?;

    let credential: Arc<dyn TokenCredential> =
        Arc::new(AzureDeveloperCliCredential::from_config(&config.auth));

    let blobs = BlobServiceClient::new(&config.storage, Arc::clone(&credential))
        .context("Failed to create blob storage client")?;
    let search = SearchServiceClient::new(&config.search, credential)
        .context("Failed to create search client")?;

    debug!("Storage endpoint: {}", blobs.endpoint());
    debug!("Search endpoint: {}", search.endpoint());

    let loader = Loader::new(config, blobs, search).with_progress(!cli.verbose, cli.color);

    let outcome = loader.run(cli.deleteindex).await.context(if cli.deleteindex {
        "Teardown failed"
    } else {
        "Load failed"
    })?;

    match outcome {
        RunOutcome::TornDown => {
            println!("{}", format_success("Search index and blob container deleted"));
        }
        RunOutcome::NoFiles => {
            println!(
                "{}",
                format_warning(&format!(
                    "No CSV files found in {}",
                    loader.config().loader.csv_dir.display()
                ))
            );
        }
        RunOutcome::Processed(stats) => {
            println!("{}", format_success(&stats.summary()));
            debug!("Upload throughput: {:.0} bytes/s", stats.bytes_per_second());
            if stats.documents_failed > 0 {
                println!(
                    "{}",
                    format_info(&format!(
                        "{:.1}% of documents were accepted by the index",
                        stats.success_rate()
                    ))
                );
            }
        }
    }

    Ok(())
}
