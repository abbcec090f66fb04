//! CLI harness for exercising the wallet directory client
//!
//! Subcommands:
//! - Page through the listing
//! - One-shot and interactive (debounced) search
//! - Featured wallets and chain artwork prefetch

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{info, warn};
use w3m_api::AppMetadata;
use w3m_core::{
    DirectoryController, FetchOutcome, ModalConfig, SearchDebouncer, StoreHandle, StoreSnapshot,
    WalletEntry, ETH_CHAINS,
};

#[derive(Parser)]
#[command(name = "w3m-harness")]
#[command(about = "Wallet directory testing harness", long_about = None)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project id sent as x-project-id
    #[arg(long, env = "W3M_PROJECT_ID", global = true)]
    project_id: Option<String>,

    /// Directory base URL
    #[arg(long, env = "W3M_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the wallet listing
    List {
        /// Pages to fetch (stops early once the listing is exhausted)
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Run a single search
    Search {
        /// Search term
        term: String,
    },

    /// Read search terms from stdin, one per line, debounced
    Interactive,

    /// Fetch the featured wallets
    Featured,

    /// Prefetch chain artwork
    Chains,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Directory: {}", config.api_url);

    let client = config.connect().context("failed to build directory client")?;
    let controller = DirectoryController::new(Arc::new(client), StoreHandle::spawn(), config);

    match cli.command {
        Commands::List { pages } => run_list(&controller, pages).await?,
        Commands::Search { term } => run_search(&controller, &term).await?,
        Commands::Interactive => run_interactive(&controller).await?,
        Commands::Featured => run_featured(&controller).await?,
        Commands::Chains => run_chains(&controller).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ModalConfig> {
    let mut config = match &cli.config {
        Some(path) => ModalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ModalConfig::new(String::new(), AppMetadata::default()),
    };

    if let Some(project_id) = &cli.project_id {
        config.project_id = project_id.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }

    config
        .validate()
        .context("set W3M_PROJECT_ID or pass --project-id")?;
    Ok(config)
}

async fn run_list(controller: &DirectoryController, pages: u32) -> anyhow::Result<()> {
    info!("Fetching up to {} listing pages", pages);

    let pb = ProgressBar::new(u64::from(pages));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    for _ in 0..pages {
        match controller.fetch_listing_page().await? {
            FetchOutcome::Applied { received } => {
                let snapshot = controller.store().snapshot();
                pb.inc(1);
                pb.set_message(format!(
                    "+{} ({}/{} wallets)",
                    received,
                    snapshot.wallets.len(),
                    snapshot.page_state.total_entries
                ));
            }
            FetchOutcome::Exhausted => {
                pb.set_message("listing exhausted");
                break;
            }
            FetchOutcome::Stale => warn!("Listing response superseded"),
        }
    }
    pb.finish();

    let snapshot = controller.store().snapshot();
    print_wallets(&snapshot, &snapshot.wallets_by_order());
    info!(
        "Page {}/{} | {} wallets loaded",
        snapshot.page_state.page,
        snapshot.page_state.total_pages.unwrap_or(0),
        snapshot.wallets.len()
    );
    Ok(())
}

async fn run_search(controller: &DirectoryController, term: &str) -> anyhow::Result<()> {
    if let FetchOutcome::Applied { received } = controller.fetch_search(term).await? {
        info!("{} results for {:?}", received, term);
    }
    let snapshot = controller.store().snapshot();
    print_wallets(&snapshot, &snapshot.searched_wallets);
    Ok(())
}

async fn run_interactive(controller: &DirectoryController) -> anyhow::Result<()> {
    info!("Type a search term per line; Ctrl-D to quit");

    let (terms, input) = mpsc::channel(16);
    let mut debounced = SearchDebouncer::default().spawn(input);

    let reader = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if terms.send(line.trim().to_string()).await.is_err() {
                break;
            }
        }
    });

    while let Some(term) = debounced.recv().await {
        // Failures already raised a toast; keep reading
        if let Err(e) = run_search(controller, &term).await {
            warn!("Search for {:?} failed: {}", term, e);
        }
    }

    reader.await?;
    Ok(())
}

async fn run_featured(controller: &DirectoryController) -> anyhow::Result<()> {
    controller.fetch_featured().await?;
    let snapshot = controller.store().snapshot();
    print_wallets(&snapshot, &snapshot.featured_wallets);
    info!("{} wallets in the directory", snapshot.total_wallets);
    Ok(())
}

async fn run_chains(controller: &DirectoryController) -> anyhow::Result<()> {
    let fetched = controller.prefetch_chain_images(ETH_CHAINS).await?;
    let snapshot = controller.store().snapshot();

    for chain in ETH_CHAINS {
        let image = snapshot
            .chain_images
            .get(chain.image_id)
            .map(|image| format!("{:?} {}x{}", image.format, image.width, image.height))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<20} {:<18} {}", chain.chain_id, chain.name, image);
    }
    info!("Fetched {}/{} chain images", fetched, ETH_CHAINS.len());
    Ok(())
}

fn print_wallets(snapshot: &StoreSnapshot, wallets: &[WalletEntry]) {
    for wallet in wallets {
        let image = snapshot
            .wallet_image(wallet)
            .map(|image| format!("{}x{}", image.width, image.height))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>5}  {:<32} {:<10} {}", wallet.order, wallet.name, image, wallet.id);
    }
}
