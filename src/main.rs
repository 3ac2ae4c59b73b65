use aisearch_api::{CatalogSource, HttpRelevanceClient, RestApi, DEFAULT_CATALOG_URL};
use aisearch_core::{SearchOutcome, SearchSession, SortOption};
use aisearch_relevance::{
    OpenAiProvider, ProviderConfig, RelevanceService, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Product search ranked by a large language model
#[derive(Parser, Debug)]
#[command(name = "aisearch")]
#[command(about = "LLM-ranked product search", long_about = None)]
struct Args {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /api/v1/ai-search
    Serve(ServeArgs),
    /// Run a query through a running server and print the results
    Search(SearchArgs),
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(long, default_value_t = 4001)]
    port: u16,

    /// Completion model
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    provider_url: String,

    /// Upper bound on a single provider call
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    provider_timeout_secs: u64,

    /// Environment variable holding the provider credential
    #[arg(long, default_value = DEFAULT_API_KEY_ENV)]
    api_key_env: String,
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// Free-text query; blank shows the whole catalog
    #[arg(default_value = "")]
    query: String,

    /// Root URL of the aisearch server
    #[arg(long, default_value = "http://localhost:4001")]
    server: String,

    /// Product listing endpoint
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Exact category to keep
    #[arg(long)]
    category: Option<String>,

    /// default, price-asc, price-desc or rating-desc
    #[arg(long, default_value = "default")]
    sort: SortOption,

    /// Request timeout for catalog and search calls
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    match args.command {
        Command::Serve(serve) => run_server(serve).await,
        Command::Search(search) => run_search(search).await,
    }
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting aisearch v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to start without a credential
    let config = ProviderConfig::from_env(&args.api_key_env)?
        .with_model(args.model.clone())
        .with_base_url(args.provider_url.clone())
        .with_timeout(Duration::from_secs(args.provider_timeout_secs));
    info!("Completion provider: {} ({})", config.model, config.base_url);

    let provider = Arc::new(OpenAiProvider::new(config)?);
    let service = Arc::new(RelevanceService::new(provider));

    let http_handle = RestApi::spawn(service, args.host.clone(), args.port);
    info!("AI search: http://{}:{}/api/v1/ai-search", args.host, args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined? {
                Ok(served) => served?,
                Err(_) => anyhow::bail!("HTTP server thread panicked"),
            }
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(args.timeout_secs);

    let catalog = CatalogSource::new(args.catalog_url.clone(), timeout)?.fetch().await?;
    let mut session = SearchSession::new(catalog);
    {
        let filter = session.filter_mut();
        filter.set_price_range(args.min_price, args.max_price)?;
        filter.set_category(args.category.clone());
        filter.set_sort(args.sort);
    }

    let client = HttpRelevanceClient::new(&args.server, timeout)?;
    match session.search(&args.query, &client).await {
        SearchOutcome::Failed { reason } => {
            warn!("Search failed ({}), showing the catalog unfiltered by relevance", reason)
        }
        SearchOutcome::Applied { matched } => info!("{} products matched", matched),
        SearchOutcome::Reset | SearchOutcome::Stale => {}
    }

    let display = session.display();
    for product in &display {
        println!(
            "{:>4}  ${:>8.2}  {:.1} ({:>4} reviews)  [{}]  {}",
            product.id,
            product.price,
            product.rating.rate,
            product.rating.count,
            product.category,
            product.title
        );
    }
    println!("{} of {} products shown", display.len(), session.catalog().len());
    Ok(())
}
