//! Omnisearch MCP Server - Main entry point
//!
//! Wires the stores, providers, aggregator and indexing scheduler together
//! and serves them over stdio.

use anyhow::Result;
use omnisearch_mcp_server::launcher::{ActionLauncher, SystemLauncher};
use omnisearch_mcp_server::providers::{
    AppsProvider, CommandsProvider, ContactSource, ContactsProvider, FilesProvider,
    JsonContactSource, StaticContactSource,
};
use omnisearch_mcp_server::repositories::{
    DocumentStore, InMemoryDocumentStore, JsonSettingsStore, SettingsStore,
};
use omnisearch_mcp_server::services::{
    IndexService, IndexServiceImpl, SearchService, SearchServiceImpl,
};
use omnisearch_mcp_server::{
    Config, IndexScheduler, IndexingPipeline, MetricsTracker, OmnisearchMcpServer, Provider,
    SearchAggregator,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let fallback_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting Omnisearch MCP Server with data dir: {}",
        config.data_dir.display()
    );

    let metrics = MetricsTracker::new();
    let cache_ttl = Duration::from_secs(config.apps_cache_ttl_secs);

    // Stores
    let settings =
        Arc::new(JsonSettingsStore::open(config.settings_path()).await?) as Arc<dyn SettingsStore>;
    let documents = Arc::new(InMemoryDocumentStore::new()) as Arc<dyn DocumentStore>;

    // Providers, in priority order
    let contact_source: Arc<dyn ContactSource> = match &config.contacts_file {
        Some(path) => Arc::new(JsonContactSource::new(path)),
        None => Arc::new(StaticContactSource::default()),
    };
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(AppsProvider::new(
            config.app_dirs.clone(),
            settings.clone(),
            cache_ttl,
            config.max_results_per_provider,
        )),
        Arc::new(ContactsProvider::new(
            contact_source,
            settings.clone(),
            cache_ttl,
            config.max_results_per_provider,
        )),
        Arc::new(FilesProvider::new(
            documents.clone(),
            settings.clone(),
            config.max_results_per_provider,
        )),
        Arc::new(CommandsProvider::new(
            settings.clone(),
            config.max_results_per_provider,
        )),
    ];

    let aggregator = Arc::new(SearchAggregator::new(
        providers,
        config.max_merged_results,
        metrics.clone(),
    ));
    let provider_ids = aggregator.provider_ids();

    // Indexing
    let pipeline = Arc::new(IndexingPipeline::new(
        documents.clone(),
        settings.clone(),
        metrics.clone(),
    ));
    let scheduler = Arc::new(IndexScheduler::new(pipeline, documents, settings.clone()));

    // Roots known from a previous run are re-indexed; documents live in memory
    for (root_id, root) in settings.current().roots {
        if let Err(e) = scheduler
            .trigger(
                Some(&root_id),
                Some(&root.uri),
                Some(&root.display_name),
            )
            .await
        {
            error!(root_id = %root_id, "Failed to re-index root: {}", e);
        }
    }

    // Services
    let launcher = Arc::new(SystemLauncher::default()) as Arc<dyn ActionLauncher>;
    let search_service =
        Arc::new(SearchServiceImpl::new(aggregator, launcher)) as Arc<dyn SearchService>;
    let index_service = Arc::new(IndexServiceImpl::new(
        scheduler.clone(),
        settings,
        provider_ids,
    )) as Arc<dyn IndexService>;

    let server = OmnisearchMcpServer::new(search_service, index_service);
    info!("Omnisearch MCP Server initialized");

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    let result = omnisearch_mcp_server::server::run_server(server).await;

    scheduler.shutdown().await;
    info!("{}", metrics.summary());
    info!("Omnisearch MCP Server shutdown complete");
    result
}
