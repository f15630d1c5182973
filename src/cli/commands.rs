//! Command implementations for the fathom CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::FathomConfig;
use crate::coordinator::IndexCoordinator;
use crate::document::Manifest;
use crate::error::Result;
use crate::index::correlation::CorrelationEdge;
use crate::protocol::SearchService;
use crate::query::SearchScope;
use crate::spelling::provider::{DictionaryFormat, DictionaryProvider, FileDictionary, StaticDictionary};

/// Execute a CLI command.
pub async fn execute_command(args: FathomArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search(search_args.clone(), &args).await,
        Command::Serve(serve_args) => serve(serve_args.clone()).await,
    }
}

/// Build a coordinator from the shared engine options.
pub fn build_coordinator(engine: &EngineArgs) -> Result<Arc<IndexCoordinator>> {
    let config = match &engine.config {
        Some(path) => FathomConfig::load_from_file(path)?,
        None => FathomConfig::default(),
    };

    let dictionary: Arc<dyn DictionaryProvider> = match &engine.dictionary {
        Some(path) => {
            let format = if engine.frequency_dictionary {
                DictionaryFormat::Frequency
            } else {
                DictionaryFormat::WordList
            };
            Arc::new(FileDictionary::new(path, format))
        }
        None => Arc::new(StaticDictionary::empty()),
    };

    let coordinator = IndexCoordinator::new(config, dictionary)?;

    if let Some(path) = &engine.correlations {
        let edges = load_correlations(path)?;
        coordinator.correlate_edges(&edges)?;
        log::info!("Loaded {} correlations from {}", edges.len(), path.display());
    }

    Ok(Arc::new(coordinator))
}

/// Read a JSON array of manifests.
pub fn load_manifests(path: &Path) -> Result<Vec<Manifest>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_correlations(path: &Path) -> Result<Vec<CorrelationEdge>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Index the manifests, wait for spelling, and run one query.
async fn search(args: SearchArgs, cli_args: &FathomArgs) -> Result<()> {
    let coordinator = build_coordinator(&args.engine)?;
    let manifests = load_manifests(&args.manifests)?;

    let start_time = Instant::now();
    let task = coordinator.sync(&manifests)?;
    if let Err(e) = task.wait().await {
        log::debug!("Searching without spelling corrections: {e}");
    }
    log::info!("Indexed {} in {:?}", args.manifests.display(), start_time.elapsed());

    let scope = SearchScope::from_properties(&args.properties);
    let response = coordinator.search(&args.query, &scope, args.link_analysis)?;

    output_result(
        &format!("Search for '{}' completed", args.query),
        &response,
        cli_args,
    )?;

    if cli_args.verbosity() > 2
        && let Some(stats) = coordinator.stats()
    {
        output_result("Index statistics", &stats, cli_args)?;
    }

    Ok(())
}

/// Answer JSON-lines requests until stdin closes.
async fn serve(args: ServeArgs) -> Result<()> {
    let coordinator = build_coordinator(&args.engine)?;
    if let Some(path) = &args.manifests {
        let manifests = load_manifests(path)?;
        coordinator.sync(&manifests)?;
    }

    let service = SearchService::new(coordinator);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = service.handle_line(line);
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    log::info!("stdin closed, shutting down");
    Ok(())
}
