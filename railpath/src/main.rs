use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use railpath::cache::{CacheConfig, CachedRailClient};
use railpath::cli::{CliError, PromptPolicy, RunFile, render_itinerary};
use railpath::planner::{Planner, RouteQuery, RouteRequest, SearchOutcome};
use railpath::rail::{RailClient, RailConfig};
use railpath::stations::{
    StationCache, StationCacheConfig, StationClient, StationClientConfig, StationDirectory,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("railpath=info")),
        )
        .with_writer(io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(CliError::Usage)?;
    let run = RunFile::load(&path)?;

    // Station directory, from disk if fresh
    let cache_config = match &run.station_cache {
        Some(path) => StationCacheConfig::new(path),
        None => StationCacheConfig::default(),
    };
    let station_client = StationClient::new(StationClientConfig::new())?;
    let directory = Arc::new(
        StationDirectory::load(&station_client, &StationCache::new(cache_config)).await?,
    );

    let origin = directory.resolve(&run.origin)?;
    let destination = directory.resolve(&run.destination)?;

    let rail = RailClient::new(
        RailConfig::new().with_pricing(run.pricing),
        Arc::clone(&directory),
    )?;
    let client = CachedRailClient::new(rail, &CacheConfig::default());

    let request = RouteRequest::new(
        origin.clone(),
        destination.clone(),
        run.date,
        run.search.exact_origin,
        run.search.exact_destination,
    );
    let hypothesis = client
        .direct_trains(&request)
        .await?
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(&run.train))
        .ok_or_else(|| CliError::HypothesisNotFound {
            train: run.train.clone(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: run.date,
        })?;
    println!("Searching around {hypothesis}");

    let planner = Planner::new(&client, &client, &directory, &run.search).with_filter(&run.filter);
    let mut policy = PromptPolicy::new(io::stdin().lock(), io::stdout(), run.sort.clone());

    match planner.search(&hypothesis, &mut policy).await? {
        SearchOutcome::Found(itinerary) => {
            println!();
            print!("{}", render_itinerary(&itinerary));
        }
        SearchOutcome::NoPath | SearchOutcome::Aborted => println!("no itinerary found"),
    }
    Ok(())
}
