//! Progress engine demonstration binary.
//!
//! Assembles a [`ProgressService`] over an in-memory source seeded from the
//! content data directory, then plays a scripted learner session and prints
//! snapshots and reward quotes along the way.
//!
//! # Environment
//!
//! - `PROGRESS_DATA_DIR`: directory holding `config.toml`, `tables.toml` and
//!   `catalog.toml` (defaults to the data bundled with `progress-content`)
//! - `PROGRESS_*_TTL_MS`, `PROGRESS_CACHE_CAPACITY`: cache policy
//! - `RUST_LOG`: log filter

mod session;

use std::sync::Arc;

use anyhow::Result;
use progress_content::ContentFactory;
use progress_core::Curriculum;
use progress_runtime::{
    Clock, InMemorySource, ManualClock, ProgressService, ServiceConfig, SystemClock,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let factory = match std::env::var("PROGRESS_DATA_DIR") {
        Ok(dir) => ContentFactory::new(dir),
        Err(_) => ContentFactory::bundled(),
    };
    info!(data_dir = %factory.data_dir().display(), "loading content");

    // Cache policy comes from the environment; engine policy and reward
    // amounts come from the data files.
    let mut config = ServiceConfig::from_env();
    config.engine = factory.load_config()?;
    config.rewards = factory.load_tables()?;
    let catalog = factory.load_catalog()?;

    let source = Arc::new(
        InMemorySource::new(Curriculum::new(&config.engine))
            .with_content(catalog.adventures().to_vec(), catalog.briefings().to_vec()),
    );
    let clock = Arc::new(ManualClock::new(SystemClock.now()));

    let service = ProgressService::builder()
        .config(config)
        .source(source.clone())
        .clock(clock.clone())
        .build()?;

    session::run(&service, &clock).await?;

    println!();
    println!("source fetches: {}", source.fetch_count());
    service.close();
    Ok(())
}
