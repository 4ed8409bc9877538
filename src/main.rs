use beacon::cli::ServerCli;
use beacon::server::{self, Server};
use beacon::store::FileStore;
use clap::Parser;
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = ServerCli::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if cfg.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let listener = server::bind(&cfg).await?;
    let store = FileStore::new(&cfg.db_location);
    tracing::info!(db = %store.path().display(), "Using key-value store");

    Server::new(listener, store, &cfg)
        .run(server::shutdown::signal())
        .await;

    Ok(())
}
