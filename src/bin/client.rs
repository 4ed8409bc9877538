use beacon::cli::{ClientCli, ClientCommand};
use beacon::client::Client;
use clap::Parser;
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = ClientCli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = Client::from_url(&cli.server)?;

    let response = match &cli.command {
        ClientCommand::All => client.get_all().await?,
        ClientCommand::Get(args) => client.get(&args.key).await?,
        ClientCommand::Put(args) => client.put(&args.key, &args.value).await?,
        ClientCommand::Index => client.index().await?,
    };

    let body = response.body_text();
    if response.status.as_u16() >= 400 {
        anyhow::bail!(
            "{} {}: {}",
            response.status.as_u16(),
            response.status.reason_phrase(),
            body.trim_end()
        );
    }

    println!("{}", body.trim_end());
    Ok(())
}
