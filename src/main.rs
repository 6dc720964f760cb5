use webroot::config::Config;
use webroot::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = Server::bind(&cfg).await?;
    let handle = server.spawn()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    tokio::select! {
        res = handle.stop() => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Second interrupt, exiting without waiting");
            Ok(())
        }
    }
}
