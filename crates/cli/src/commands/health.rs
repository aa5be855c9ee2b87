//! Health command: metadata service health check.

use anyhow::Result;
use reporter_client::{CancellationToken, ClientError, ErrorKind};
use reporter_config::Config;
use tracing::info;

pub async fn run(config: Config, cancel: &CancellationToken) -> Result<()> {
    let client = super::build_grafana_client(&config)?;
    info!(url = %config.grafana.url, "performing health check");

    let health = tokio::select! {
        res = client.health() => res?,
        _ = cancel.canceled() => return Err(ClientError::new(ErrorKind::Canceled).into()),
    };

    println!("Version:  {}", health.version);
    println!("Commit:   {}", health.commit);
    println!("Database: {}", health.database);
    if !health.is_ok() {
        anyhow::bail!("metadata service database is not healthy");
    }
    Ok(())
}
