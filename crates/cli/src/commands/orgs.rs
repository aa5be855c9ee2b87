//! Orgs command: list organizations.

use anyhow::Result;
use reporter_client::{CancellationToken, ClientError, ErrorKind};
use reporter_config::Config;

pub async fn run(config: Config, cancel: &CancellationToken) -> Result<()> {
    let client = super::build_grafana_client(&config)?;

    let orgs = tokio::select! {
        res = client.list_organizations() => res?,
        _ = cancel.canceled() => return Err(ClientError::new(ErrorKind::Canceled).into()),
    };

    println!("Found {} organizations:\n", orgs.len());
    for org in orgs {
        println!("  {}\t{}", org.id, org.name);
    }
    Ok(())
}
