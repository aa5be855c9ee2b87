//! Dashboards command: list resolved dashboards and their variables.

use anyhow::Result;
use reporter_client::{CancellationToken, ClientError, ErrorKind, GrafanaClient, Organization};
use reporter_config::Config;

pub async fn run(config: Config, org_id: Option<i64>, cancel: &CancellationToken) -> Result<()> {
    let client = super::build_grafana_client(&config)?;

    let mut orgs = tokio::select! {
        res = client.list_organizations() => res?,
        _ = cancel.canceled() => return Err(canceled()),
    };
    if let Some(org_id) = org_id {
        orgs.retain(|org| org.id == org_id);
        if orgs.is_empty() {
            anyhow::bail!("organization {org_id} not found");
        }
    }

    for org in &orgs {
        print_org(&client, org, cancel).await?;
    }
    Ok(())
}

async fn print_org(
    client: &GrafanaClient,
    org: &Organization,
    cancel: &CancellationToken,
) -> Result<()> {
    let summaries = tokio::select! {
        res = client.list_dashboards(org) => res?,
        _ = cancel.canceled() => return Err(canceled()),
    };

    println!("Organization {} ({}): {} dashboards", org.id, org.name, summaries.len());
    for summary in summaries {
        let variables = client.resolve_variables(&summary.uid).await?;
        match summary.folder_title.as_deref() {
            Some(folder) => println!(
                "  {}\t{} ({}), {} variables",
                summary.uid,
                summary.title,
                folder,
                variables.len()
            ),
            None => println!(
                "  {}\t{}, {} variables",
                summary.uid,
                summary.title,
                variables.len()
            ),
        }
    }
    Ok(())
}

fn canceled() -> anyhow::Error {
    ClientError::new(ErrorKind::Canceled).into()
}
