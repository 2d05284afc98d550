use std::sync::Arc;

use anyhow::Result;
use camctl_core::SessionStatus;
use clap::Args;
use tokio::task::JoinSet;

use super::{CameraContext, ConnectionArgs};

#[derive(Args)]
pub struct StatusArgs {
    /// Camera addresses (host, host:port or URL)
    #[arg(required = true)]
    pub addresses: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatusArgs, connection: &ConnectionArgs) -> Result<()> {
    let ctx = CameraContext::load(connection)?;
    let statuses = check(&ctx, &args.addresses).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        for status in &statuses {
            println!("{}", format_status(status));
        }
    }
    Ok(())
}

/// Check every address concurrently; results follow the input order
pub async fn check(ctx: &CameraContext, addresses: &[String]) -> Result<Vec<SessionStatus>> {
    let params = addresses
        .iter()
        .map(|address| ctx.params(address))
        .collect::<Result<Vec<_>>>()?;

    let mut checks = JoinSet::new();
    for p in params.iter().cloned() {
        let manager = Arc::clone(ctx.manager());
        checks.spawn(async move { manager.liveness(&p).await });
    }
    while let Some(result) = checks.join_next().await {
        result?;
    }

    let mut statuses = Vec::with_capacity(params.len());
    for p in &params {
        if let Some(status) = ctx.manager().status(&p.address().key()).await {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

fn format_status(status: &SessionStatus) -> String {
    let line = format!(
        "{:<24} {:<8} {:<7} {}",
        status.address,
        if status.online { "online" } else { "offline" },
        if status.ptz_supported { "ptz" } else { "no-ptz" },
        status.failure.as_deref().unwrap_or_default(),
    );
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CamctlConfig;
    use camctl_core::{DeviceAddress, DeviceError, Session};

    #[tokio::test]
    async fn test_check_reports_in_input_order() {
        let ctx = CameraContext::new(CamctlConfig::default(), true);
        let addresses = vec!["10.0.0.6".to_string(), "10.0.0.5".to_string()];

        let statuses = check(&ctx, &addresses).await.unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].address, "10.0.0.6");
        assert_eq!(statuses[1].address, "10.0.0.5");
        assert!(statuses.iter().all(|s| s.online && s.ptz_supported));
    }

    #[tokio::test]
    async fn test_check_fails_fast_on_bad_address() {
        let ctx = CameraContext::new(CamctlConfig::default(), true);
        let addresses = vec!["10.0.0.5".to_string(), "bad host".to_string()];

        assert!(check(&ctx, &addresses).await.is_err());
        assert!(ctx.manager().statuses().await.is_empty());
    }

    #[test]
    fn test_format_status_line() {
        let session = Session::offline(
            DeviceAddress::parse("10.0.0.5").unwrap(),
            DeviceError::Timeout,
        );
        let line = format_status(&session.status());

        assert!(line.starts_with("10.0.0.5"));
        assert!(line.contains("offline"));
        assert!(line.contains("no-ptz"));
        assert!(line.ends_with("Request timed out"));
    }
}
