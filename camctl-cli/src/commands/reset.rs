use anyhow::{Result, bail};
use camctl_core::ResetOutcome;
use clap::Args;

use super::{CameraContext, ConnectionArgs};

#[derive(Args)]
pub struct ResetArgs {
    /// Camera address (host, host:port or URL)
    pub address: String,
}

pub async fn run(args: ResetArgs, connection: &ConnectionArgs) -> Result<()> {
    let ctx = CameraContext::load(connection)?;
    let outcome = execute(&ctx, &args).await?;

    if let Some(control) = ctx.simulated()
        && let Some(recorded) = control.gotos().last()
    {
        println!("simulated reset: preset {}", recorded.preset);
    }
    println!("{outcome}");

    if !outcome.is_applied() {
        bail!("Reset was not applied to {}", args.address);
    }
    Ok(())
}

pub async fn execute(ctx: &CameraContext, args: &ResetArgs) -> Result<ResetOutcome> {
    let params = ctx.params(&args.address)?;
    Ok(ctx.manager().execute_reset(&params).await)
}
