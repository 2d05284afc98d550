use std::time::Duration;

use anyhow::{Result, bail};
use camctl_core::{DEFAULT_DURATION, Direction, MoveCommand, MoveOutcome};
use clap::Args;

use super::{CameraContext, ConnectionArgs};

#[derive(Args)]
pub struct MoveArgs {
    /// Camera address (host, host:port or URL)
    pub address: String,

    /// LEFT, RIGHT, UP, DOWN, LEFTUP, LEFTDOWN, RIGHTUP, RIGHTDOWN, ZOOM_IN or ZOOM_OUT
    pub direction: String,

    /// Speed magnitude (defaults to the configured camera speed)
    #[arg(long, allow_negative_numbers = true)]
    pub speed: Option<f32>,

    /// How long the camera keeps moving
    #[arg(long, value_name = "MS")]
    pub duration_ms: Option<u64>,
}

pub async fn run(args: MoveArgs, connection: &ConnectionArgs) -> Result<()> {
    let ctx = CameraContext::load(connection)?;
    let outcome = execute(&ctx, &args).await?;

    if let Some(control) = ctx.simulated()
        && let Some(recorded) = control.moves().last()
    {
        println!(
            "simulated move: pan={} tilt={} zoom={} for {} ms",
            recorded.velocity.pan(),
            recorded.velocity.tilt(),
            recorded.velocity.zoom(),
            recorded.duration.as_millis()
        );
    }
    println!("{outcome}");

    if !outcome.is_applied() {
        bail!("Move was not applied to {}", args.address);
    }
    Ok(())
}

pub async fn execute(ctx: &CameraContext, args: &MoveArgs) -> Result<MoveOutcome> {
    let params = ctx.params(&args.address)?;
    let command = MoveCommand::new(
        Direction::parse(&args.direction),
        args.speed.unwrap_or(params.speed()),
        args.duration_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DURATION),
    );
    Ok(ctx.manager().execute(&params, &command).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CamctlConfig;
    use camctl_core::{PtzVector, SpeedPolicy};

    fn args(direction: &str, speed: Option<f32>, duration_ms: Option<u64>) -> MoveArgs {
        MoveArgs {
            address: "10.0.0.5".to_string(),
            direction: direction.to_string(),
            speed,
            duration_ms,
        }
    }

    #[tokio::test]
    async fn test_move_uses_given_speed_and_duration() {
        let ctx = CameraContext::new(CamctlConfig::default(), true);

        let outcome = execute(&ctx, &args("RIGHT_UP", Some(0.2), Some(1000)))
            .await
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Applied);
        let moves = ctx.simulated().unwrap().moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].velocity, PtzVector::new(0.2, 0.2, 0.0));
        assert_eq!(moves[0].duration, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_move_defaults_to_configured_speed() {
        let mut config = CamctlConfig::default();
        config.camera.speed = 0.5;
        config.camera.timeout_ms = 2500;
        let ctx = CameraContext::new(config, true);

        execute(&ctx, &args("zoom-out", None, None)).await.unwrap();

        // Duration does not follow the request timeout
        let moves = ctx.simulated().unwrap().moves();
        assert_eq!(moves[0].velocity, PtzVector::new(0.0, 0.0, -0.5));
        assert_eq!(moves[0].duration, DEFAULT_DURATION);
        assert_eq!(moves[0].duration, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_move_applies_speed_policy() {
        let mut config = CamctlConfig::default();
        config.control.speed_policy = SpeedPolicy::Clamp;
        let ctx = CameraContext::new(config, true);

        execute(&ctx, &args("LEFT", Some(3.0), None)).await.unwrap();

        let moves = ctx.simulated().unwrap().moves();
        assert_eq!(moves[0].velocity, PtzVector::new(-1.0, 0.0, 0.0));
    }

    #[tokio::test]
    async fn test_unknown_direction_sends_zero_vector() {
        let ctx = CameraContext::new(CamctlConfig::default(), true);

        let outcome = execute(&ctx, &args("SIDEWAYS", Some(0.3), None))
            .await
            .unwrap();

        assert!(outcome.is_applied());
        assert!(ctx.simulated().unwrap().moves()[0].velocity.is_zero());
    }
}
