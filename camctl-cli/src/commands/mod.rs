pub mod config;
pub mod movement;
pub mod reset;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use camctl_core::mock::{MockControl, MockDevice, MockProvider};
use camctl_core::{
    ConnectionParameters, Credentials, DeviceAddress, LockPolicy, SessionManager,
    SessionProvider, SpeedPolicy,
};
use camctl_onvif::OnvifProvider;
use clap::Args;
use tracing::info;

use crate::config::{CamctlConfig, ConfigLoader, RawCameraConfig, RawCamctlConfig, RawControlConfig};

/// Connection flags shared by every command
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Camera user
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Camera password
    #[arg(long, global = true, env = "CAMCTL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Port used when an address does not name one
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Move serialization: global or per-device
    #[arg(long, global = true)]
    pub lock_policy: Option<LockPolicy>,

    /// Speed handling: pass-through or clamp
    #[arg(long, global = true)]
    pub speed_policy: Option<SpeedPolicy>,

    /// Drive a simulated camera instead of the network
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl ConnectionArgs {
    /// Flags as the last configuration layer
    pub fn overrides(&self) -> RawCamctlConfig {
        RawCamctlConfig {
            camera: RawCameraConfig {
                username: self.username.clone(),
                password: self.password.clone(),
                port: self.port,
                timeout_ms: self.timeout_ms,
                speed: None,
            },
            control: RawControlConfig {
                lock_policy: self.lock_policy,
                speed_policy: self.speed_policy,
            },
        }
    }
}

/// Configuration plus the session manager commands run against
pub struct CameraContext {
    config: CamctlConfig,
    manager: Arc<SessionManager>,
    simulated: Option<Arc<MockControl>>,
}

impl CameraContext {
    /// Load layered configuration and build a manager for it
    pub fn load(args: &ConnectionArgs) -> Result<Self> {
        let config = ConfigLoader::load(args.overrides())?;
        Ok(Self::new(config, args.dry_run))
    }

    pub fn new(config: CamctlConfig, dry_run: bool) -> Self {
        let simulated = dry_run.then(|| Arc::new(MockControl::new().with_presets(["home"])));
        let provider: Arc<dyn SessionProvider> = match &simulated {
            Some(control) => {
                info!("Dry run: commands go to a simulated camera");
                let device = MockDevice::with_control("camctl simulated camera", Arc::clone(control));
                Arc::new(MockProvider::new(Arc::new(device)))
            }
            None => Arc::new(OnvifProvider::new()),
        };

        let manager = Arc::new(SessionManager::new(provider, config.control));
        Self {
            config,
            manager,
            simulated,
        }
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Recording control of the simulated camera, in dry-run mode
    pub fn simulated(&self) -> Option<&Arc<MockControl>> {
        self.simulated.as_ref()
    }

    /// Connection parameters for an address given on the command line
    pub fn params(&self, address: &str) -> Result<ConnectionParameters> {
        let camera = &self.config.camera;
        let mut address = DeviceAddress::parse(address)?;
        if address.port().is_none()
            && let Some(port) = camera.port
        {
            address = address.with_port(port)?;
        }

        let credentials = Credentials::new(
            camera.username.clone(),
            camera.password.clone().unwrap_or_default(),
        );
        Ok(ConnectionParameters::new(address, credentials)
            .with_timeout(Duration::from_millis(camera.timeout_ms))
            .with_speed(camera.speed))
    }
}
