use super::types::{
    CamctlConfig, CameraConfig, DEFAULT_USERNAME, RawCameraConfig, RawCamctlConfig,
    RawControlConfig,
};
use anyhow::{Context, Result};
use camctl_core::{DEFAULT_SPEED, DEFAULT_TIMEOUT, ManagerConfig};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + command-line overrides)
    pub fn load(overrides: RawCamctlConfig) -> Result<CamctlConfig> {
        Self::load_from(
            &Self::user_config_path(),
            &Self::project_config_path(),
            overrides,
        )
    }

    /// Load from explicit user and project paths
    pub fn load_from(
        user_path: &Path,
        project_path: &Path,
        overrides: RawCamctlConfig,
    ) -> Result<CamctlConfig> {
        let mut raw = RawCamctlConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_layer(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_layer(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        // Layer 3: Command-line flags
        raw = Self::merge_raw(raw, overrides);

        Ok(Self::finalize(raw))
    }

    /// Get user config path (`$XDG_CONFIG_HOME/camctl/config.toml`)
    pub fn user_config_path() -> PathBuf {
        camctl_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with CAMCTL_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        camctl_paths::project_config_file(Path::new(""))
    }

    fn read_layer(path: &Path) -> Result<Option<RawCamctlConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawCamctlConfig, overlay: RawCamctlConfig) -> RawCamctlConfig {
        RawCamctlConfig {
            camera: RawCameraConfig {
                username: overlay.camera.username.or(base.camera.username),
                password: overlay.camera.password.or(base.camera.password),
                port: overlay.camera.port.or(base.camera.port),
                timeout_ms: overlay.camera.timeout_ms.or(base.camera.timeout_ms),
                speed: overlay.camera.speed.or(base.camera.speed),
            },
            control: RawControlConfig {
                lock_policy: overlay.control.lock_policy.or(base.control.lock_policy),
                speed_policy: overlay.control.speed_policy.or(base.control.speed_policy),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawCamctlConfig) -> CamctlConfig {
        let defaults = ManagerConfig::default();
        CamctlConfig {
            camera: CameraConfig {
                username: raw
                    .camera
                    .username
                    .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
                password: raw.camera.password,
                port: raw.camera.port,
                timeout_ms: raw
                    .camera
                    .timeout_ms
                    .unwrap_or(DEFAULT_TIMEOUT.as_millis() as u64),
                speed: raw.camera.speed.unwrap_or(DEFAULT_SPEED),
            },
            control: ManagerConfig {
                lock_policy: raw.control.lock_policy.unwrap_or(defaults.lock_policy),
                speed_policy: raw.control.speed_policy.unwrap_or(defaults.speed_policy),
            },
        }
    }
}
