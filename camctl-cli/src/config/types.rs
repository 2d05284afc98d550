use camctl_core::{DEFAULT_SPEED, DEFAULT_TIMEOUT, LockPolicy, ManagerConfig, SpeedPolicy};
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCamctlConfig {
    #[serde(default)]
    pub camera: RawCameraConfig,

    #[serde(default)]
    pub control: RawControlConfig,
}

/// Camera section as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCameraConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Port used when an address does not name one
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawControlConfig {
    pub lock_policy: Option<LockPolicy>,
    pub speed_policy: Option<SpeedPolicy>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CamctlConfig {
    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub control: ManagerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Request timeout for establishment and commands
    pub timeout_ms: u64,

    /// Speed used by `move` when `--speed` is not given
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            port: None,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            speed: DEFAULT_SPEED,
        }
    }
}

impl CamctlConfig {
    /// Copy with the password masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.camera.password.is_some() {
            config.camera.password = Some(REDACTED.to_string());
        }
        config
    }
}

/// Default camera user
pub const DEFAULT_USERNAME: &str = "admin";

const REDACTED: &str = "********";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CamctlConfig::default();
        assert_eq!(config.camera.username, "admin");
        assert!(config.camera.password.is_none());
        assert!(config.camera.port.is_none());
        assert_eq!(config.camera.timeout_ms, 1000);
        assert_eq!(config.camera.speed, 0.1);
        assert_eq!(config.control.lock_policy, LockPolicy::Global);
        assert_eq!(config.control.speed_policy, SpeedPolicy::PassThrough);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CamctlConfig {
            camera: CameraConfig {
                username: "operator".to_string(),
                password: Some("pw".to_string()),
                port: Some(2020),
                timeout_ms: 3000,
                speed: 0.5,
            },
            control: ManagerConfig::default()
                .with_lock_policy(LockPolicy::PerDevice)
                .with_speed_policy(SpeedPolicy::Clamp),
        };

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("lock_policy = \"per-device\""));

        let parsed: CamctlConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.camera.username, "operator");
        assert_eq!(parsed.camera.port, Some(2020));
        assert_eq!(parsed.camera.timeout_ms, 3000);
        assert_eq!(parsed.control.lock_policy, LockPolicy::PerDevice);
        assert_eq!(parsed.control.speed_policy, SpeedPolicy::Clamp);
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[camera]
port = 8080

[control]
speed_policy = "clamp"
"#;
        let raw: RawCamctlConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.camera.port, Some(8080));
        assert!(raw.camera.username.is_none());
        assert!(raw.camera.speed.is_none());
        assert_eq!(raw.control.speed_policy, Some(SpeedPolicy::Clamp));
        assert!(raw.control.lock_policy.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawCamctlConfig = toml::from_str("").unwrap();

        assert!(raw.camera.username.is_none());
        assert!(raw.camera.timeout_ms.is_none());
        assert!(raw.control.lock_policy.is_none());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result: Result<RawCamctlConfig, _> =
            toml::from_str("[control]\nlock_policy = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_redacted_masks_password() {
        let mut config = CamctlConfig::default();
        assert!(config.redacted().camera.password.is_none());

        config.camera.password = Some("s3cret".to_string());
        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("password = \"********\""));
    }
}
