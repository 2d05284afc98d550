//! ONVIF PTZ service

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use camctl_core::{ControlHandle, DeviceError, PresetId, PtzVector};
use tracing::debug;

use crate::soap::SoapClient;
use crate::xml;

const PTZ_WSDL: &str = "http://www.onvif.org/ver20/ptz/wsdl";

/// PTZ control over a device's PTZ service endpoint
pub struct OnvifPtz {
    soap: Arc<SoapClient>,
    url: String,
}

impl OnvifPtz {
    pub(crate) fn new(soap: Arc<SoapClient>, url: String) -> Self {
        Self { soap, url }
    }

    async fn call(&self, operation: &str, body: &str) -> Result<String, DeviceError> {
        self.soap
            .call(&self.url, &format!("{PTZ_WSDL}/{operation}"), body)
            .await
    }
}

#[async_trait]
impl ControlHandle for OnvifPtz {
    async fn continuous_move(
        &self,
        profile_token: &str,
        velocity: &PtzVector,
        duration: Duration,
    ) -> Result<(), DeviceError> {
        let body = format!(
            r#"<tptz:ContinuousMove>
      <tptz:ProfileToken>{token}</tptz:ProfileToken>
      <tptz:Velocity>{vector}</tptz:Velocity>
      <tptz:Timeout>{timeout}</tptz:Timeout>
    </tptz:ContinuousMove>"#,
            token = xml::escape(profile_token),
            vector = vector_elements(velocity),
            timeout = xs_duration(duration),
        );
        self.call("ContinuousMove", &body).await?;
        Ok(())
    }

    async fn list_presets(&self, profile_token: &str) -> Result<Vec<PresetId>, DeviceError> {
        let body = format!(
            "<tptz:GetPresets><tptz:ProfileToken>{}</tptz:ProfileToken></tptz:GetPresets>",
            xml::escape(profile_token)
        );
        let response = self.call("GetPresets", &body).await?;

        let presets: Vec<PresetId> = xml::attribute_values(&response, "Preset", "token")
            .into_iter()
            .map(PresetId::from)
            .collect();
        debug!(count = presets.len(), "Listed presets");
        Ok(presets)
    }

    async fn goto_preset(
        &self,
        profile_token: &str,
        preset: &PresetId,
        speed: &PtzVector,
    ) -> Result<(), DeviceError> {
        let body = format!(
            r#"<tptz:GotoPreset>
      <tptz:ProfileToken>{token}</tptz:ProfileToken>
      <tptz:PresetToken>{preset}</tptz:PresetToken>
      <tptz:Speed>{vector}</tptz:Speed>
    </tptz:GotoPreset>"#,
            token = xml::escape(profile_token),
            preset = xml::escape(preset.as_str()),
            vector = vector_elements(speed),
        );
        self.call("GotoPreset", &body).await?;
        Ok(())
    }
}

fn vector_elements(vector: &PtzVector) -> String {
    format!(
        r#"<tt:PanTilt x="{}" y="{}" space="{}"/><tt:Zoom x="{}" space="{}"/>"#,
        vector.pan_tilt.x,
        vector.pan_tilt.y,
        vector.pan_tilt.space,
        vector.zoom.x,
        vector.zoom.space,
    )
}

/// Format as an `xs:duration`, e.g. `PT1S` or `PT0.25S`
fn xs_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let mut out = format!("PT{}", millis / 1000);
    let frac = millis % 1000;
    if frac != 0 {
        let digits = format!("{frac:03}");
        let _ = write!(out, ".{}", digits.trim_end_matches('0'));
    }
    out.push('S');
    out
}
