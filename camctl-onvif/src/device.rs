//! ONVIF device discovery and the session provider

use std::sync::Arc;

use async_trait::async_trait;
use camctl_core::{
    ConnectionParameters, ControlHandle, DeviceAddress, DeviceError, DeviceHandle, SessionProvider,
};
use tracing::{debug, info};

use crate::ptz::OnvifPtz;
use crate::soap::SoapClient;
use crate::xml;

/// Well-known path of the device management service
pub const DEFAULT_DEVICE_PATH: &str = "/onvif/device_service";

const DEVICE_WSDL: &str = "http://www.onvif.org/ver10/device/wsdl";
const MEDIA_WSDL: &str = "http://www.onvif.org/ver10/media/wsdl";

/// Establishes sessions with ONVIF cameras over HTTP
#[derive(Debug, Clone)]
pub struct OnvifProvider {
    device_path: String,
}

impl Default for OnvifProvider {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.to_string(),
        }
    }
}

impl OnvifProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a non-standard device service path
    pub fn with_device_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.device_path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// URL of the device service for `address`
    pub fn device_url(&self, address: &DeviceAddress) -> String {
        let scheme = if address.is_https() { "https" } else { "http" };
        format!("{scheme}://{}{}", address.authority(), self.device_path)
    }
}

#[async_trait]
impl SessionProvider for OnvifProvider {
    async fn establish(
        &self,
        params: &ConnectionParameters,
    ) -> Result<Arc<dyn DeviceHandle>, DeviceError> {
        let soap = Arc::new(SoapClient::new(params.credentials().clone(), params.timeout())?);
        let device_url = self.device_url(params.address());

        let capabilities = soap
            .call(
                &device_url,
                &format!("{DEVICE_WSDL}/GetCapabilities"),
                "<tds:GetCapabilities><tds:Category>All</tds:Category></tds:GetCapabilities>",
            )
            .await?;

        let media_url = xml::capability_xaddr(&capabilities, "Media");
        let ptz_url = xml::capability_xaddr(&capabilities, "PTZ");
        debug!(
            device = %device_url,
            media = media_url.as_deref().unwrap_or("-"),
            ptz = ptz_url.as_deref().unwrap_or("-"),
            "Read device capabilities"
        );

        let profile_token = match &media_url {
            Some(url) => first_profile_token(&soap, url).await?,
            None => None,
        };

        let control = match (ptz_url, &profile_token) {
            (Some(url), Some(_)) => {
                let ptz: Arc<dyn ControlHandle> = Arc::new(OnvifPtz::new(Arc::clone(&soap), url));
                Some(ptz)
            }
            _ => None,
        };

        info!(
            device = %device_url,
            ptz_supported = control.is_some(),
            profile = profile_token.as_deref().unwrap_or("-"),
            "ONVIF device established"
        );

        Ok(Arc::new(OnvifDevice {
            soap,
            url: device_url,
            profile_token: profile_token.unwrap_or_default(),
            control,
        }))
    }
}

async fn first_profile_token(soap: &SoapClient, media_url: &str) -> Result<Option<String>, DeviceError> {
    let profiles = soap
        .call(media_url, &format!("{MEDIA_WSDL}/GetProfiles"), "<trt:GetProfiles/>")
        .await?;
    Ok(xml::attribute_values(&profiles, "Profiles", "token")
        .into_iter()
        .find(|token| !token.is_empty()))
}

/// An established ONVIF device
pub struct OnvifDevice {
    soap: Arc<SoapClient>,
    url: String,
    profile_token: String,
    control: Option<Arc<dyn ControlHandle>>,
}

#[async_trait]
impl DeviceHandle for OnvifDevice {
    async fn identity(&self) -> Result<String, DeviceError> {
        let response = self
            .soap
            .call(
                &self.url,
                &format!("{DEVICE_WSDL}/GetDeviceInformation"),
                "<tds:GetDeviceInformation/>",
            )
            .await?;
        Ok(identity_line(&response))
    }

    fn control_handle(&self) -> Option<Arc<dyn ControlHandle>> {
        self.control.clone()
    }

    fn primary_profile_token(&self) -> String {
        self.profile_token.clone()
    }
}

/// `Manufacturer Model FirmwareVersion SerialNumber`, skipping absent fields
fn identity_line(response: &str) -> String {
    ["Manufacturer", "Model", "FirmwareVersion", "SerialNumber"]
        .iter()
        .filter_map(|field| xml::element_text(response, field))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
