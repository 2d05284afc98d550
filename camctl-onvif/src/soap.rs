//! SOAP 1.2 transport with WS-Security UsernameToken digest authentication

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camctl_core::{Credentials, DeviceError};
use rand::Rng;
use reqwest::{Client, StatusCode};
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::xml;

const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const WSU_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const PASSWORD_DIGEST: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";
const BASE64_BINARY: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// Authenticated SOAP client shared by every service of one device
pub(crate) struct SoapClient {
    http: Client,
    credentials: Credentials,
}

impl SoapClient {
    pub(crate) fn new(credentials: Credentials, timeout: Duration) -> Result<Self, DeviceError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| DeviceError::Transport(e.to_string()))?;
        Ok(Self { http, credentials })
    }

    /// POST `body` wrapped in an authenticated envelope, returning the response XML
    pub(crate) async fn call(&self, url: &str, action: &str, body: &str) -> Result<String, DeviceError> {
        let envelope = envelope(&self.security_header(), body);
        debug!(url = %url, action = %action, "SOAP request");

        let response = self
            .http
            .post(url)
            .header(
                "Content-Type",
                format!("application/soap+xml; charset=utf-8; action=\"{action}\""),
            )
            .body(envelope)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport)?;
        check_response(status, text)
    }

    fn security_header(&self) -> String {
        let nonce: [u8; 16] = rand::thread_rng().r#gen();
        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let digest = password_digest(&nonce, &created, self.credentials.expose_password());

        format!(
            r#"<wsse:Security s:mustUnderstand="1" xmlns:wsse="{WSSE_NS}" xmlns:wsu="{WSU_NS}">
      <wsse:UsernameToken>
        <wsse:Username>{username}</wsse:Username>
        <wsse:Password Type="{PASSWORD_DIGEST}">{digest}</wsse:Password>
        <wsse:Nonce EncodingType="{BASE64_BINARY}">{nonce}</wsse:Nonce>
        <wsu:Created>{created}</wsu:Created>
      </wsse:UsernameToken>
    </wsse:Security>"#,
            username = xml::escape(self.credentials.username()),
            nonce = STANDARD.encode(nonce),
        )
    }
}

/// PasswordDigest = Base64(SHA1(nonce + created + password))
pub(crate) fn password_digest(nonce: &[u8], created: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce);
    hasher.update(created.as_bytes());
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}

fn envelope(header: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"
            xmlns:tds="http://www.onvif.org/ver10/device/wsdl"
            xmlns:trt="http://www.onvif.org/ver10/media/wsdl"
            xmlns:tptz="http://www.onvif.org/ver20/ptz/wsdl"
            xmlns:tt="http://www.onvif.org/ver10/schema">
  <s:Header>
    {header}
  </s:Header>
  <s:Body>
    {body}
  </s:Body>
</s:Envelope>"#
    )
}

fn map_transport(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() {
        DeviceError::Timeout
    } else {
        DeviceError::Transport(err.to_string())
    }
}

/// Classify a response: faults first, since devices send them with 400 or 500
fn check_response(status: StatusCode, text: String) -> Result<String, DeviceError> {
    if let Some(fault) = xml::fault(&text) {
        if fault.is_not_authorized() {
            return Err(DeviceError::Unauthorized(fault.reason));
        }
        return Err(DeviceError::Rejected(match fault.code {
            Some(code) => format!("{code}: {}", fault.reason),
            None => fault.reason,
        }));
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(DeviceError::Unauthorized(format!("HTTP {status}")))
        }
        s if s.is_success() => Ok(text),
        s => Err(DeviceError::Transport(format!("HTTP {s}"))),
    }
}
