//! ONVIF provider against a mock camera
//!
//! The mock serves the device, media and PTZ services from one HTTP server
//! and dispatches on the SOAP operation named in the request body.

use std::sync::Arc;
use std::time::Duration;

use camctl_core::{
    ConnectionParameters, Credentials, DeviceAddress, DeviceError, DeviceHandle, Direction,
    ManagerConfig, MoveOutcome, ResetOutcome, SessionManager,
};
use camctl_onvif::OnvifProvider;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn soap(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope"><env:Body>{body}</env:Body></env:Envelope>"#
    ))
}

fn not_authorized() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_string(
        r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope"><env:Body><env:Fault>
<env:Code><env:Value>env:Sender</env:Value><env:Subcode><env:Value>ter:NotAuthorized</env:Value></env:Subcode></env:Code>
<env:Reason><env:Text xml:lang="en">Sender not Authorized</env:Text></env:Reason>
</env:Fault></env:Body></env:Envelope>"#,
    )
}

async fn mount(server: &MockServer, service: &str, operation: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(service))
        .and(body_string_contains(operation))
        .respond_with(response)
        .mount(server)
        .await;
}

/// A camera with media, optional PTZ, and device information
async fn camera(with_ptz: bool) -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();
    let ptz = if with_ptz {
        format!("<tt:PTZ><tt:XAddr>{base}/onvif/ptz_service</tt:XAddr></tt:PTZ>")
    } else {
        String::new()
    };

    mount(
        &server,
        "/onvif/device_service",
        "GetCapabilities",
        soap(&format!(
            "<tds:GetCapabilitiesResponse><tds:Capabilities>\
             <tt:Device><tt:XAddr>{base}/onvif/device_service</tt:XAddr></tt:Device>\
             <tt:Media><tt:XAddr>{base}/onvif/media_service</tt:XAddr></tt:Media>{ptz}\
             </tds:Capabilities></tds:GetCapabilitiesResponse>"
        )),
    )
    .await;
    mount(
        &server,
        "/onvif/device_service",
        "GetDeviceInformation",
        soap(
            "<tds:GetDeviceInformationResponse><tds:Manufacturer>Acme</tds:Manufacturer>\
             <tds:Model>PTZ-1</tds:Model><tds:FirmwareVersion>2.1</tds:FirmwareVersion>\
             <tds:SerialNumber>SN42</tds:SerialNumber></tds:GetDeviceInformationResponse>",
        ),
    )
    .await;
    mount(
        &server,
        "/onvif/media_service",
        "GetProfiles",
        soap(
            r#"<trt:GetProfilesResponse><trt:Profiles fixed="true" token="main"><tt:Name>Main</tt:Name></trt:Profiles>
               <trt:Profiles token="sub"><tt:Name>Sub</tt:Name></trt:Profiles></trt:GetProfilesResponse>"#,
        ),
    )
    .await;
    server
}

fn params(server: &MockServer) -> ConnectionParameters {
    ConnectionParameters::new(
        DeviceAddress::parse(&server.uri()).unwrap(),
        Credentials::new("admin", "pw"),
    )
    .with_timeout(Duration::from_millis(500))
}

fn manager() -> SessionManager {
    SessionManager::new(Arc::new(OnvifProvider::new()), ManagerConfig::default())
}

async fn bodies_containing(server: &MockServer, needle: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|req| String::from_utf8_lossy(&req.body).into_owned())
        .filter(|body| body.contains(needle))
        .collect()
}

// ==================== Establishment ====================

#[tokio::test]
async fn establishes_and_reports_online() {
    let server = camera(true).await;
    let manager = manager();
    let params = params(&server);

    let session = manager.get_or_establish(&params).await;

    assert!(session.is_online());
    assert!(session.supports_ptz());
    assert_eq!(session.profile_token(), "main");
    assert_eq!(
        session.device().unwrap().identity().await.unwrap(),
        "Acme PTZ-1 2.1 SN42"
    );
}

#[tokio::test]
async fn every_request_carries_a_password_digest() {
    let server = camera(true).await;
    manager().liveness(&params(&server)).await;

    let requests = bodies_containing(&server, "<s:Envelope").await;
    assert!(!requests.is_empty());
    for body in requests {
        assert!(body.contains("<wsse:Username>admin</wsse:Username>"));
        assert!(body.contains("#PasswordDigest"));
        assert!(!body.contains(">pw<"));
    }
}

#[tokio::test]
async fn camera_without_ptz_is_online_but_cannot_move() {
    let server = camera(false).await;
    let manager = manager();
    let params = params(&server);

    assert!(manager.liveness(&params).await);
    let outcome = manager
        .execute_move(&params, Direction::Left, 0.1, Duration::from_secs(1))
        .await;
    assert_eq!(outcome, MoveOutcome::Unsupported { cause: None });
}

#[tokio::test]
async fn rejected_credentials_give_offline_session() {
    let server = MockServer::start().await;
    mount(&server, "/onvif/device_service", "GetCapabilities", not_authorized()).await;
    let manager = manager();
    let params = params(&server);

    assert!(!manager.liveness(&params).await);

    let session = manager.get_or_establish(&params).await;
    assert_eq!(
        session.failure(),
        Some(&DeviceError::Unauthorized("Sender not Authorized".to_string()))
    );

    let outcome = manager.execute_reset(&params).await;
    assert!(matches!(
        outcome,
        ResetOutcome::Unsupported {
            cause: Some(DeviceError::Unauthorized(_))
        }
    ));
}

#[tokio::test]
async fn slow_camera_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let params = params(&server).with_timeout(Duration::from_millis(100));

    let session = manager().get_or_establish(&params).await;

    assert!(!session.is_online());
    assert_eq!(session.failure(), Some(&DeviceError::Timeout));
}

#[tokio::test]
async fn unreachable_camera_is_a_transport_failure() {
    let server = MockServer::start().await;
    let params = params(&server);
    drop(server);

    let session = manager().get_or_establish(&params).await;

    assert!(!session.is_online());
    assert!(matches!(
        session.failure(),
        Some(DeviceError::Transport(_)) | Some(DeviceError::Timeout)
    ));
}

// ==================== Movement ====================

#[tokio::test]
async fn move_sends_continuous_move_with_timeout() {
    let server = camera(true).await;
    mount(
        &server,
        "/onvif/ptz_service",
        "ContinuousMove",
        soap("<tptz:ContinuousMoveResponse/>"),
    )
    .await;
    let manager = manager();
    let params = params(&server);

    let outcome = manager
        .execute_move(&params, Direction::RightUp, 0.2, Duration::from_millis(1500))
        .await;
    assert_eq!(outcome, MoveOutcome::Applied);

    let moves = bodies_containing(&server, "<tptz:ContinuousMove>").await;
    assert_eq!(moves.len(), 1);
    assert!(moves[0].contains("<tptz:ProfileToken>main</tptz:ProfileToken>"));
    assert!(moves[0].contains(r#"<tt:PanTilt x="0.2" y="0.2""#));
    assert!(moves[0].contains(r#"<tt:Zoom x="0""#));
    assert!(moves[0].contains("<tptz:Timeout>PT1.5S</tptz:Timeout>"));
}

#[tokio::test]
async fn move_fault_is_unsupported_with_cause() {
    let server = camera(true).await;
    mount(
        &server,
        "/onvif/ptz_service",
        "ContinuousMove",
        ResponseTemplate::new(500).set_body_string(
            "<env:Envelope><env:Body><env:Fault><env:Code><env:Value>env:Receiver</env:Value></env:Code>\
             <env:Reason><env:Text>Movement out of range</env:Text></env:Reason></env:Fault></env:Body></env:Envelope>",
        ),
    )
    .await;
    let manager = manager();

    let outcome = manager
        .execute_move(&params(&server), Direction::Down, 0.5, Duration::from_secs(1))
        .await;

    assert_eq!(
        outcome,
        MoveOutcome::Unsupported {
            cause: Some(DeviceError::Rejected(
                "env:Receiver: Movement out of range".to_string()
            ))
        }
    );
}

// ==================== Reset ====================

#[tokio::test]
async fn reset_goes_to_first_preset_at_full_speed() {
    let server = camera(true).await;
    mount(
        &server,
        "/onvif/ptz_service",
        "GetPresets",
        soap(
            r#"<tptz:GetPresetsResponse>
                 <tptz:Preset token="7"><tt:Name>Gate</tt:Name></tptz:Preset>
                 <tptz:Preset token="2"><tt:Name>Door</tt:Name></tptz:Preset>
               </tptz:GetPresetsResponse>"#,
        ),
    )
    .await;
    mount(
        &server,
        "/onvif/ptz_service",
        "GotoPreset",
        soap("<tptz:GotoPresetResponse/>"),
    )
    .await;
    let manager = manager();

    assert_eq!(manager.execute_reset(&params(&server)).await, ResetOutcome::Applied);

    let gotos = bodies_containing(&server, "<tptz:GotoPreset>").await;
    assert_eq!(gotos.len(), 1);
    assert!(gotos[0].contains("<tptz:PresetToken>7</tptz:PresetToken>"));
    assert!(gotos[0].contains(r#"<tt:PanTilt x="1" y="1""#));
    assert!(gotos[0].contains(r#"<tt:Zoom x="1""#));
}

#[tokio::test]
async fn reset_without_presets_reports_no_presets() {
    let server = camera(true).await;
    mount(
        &server,
        "/onvif/ptz_service",
        "GetPresets",
        soap("<tptz:GetPresetsResponse/>"),
    )
    .await;
    let manager = manager();

    assert_eq!(
        manager.execute_reset(&params(&server)).await,
        ResetOutcome::NoPresets
    );
    assert!(bodies_containing(&server, "<tptz:GotoPreset>").await.is_empty());
}
