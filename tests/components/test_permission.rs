//! Tests for components/permission.rs

use std::time::Duration;

use chrono::NaiveDate;
use unified_notifications::{
    NotificationCenter, NotificationCenterArgs, NotificationsPermissionStatus, Platform,
    PlatformBackendFactory, SimulatedBackend,
};

fn setup(platform: Platform, remote: bool) -> (SimulatedBackend, NotificationCenter) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap();
    let simulated = PlatformBackendFactory::create_simulated(platform, start);
    let center = NotificationCenter::new(simulated.native());
    center
        .initialize(NotificationCenterArgs::new("default").with_remote_notifications(remote))
        .unwrap();
    (simulated, center)
}

#[tokio::test]
async fn test_awaiting_permission_request() -> anyhow::Result<()> {
    for platform in [Platform::Android, Platform::IOs] {
        let (simulated, center) = setup(platform, false);
        let request = center.request_permission()?;

        let responder = simulated.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            responder.respond_to_permission_requests(true);
        });

        let status = tokio::time::timeout(Duration::from_secs(5), request).await?;
        assert_eq!(status, NotificationsPermissionStatus::Granted, "{platform}");
    }
    Ok(())
}

#[test]
fn test_remote_registration_skips_granted_short_circuit() -> anyhow::Result<()> {
    let (simulated, center) = setup(Platform::IOs, true);
    simulated.grant_permission();

    let request = center.request_permission()?;
    // already authorized, so the native request finishes right away with a token
    assert_eq!(request.status(), NotificationsPermissionStatus::Granted);
    assert!(request.device_token().is_some());
    Ok(())
}

#[test]
fn test_requests_are_independent() -> anyhow::Result<()> {
    let (simulated, center) = setup(Platform::Android, false);

    let first = center.request_permission()?;
    simulated.respond_to_permission_requests(false);
    let second = center.request_permission()?;

    assert_eq!(first.status(), NotificationsPermissionStatus::Denied);
    assert_eq!(second.status(), NotificationsPermissionStatus::RequestPending);

    simulated.respond_to_permission_requests(true);
    assert_eq!(first.status(), NotificationsPermissionStatus::Denied);
    assert_eq!(second.status(), NotificationsPermissionStatus::Granted);
    Ok(())
}
