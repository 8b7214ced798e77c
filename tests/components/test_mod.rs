//! Tests for components/mod.rs

use unified_notifications::components::{NotificationError, Platform};

#[test]
fn test_platform_names() {
    assert_eq!(Platform::Android.to_string(), "Android");
    assert_eq!(Platform::IOs.to_string(), "iOS");
}

#[test]
fn test_current_platform_on_host() {
    if cfg!(target_os = "android") {
        assert_eq!(Platform::current(), Platform::Android);
    } else {
        assert_eq!(Platform::current(), Platform::IOs);
    }
    assert_eq!(Platform::default(), Platform::current());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        NotificationError::NotInitialized.to_string(),
        "NotificationCenter not initialized"
    );
    assert_eq!(
        NotificationError::PlatformError {
            platform: Platform::IOs,
            message: "boom".to_string(),
        }
        .to_string(),
        "platform error on iOS: boom"
    );
}
