//! Tests for components/notification.rs

use chrono::NaiveDate;
use unified_notifications::backends::android::AndroidNotification;
use unified_notifications::backends::ios::IosNotification;
use unified_notifications::{Notification, Platform, PlatformNotification};

#[test]
fn test_new_notification_uses_current_platform() {
    let notification = Notification::new();
    assert_eq!(notification.platform(), Platform::current());
    assert_eq!(notification.identifier, None);
    assert!(!notification.show_in_foreground);
}

#[test]
fn test_android_round_trip_keeps_unified_fields() {
    let notification = Notification::for_platform(Platform::Android)
        .with_title("T")
        .with_text("B")
        .with_data("D")
        .with_badge(2)
        .with_identifier(5)
        .with_show_in_foreground(true);

    let back = Notification::from_android(notification.to_android(), 5);
    assert_eq!(back.title(), Some("T"));
    assert_eq!(back.text(), Some("B"));
    assert_eq!(back.data(), Some("D"));
    assert_eq!(back.badge(), 2);
    assert_eq!(back.identifier, Some(5));
    assert!(back.show_in_foreground);
}

#[test]
fn test_ios_round_trip_keeps_unified_fields() {
    let notification = Notification::for_platform(Platform::IOs)
        .with_title("T")
        .with_text("B")
        .with_identifier(123);

    let back = Notification::from_ios(notification.to_ios().unwrap());
    assert_eq!(back.title(), Some("T"));
    assert_eq!(back.text(), Some("B"));
    assert_eq!(back.identifier, Some(123));
    assert!(!back.show_in_foreground);
}

#[test]
fn test_android_specific_fields_are_kept_on_android() {
    let fire_time = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .unwrap();
    let mut native = AndroidNotification::new("T", "B", fire_time);
    native.group = Some("inbox".to_string());
    native.should_auto_cancel = false;

    let notification = Notification::from_android(native, 1);
    let converted = notification.to_android();
    assert_eq!(converted.group.as_deref(), Some("inbox"));
    assert!(converted.should_auto_cancel);
}

#[test]
fn test_ios_only_fields_do_not_cross_platforms() {
    let mut native = IosNotification::with_identifier("9");
    native.title = Some("T".to_string());
    native.subtitle = Some("sub".to_string());
    native.thread_identifier = Some("thread".to_string());

    let android = Notification::from_ios(native).to_android();
    assert_eq!(android.title.as_deref(), Some("T"));
    assert_eq!(android.group, None);
}

#[test]
fn test_native_accessor_exposes_payload() {
    let notification = Notification::for_platform(Platform::IOs);
    assert_eq!(notification.native(), &PlatformNotification::Ios(None));

    let notification = Notification::for_platform(Platform::Android);
    assert!(matches!(notification.native(), PlatformNotification::Android(_)));
}
