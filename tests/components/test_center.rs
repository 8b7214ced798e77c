//! Tests for components/center.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use unified_notifications::backends::simulated::{SimulatedAndroidCenter, SimulatedIosCenter};
use unified_notifications::{
    NativeBackend, Notification, NotificationCenter, NotificationCenterArgs, NotificationError,
    NotificationIntervalSchedule, Platform, PlatformBackendFactory,
};

fn start() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_subscribers_run_in_subscription_order() {
    init_tracing();
    let android = SimulatedAndroidCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::android(android.clone()));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        center.on_notification_received(move |_| order.lock().push(name));
    }

    let notification = Notification::for_platform(Platform::Android).with_title("T");
    center
        .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(1)))
        .unwrap();
    android.advance(Duration::from_secs(1));

    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_removed_subscriber_stops_receiving() {
    init_tracing();
    let ios = SimulatedIosCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::ios(ios.clone()));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let subscription = center.on_notification_received(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let notification = Notification::for_platform(Platform::IOs).with_title("T");
    let schedule = NotificationIntervalSchedule::new(Duration::from_secs(10), true);
    center.schedule_notification(&notification, &schedule).unwrap();

    ios.advance(Duration::from_secs(10));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(center.remove_notification_received(subscription));
    // delivery still happens natively, nobody listens anymore
    assert_eq!(ios.advance(Duration::from_secs(10)), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(ios.callback_installations(), 1);
}

#[test]
fn test_subscriber_may_unsubscribe_during_broadcast() {
    let android = SimulatedAndroidCenter::new(start());
    let center = Arc::new(NotificationCenter::new(NativeBackend::android(android.clone())));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    let slot = Arc::new(parking_lot::Mutex::new(None));
    let weak_center = Arc::downgrade(&center);
    let own_id = Arc::clone(&slot);
    let id = center.on_notification_received(move |_| {
        if let (Some(center), Some(id)) = (weak_center.upgrade(), *own_id.lock()) {
            center.remove_notification_received(id);
        }
    });
    *slot.lock() = Some(id);

    let notification = Notification::for_platform(Platform::Android).with_title("T");
    center
        .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(1)))
        .unwrap();
    android.advance(Duration::from_secs(1));

    assert!(!center.remove_notification_received(id));
}

#[test]
fn test_second_center_on_same_subsystem_leaves_first_subscribed() {
    for simulated in PlatformBackendFactory::all_simulated(start()) {
        let platform = simulated.platform();
        let first = NotificationCenter::new(simulated.native());
        first.initialize(NotificationCenterArgs::new("default")).unwrap();

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        first.on_notification_received(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        {
            let second = NotificationCenter::new(simulated.native());
            second.on_notification_received(|_| {});
        }

        let notification = Notification::for_platform(platform).with_title("T");
        first
            .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(1)))
            .unwrap();

        assert_eq!(simulated.advance(Duration::from_secs(1)), 1, "{platform}");
        assert_eq!(seen.load(Ordering::SeqCst), 1, "{platform}");
    }
}

#[test]
fn test_cancel_all_clears_pending_and_delivered() {
    let android = SimulatedAndroidCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::android(android.clone()));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    let notification = Notification::for_platform(Platform::Android).with_title("T");
    center
        .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(1)))
        .unwrap();
    center
        .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(60)))
        .unwrap();
    android.advance(Duration::from_secs(1));
    assert_eq!(android.displayed_ids().len(), 1);
    assert_eq!(android.scheduled_ids().len(), 1);

    center.cancel_all_delivered_notifications().unwrap();
    center.cancel_all_scheduled_notifications().unwrap();
    assert!(android.displayed_ids().is_empty());
    assert!(android.scheduled_ids().is_empty());
}

#[test]
fn test_cancel_delivered_on_ios_uses_string_identifier() {
    let ios = SimulatedIosCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::ios(ios.clone()));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    let notification = Notification::for_platform(Platform::IOs)
        .with_title("T")
        .with_identifier(31);
    center
        .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(1)))
        .unwrap();
    ios.advance(Duration::from_secs(1));
    assert_eq!(ios.delivered_identifiers(), vec!["31".to_string()]);

    center.cancel_delivered_notification(31).unwrap();
    assert!(ios.delivered_identifiers().is_empty());
}

#[test]
fn test_shutdown_allows_reinitialization() {
    let android = SimulatedAndroidCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::android(android.clone()));
    center.initialize(NotificationCenterArgs::new("first")).unwrap();
    center.on_notification_received(|_| {});

    center.shutdown();
    assert!(!center.is_initialized());
    assert!(!android.has_received_callback());
    assert_eq!(
        center.cancel_all_scheduled_notifications(),
        Err(NotificationError::NotInitialized)
    );

    center.initialize(NotificationCenterArgs::new("second")).unwrap();
    assert_eq!(
        center.args().and_then(|args| args.android_channel_id).as_deref(),
        Some("second")
    );
}

#[test]
fn test_open_settings_on_ios() {
    let ios = SimulatedIosCenter::new(start());
    let center = NotificationCenter::new(NativeBackend::ios(ios.clone()));
    center.initialize(NotificationCenterArgs::new("default")).unwrap();

    center
        .open_notification_settings(unified_notifications::NotificationSettingsSection::Category)
        .unwrap();
    assert_eq!(ios.settings_opened(), 1);
}
