//! Tests for components/schedule.rs

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use unified_notifications::backends::android::AndroidNotification;
use unified_notifications::backends::ios::{IosNotification, IosNotificationTrigger};
use unified_notifications::{
    NotificationDateTimeSchedule, NotificationIntervalSchedule, NotificationRepeatInterval,
    NotificationSchedule,
};

fn at(day: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .unwrap()
}

fn calendar_next(notification: &IosNotification, after: NaiveDateTime) -> Option<NaiveDateTime> {
    match &notification.trigger {
        Some(IosNotificationTrigger::Calendar(trigger)) => trigger.next_fire_after(after),
        other => panic!("expected calendar trigger, got {other:?}"),
    }
}

#[test]
fn test_repeat_periods() {
    assert_eq!(NotificationRepeatInterval::OneTime.period(), Duration::ZERO);
    assert_eq!(NotificationRepeatInterval::Hourly.period(), Duration::from_secs(3600));
    assert_eq!(NotificationRepeatInterval::Daily.period(), Duration::from_secs(86400));
    assert_eq!(NotificationRepeatInterval::default(), NotificationRepeatInterval::OneTime);
}

#[test]
fn test_hourly_calendar_trigger_sequence() {
    let mut notification = IosNotification::default();
    NotificationDateTimeSchedule::new(at(1, 10, 15, 30), NotificationRepeatInterval::Hourly)
        .schedule_ios(&mut notification);

    let first = calendar_next(&notification, at(1, 10, 0, 0));
    assert_eq!(first, Some(at(1, 10, 15, 30)));
    let second = calendar_next(&notification, at(1, 10, 15, 30));
    assert_eq!(second, Some(at(1, 11, 15, 30)));
    let third = calendar_next(&notification, at(1, 11, 15, 30));
    assert_eq!(third, Some(at(1, 12, 15, 30)));
}

#[test]
fn test_daily_calendar_trigger_fires_next_day() {
    let mut notification = IosNotification::default();
    NotificationDateTimeSchedule::new(at(1, 8, 0, 0), NotificationRepeatInterval::Daily)
        .schedule_ios(&mut notification);

    assert_eq!(calendar_next(&notification, at(1, 9, 0, 0)), Some(at(2, 8, 0, 0)));
}

#[test]
fn test_one_time_calendar_trigger_never_fires_twice() {
    let mut notification = IosNotification::default();
    NotificationDateTimeSchedule::new(at(3, 8, 0, 0), NotificationRepeatInterval::OneTime)
        .schedule_ios(&mut notification);

    assert_eq!(calendar_next(&notification, at(1, 0, 0, 0)), Some(at(3, 8, 0, 0)));
    assert_eq!(calendar_next(&notification, at(3, 8, 0, 0)), None);
}

#[test]
fn test_interval_schedule_without_repeat_clears_android_repeat() {
    let mut notification = AndroidNotification {
        repeat_interval: Some(Duration::from_secs(10)),
        ..Default::default()
    };
    NotificationIntervalSchedule::once(Duration::from_secs(30))
        .schedule_android(&mut notification, at(1, 0, 0, 0));

    assert_eq!(notification.fire_time, Some(at(1, 0, 0, 30)));
    assert_eq!(notification.repeat_interval, None);
    assert_eq!(notification.effective_repeat_interval(), None);
}
