// Schedule policies applied to a native notification right before it is submitted

use std::time::Duration;

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::notification::PlatformNotification;
use crate::backends::android::AndroidNotification;
use crate::backends::ios::{
    IosCalendarTrigger, IosNotification, IosNotificationTrigger, IosTimeIntervalTrigger,
};

/// Interval at which a date/time scheduled notification repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationRepeatInterval {
    /// Does not repeat
    #[default]
    OneTime,
    /// Repeats every hour at the same minute and second
    Hourly,
    /// Repeats every day at the same time
    Daily,
}

impl NotificationRepeatInterval {
    /// Concrete period, zero for one time notifications
    pub fn period(&self) -> Duration {
        match self {
            NotificationRepeatInterval::OneTime => Duration::ZERO,
            NotificationRepeatInterval::Hourly => Duration::from_secs(60 * 60),
            NotificationRepeatInterval::Daily => Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Time frame a [`NotificationDateTimeSchedule`] fire time is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireTimeKind {
    /// Device local wall-clock time
    #[default]
    Local,
    Utc,
}

/// A policy deciding when a notification fires.
///
/// Applied exactly once per scheduling call, only touching the fire time,
/// trigger and repeat fields of the native notification.
pub trait NotificationSchedule {
    /// `now` is the subsystem's local wall-clock time
    fn schedule_android(&self, notification: &mut AndroidNotification, now: NaiveDateTime);

    fn schedule_ios(&self, notification: &mut IosNotification);

    fn schedule(&self, notification: &mut PlatformNotification, now: NaiveDateTime) {
        match notification {
            PlatformNotification::Android(n) => self.schedule_android(n, now),
            PlatformNotification::Ios(n) => self.schedule_ios(n.get_or_insert_with(Default::default)),
        }
    }
}

/// Show the notification after a time interval, optionally repeating at that interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntervalSchedule {
    /// Delay from the current time. Only full seconds are honoured on iOS.
    pub interval: Duration,
    pub repeats: bool,
}

impl NotificationIntervalSchedule {
    pub fn new(interval: Duration, repeats: bool) -> Self {
        Self { interval, repeats }
    }

    pub fn once(interval: Duration) -> Self {
        Self::new(interval, false)
    }
}

impl NotificationSchedule for NotificationIntervalSchedule {
    fn schedule_android(&self, notification: &mut AndroidNotification, now: NaiveDateTime) {
        let delta = TimeDelta::from_std(self.interval).unwrap_or(TimeDelta::MAX);
        notification.fire_time = Some(now.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX));
        notification.repeat_interval = self.repeats.then_some(self.interval);
    }

    fn schedule_ios(&self, notification: &mut IosNotification) {
        notification.trigger = Some(IosNotificationTrigger::TimeInterval(
            IosTimeIntervalTrigger::new(self.interval, self.repeats),
        ));
    }
}

/// Show the notification at a particular date and time, optionally repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDateTimeSchedule {
    /// First delivery time
    pub fire_time: NaiveDateTime,
    pub kind: FireTimeKind,
    pub repeat_interval: NotificationRepeatInterval,
}

impl NotificationDateTimeSchedule {
    /// Fire at a local wall-clock time
    pub fn new(fire_time: NaiveDateTime, repeat_interval: NotificationRepeatInterval) -> Self {
        Self {
            fire_time,
            kind: FireTimeKind::Local,
            repeat_interval,
        }
    }

    pub fn from_utc(fire_time: DateTime<Utc>, repeat_interval: NotificationRepeatInterval) -> Self {
        Self {
            fire_time: fire_time.naive_utc(),
            kind: FireTimeKind::Utc,
            repeat_interval,
        }
    }

    /// Fire time as local wall-clock time
    pub fn local_fire_time(&self) -> NaiveDateTime {
        match self.kind {
            FireTimeKind::Local => self.fire_time,
            FireTimeKind::Utc => Local.from_utc_datetime(&self.fire_time).naive_local(),
        }
    }
}

impl NotificationSchedule for NotificationDateTimeSchedule {
    fn schedule_android(&self, notification: &mut AndroidNotification, _now: NaiveDateTime) {
        notification.fire_time = Some(self.local_fire_time());
        notification.repeat_interval = Some(self.repeat_interval.period());
    }

    fn schedule_ios(&self, notification: &mut IosNotification) {
        let mut trigger = IosCalendarTrigger {
            hour: Some(self.fire_time.hour()),
            minute: Some(self.fire_time.minute()),
            second: Some(self.fire_time.second()),
            utc_time: self.kind == FireTimeKind::Utc,
            ..Default::default()
        };

        // unset calendar fields match every value, which makes the trigger recur
        match self.repeat_interval {
            NotificationRepeatInterval::OneTime => {
                trigger.year = Some(self.fire_time.year());
                trigger.month = Some(self.fire_time.month());
                trigger.day = Some(self.fire_time.day());
            },
            NotificationRepeatInterval::Daily => {
                trigger.repeats = true;
            },
            NotificationRepeatInterval::Hourly => {
                trigger.hour = None;
                trigger.repeats = true;
            },
        }

        notification.trigger = Some(IosNotificationTrigger::Calendar(trigger));
    }
}
