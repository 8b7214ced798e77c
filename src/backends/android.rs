// Android notification subsystem contract - channel based scheduling with native integer IDs

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::CallbackToken;

/// Native Android notification value.
///
/// Mirrors the fields the Android subsystem accepts when posting a notification.
/// Only `title`, `text`, `intent_data`, `number` and `show_in_foreground` are
/// visible through the unified [`Notification`](crate::Notification).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidNotification {
    pub title: Option<String>,
    pub text: Option<String>,
    pub small_icon: Option<String>,
    pub large_icon: Option<String>,
    /// Local wall-clock time at which the notification is delivered
    pub fire_time: Option<NaiveDateTime>,
    /// Re-delivery period; `None` or zero for one time notifications
    pub repeat_interval: Option<Duration>,
    /// Item count, shown as badge by launchers that support it
    pub number: i32,
    /// Dismiss the notification when the user touches it
    pub should_auto_cancel: bool,
    pub uses_stopwatch: bool,
    pub group: Option<String>,
    pub group_summary: bool,
    pub sort_key: Option<String>,
    /// Arbitrary payload handed back when the notification is tapped
    pub intent_data: Option<String>,
    pub show_timestamp: bool,
    /// Present the notification while the app is in foreground
    pub show_in_foreground: bool,
}

impl Default for AndroidNotification {
    fn default() -> Self {
        Self {
            title: None,
            text: None,
            small_icon: None,
            large_icon: None,
            fire_time: None,
            repeat_interval: None,
            number: 0,
            should_auto_cancel: false,
            uses_stopwatch: false,
            group: None,
            group_summary: false,
            sort_key: None,
            intent_data: None,
            show_timestamp: false,
            show_in_foreground: true,
        }
    }
}

impl AndroidNotification {
    pub fn new(title: impl Into<String>, text: impl Into<String>, fire_time: NaiveDateTime) -> Self {
        Self {
            title: Some(title.into()),
            text: Some(text.into()),
            fire_time: Some(fire_time),
            ..Default::default()
        }
    }

    /// Repeat period if this notification re-fires, zero periods count as one time
    pub fn effective_repeat_interval(&self) -> Option<Duration> {
        self.repeat_interval.filter(|interval| !interval.is_zero())
    }
}

/// Channel importance levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Importance {
    None = 0,
    Low = 2,
    #[default]
    Default = 3,
    High = 4,
}

/// Notification channel; every Android notification is posted to one
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidNotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
    pub can_show_badge: bool,
    pub enable_vibration: bool,
}

/// Payload delivered by the Android subsystem when a notification arrives or is tapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidNotificationIntentData {
    pub id: i32,
    pub channel: String,
    pub notification: AndroidNotification,
}

/// Permission to post notifications as reported by the Android subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionStatus {
    NotRequested = 0,
    Allowed = 1,
    Denied = 2,
    DeniedDontAskAgain = 3,
    RequestPending = 4,
    /// Notifications disabled for the app in system settings
    NotificationsBlockedForApp = 5,
}

/// Native permission request. The subsystem updates the status once the user
/// answers; callers only observe it by polling [`PermissionRequest::status`].
#[derive(Debug, Clone)]
pub struct PermissionRequest {
    status: Arc<Mutex<PermissionStatus>>,
}

impl PermissionRequest {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            status: Arc::new(Mutex::new(status)),
        }
    }

    pub fn pending() -> Self {
        Self::new(PermissionStatus::RequestPending)
    }

    pub fn status(&self) -> PermissionStatus {
        *self.status.lock()
    }

    /// Record the user's answer. Only the subsystem should call this.
    pub fn respond(&self, status: PermissionStatus) {
        *self.status.lock() = status;
    }
}

/// Callback the Android subsystem invokes for each received notification
pub type AndroidReceivedCallback = Arc<dyn Fn(AndroidNotificationIntentData) + Send + Sync>;

/// Operations of the Android notification subsystem consumed by the unified layer
pub trait AndroidNotificationCenter: Send + Sync {
    /// One time subsystem initialization; returns false if unavailable
    fn initialize(&self) -> bool;

    fn register_notification_channel(&self, channel: AndroidNotificationChannel);

    /// Post with an auto-generated ID, returned to the caller
    fn send_notification(&self, notification: AndroidNotification, channel_id: &str) -> i32;

    /// Post with a caller-supplied ID, replacing any pending notification with that ID
    fn send_notification_with_explicit_id(
        &self,
        notification: AndroidNotification,
        channel_id: &str,
        id: i32,
    );

    fn cancel_scheduled_notification(&self, id: i32);
    fn cancel_displayed_notification(&self, id: i32);
    fn cancel_all_scheduled_notifications(&self);
    fn cancel_all_displayed_notifications(&self);

    /// Intent of the notification that brought the app to foreground, if any
    fn get_last_notification_intent(&self) -> Option<AndroidNotificationIntentData>;

    fn user_permission_to_post(&self) -> PermissionStatus;
    fn request_permission(&self) -> PermissionRequest;

    /// Register a received callback. Every registration sees every received notification.
    fn add_notification_received_callback(&self, callback: AndroidReceivedCallback) -> CallbackToken;

    /// Remove one registration, unknown tokens are ignored
    fn remove_notification_received_callback(&self, token: CallbackToken);

    /// Open app notification settings, or the settings of `channel_id` when given
    fn open_notification_settings(&self, channel_id: Option<&str>);

    /// Local wall-clock time used as base for relative schedules
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
