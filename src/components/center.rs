// Notification center: the single entry point of the unified API
//
// Wraps exactly one native subsystem, chosen when the center is created.
// Initialization is explicit and idempotent; everything except subscription
// management requires it.

use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::notification::{Notification, format_invariant_id, parse_invariant_id};
use super::permission::NotificationsPermissionRequest;
use super::query::QueryLastRespondedNotificationOp;
use super::schedule::NotificationSchedule;
use super::{NotificationError, NotificationResult, Platform};
use crate::backends::{CallbackToken, NativeBackend};
use crate::backends::android::{
    AndroidNotificationChannel, AndroidNotificationIntentData, Importance, PermissionStatus,
};
use crate::backends::ios::{AuthorizationOption, IosNotification};

/// How notifications are presented to the user, combinable with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPresentation(u32);

impl NotificationPresentation {
    pub const ALERT: Self = Self(1);
    pub const BADGE: Self = Self(1 << 1);
    pub const SOUND: Self = Self(1 << 2);
    pub const VIBRATE: Self = Self(1 << 3);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for NotificationPresentation {
    fn default() -> Self {
        Self::BADGE | Self::SOUND
    }
}

impl BitOr for NotificationPresentation {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NotificationPresentation {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Configuration for [`NotificationCenter::initialize`].
///
/// Missing fields take their defaults when deserialized, so a config document
/// only needs to name the Android channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationCenterArgs {
    pub presentation_options: NotificationPresentation,
    /// Channel notifications are sent to on Android. Required on every platform.
    pub android_channel_id: Option<String>,
    /// When name or description is set, the channel is registered at initialization
    pub android_channel_name: Option<String>,
    pub android_channel_description: Option<String>,
    /// Overrides the options derived from `presentation_options`
    pub ios_authorization_options: Option<AuthorizationOption>,
    pub ios_register_for_remote_notifications: bool,
}

impl Default for NotificationCenterArgs {
    fn default() -> Self {
        Self {
            presentation_options: NotificationPresentation::default(),
            android_channel_id: None,
            android_channel_name: None,
            android_channel_description: None,
            ios_authorization_options: None,
            ios_register_for_remote_notifications: false,
        }
    }
}

impl NotificationCenterArgs {
    /// Args sending to the given Android channel, which is expected to exist already
    pub fn new(android_channel_id: impl Into<String>) -> Self {
        Self {
            android_channel_id: Some(android_channel_id.into()),
            ..Default::default()
        }
    }

    /// Args registering the Android channel at initialization
    pub fn with_android_channel(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.android_channel_id = Some(id.into());
        self.android_channel_name = Some(name.into());
        self.android_channel_description = Some(description.into());
        self
    }

    pub fn with_presentation_options(mut self, options: NotificationPresentation) -> Self {
        self.presentation_options = options;
        self
    }

    pub fn with_ios_authorization_options(mut self, options: AuthorizationOption) -> Self {
        self.ios_authorization_options = Some(options);
        self
    }

    pub fn with_remote_notifications(mut self, register: bool) -> Self {
        self.ios_register_for_remote_notifications = register;
        self
    }

    /// Options requested on iOS, the override or those matching the presentation options
    pub fn ios_authorization_options(&self) -> AuthorizationOption {
        if let Some(options) = self.ios_authorization_options {
            return options;
        }

        let mut options = AuthorizationOption::empty();
        if self.presentation_options.contains(NotificationPresentation::ALERT) {
            options |= AuthorizationOption::ALERT;
        }
        if self.presentation_options.contains(NotificationPresentation::BADGE) {
            options |= AuthorizationOption::BADGE;
        }
        if self.presentation_options.contains(NotificationPresentation::SOUND) {
            options |= AuthorizationOption::SOUND;
        }
        options
    }

    /// Channel to register on Android, if the args describe one
    pub fn android_channel(&self) -> Option<AndroidNotificationChannel> {
        let id = self.android_channel_id.as_deref().filter(|id| !id.is_empty())?;
        if self.android_channel_name.is_none() && self.android_channel_description.is_none() {
            return None;
        }

        let presentation = self.presentation_options;
        let importance = if presentation.contains(NotificationPresentation::ALERT) {
            Importance::High
        } else if presentation.contains(NotificationPresentation::SOUND) {
            Importance::Default
        } else {
            Importance::Low
        };

        Some(AndroidNotificationChannel {
            id: id.to_string(),
            name: self.android_channel_name.clone().unwrap_or_else(|| id.to_string()),
            description: self.android_channel_description.clone().unwrap_or_default(),
            importance,
            can_show_badge: presentation.contains(NotificationPresentation::BADGE),
            enable_vibration: presentation.contains(NotificationPresentation::VIBRATE),
        })
    }
}

/// Settings page opened by [`NotificationCenter::open_notification_settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationSettingsSection {
    /// Notification settings of the whole app
    #[default]
    Application,
    /// Settings of the configured category. Android channel settings; app settings on iOS.
    Category,
}

/// Handle returned by [`NotificationCenter::on_notification_received`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type NotificationReceivedCallback = Arc<dyn Fn(&Notification) + Send + Sync>;

type Subscribers = Arc<Mutex<Vec<(SubscriptionId, NotificationReceivedCallback)>>>;

/// Unified notification center.
///
/// Create one per app with the native backend of the running platform, call
/// [`initialize`](Self::initialize) once, then schedule and manage
/// notifications through it.
pub struct NotificationCenter {
    backend: NativeBackend,
    /// `Some` once initialized
    args: RwLock<Option<NotificationCenterArgs>>,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    /// Registration of the native received callback, once installed
    bridged: Mutex<Option<CallbackToken>>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("platform", &self.platform())
            .field("initialized", &self.is_initialized())
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

impl NotificationCenter {
    pub fn new(backend: NativeBackend) -> Self {
        Self {
            backend,
            args: RwLock::new(None),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_subscription: AtomicU64::new(1),
            bridged: Mutex::new(None),
        }
    }

    pub fn platform(&self) -> Platform {
        self.backend.platform()
    }

    pub fn is_initialized(&self) -> bool {
        self.args.read().is_some()
    }

    /// Args the center was initialized with
    pub fn args(&self) -> Option<NotificationCenterArgs> {
        self.args.read().clone()
    }

    /// Initialize the center. Calling it again has no effect, even with different args.
    pub fn initialize(&self, args: NotificationCenterArgs) -> NotificationResult<()> {
        let mut state = self.args.write();
        if state.is_some() {
            tracing::debug!(platform = %self.platform(), "Notification center already initialized");
            return Ok(());
        }

        if args.android_channel_id.as_deref().is_none_or(str::is_empty) {
            return Err(NotificationError::InvalidArgument {
                argument: "android_channel_id",
                message: "Android channel id is required".to_string(),
            });
        }

        if let NativeBackend::Android(android) = &self.backend {
            if !android.initialize() {
                return Err(NotificationError::PlatformError {
                    platform: Platform::Android,
                    message: "failed to initialize the notification subsystem".to_string(),
                });
            }
            if let Some(channel) = args.android_channel() {
                tracing::debug!(channel = %channel.id, importance = ?channel.importance, "Registering default channel");
                android.register_notification_channel(channel);
            }
        }

        tracing::info!(platform = %self.platform(), "Notification center initialized");
        *state = Some(args);
        Ok(())
    }

    /// Tear down the center: uninstall the native received callback, drop all
    /// subscribers and return to the uninitialized state
    pub fn shutdown(&self) {
        self.unbridge();
        self.subscribers.lock().clear();
        *self.args.write() = None;
        tracing::info!(platform = %self.platform(), "Notification center shut down");
    }

    fn initialized_args(&self) -> NotificationResult<NotificationCenterArgs> {
        self.args.read().clone().ok_or(NotificationError::NotInitialized)
    }

    /// Ask the user for permission to post notifications.
    ///
    /// Each call returns an independent request. When permission is already
    /// granted no prompt is shown and the request is granted immediately.
    pub fn request_permission(&self) -> NotificationResult<NotificationsPermissionRequest> {
        let args = self.initialized_args()?;

        let request = match &self.backend {
            NativeBackend::Android(android) => {
                if android.user_permission_to_post() == PermissionStatus::Allowed {
                    NotificationsPermissionRequest::already_granted()
                } else {
                    NotificationsPermissionRequest::android(android.request_permission())
                }
            },
            NativeBackend::Ios(ios) => {
                let remote = args.ios_register_for_remote_notifications;
                if ios.authorization_status().is_authorized() && !remote {
                    NotificationsPermissionRequest::already_granted()
                } else {
                    NotificationsPermissionRequest::ios(
                        ios.request_authorization(args.ios_authorization_options(), remote),
                    )
                }
            },
        };

        tracing::debug!(platform = %self.platform(), status = ?request.status(), "Permission requested");
        Ok(request)
    }

    /// Schedule a notification in the default category.
    ///
    /// Returns the notification identifier: the explicit one when set, in which
    /// case an existing notification with the same identifier is replaced,
    /// otherwise one generated by the platform.
    pub fn schedule_notification(
        &self,
        notification: &Notification,
        schedule: &dyn NotificationSchedule,
    ) -> NotificationResult<i32> {
        self.schedule(notification, None, schedule)
    }

    /// Schedule a notification in the given category: the channel on Android,
    /// the category identifier on iOS
    pub fn schedule_notification_in_category(
        &self,
        notification: &Notification,
        category: &str,
        schedule: &dyn NotificationSchedule,
    ) -> NotificationResult<i32> {
        self.schedule(notification, Some(category), schedule)
    }

    fn schedule(
        &self,
        notification: &Notification,
        category: Option<&str>,
        schedule: &dyn NotificationSchedule,
    ) -> NotificationResult<i32> {
        let args = self.initialized_args()?;

        match &self.backend {
            NativeBackend::Android(android) => {
                let mut native = notification.to_android();
                schedule.schedule_android(&mut native, android.now());

                let channel = category
                    .or(args.android_channel_id.as_deref())
                    .unwrap_or_default();
                let id = match notification.identifier {
                    Some(id) => {
                        android.send_notification_with_explicit_id(native, channel, id);
                        id
                    },
                    None => android.send_notification(native, channel),
                };

                tracing::debug!(id, channel, "Scheduled Android notification");
                Ok(id)
            },
            NativeBackend::Ios(ios) => {
                let mut native = notification
                    .to_ios()
                    .ok_or(NotificationError::EmptyNotification)?;
                if let Some(category) = category {
                    native.category_identifier = Some(category.to_string());
                }
                schedule.schedule_ios(&mut native);

                let identifier = ios.schedule_notification(native);
                let id = match notification.identifier {
                    Some(id) => id,
                    None => parse_invariant_id(&identifier).ok_or_else(|| {
                        NotificationError::PlatformError {
                            platform: Platform::IOs,
                            message: format!("generated identifier `{identifier}` is not numeric"),
                        }
                    })?,
                };

                tracing::debug!(id, "Scheduled iOS notification");
                Ok(id)
            },
        }
    }

    /// The notification the user tapped to open the app, if any.
    ///
    /// On iOS the answer may not be known right after launch, see
    /// [`query_last_responded_notification`](Self::query_last_responded_notification).
    pub fn last_responded_notification(&self) -> NotificationResult<Option<Notification>> {
        self.initialized_args()?;

        Ok(match &self.backend {
            NativeBackend::Android(android) => android
                .get_last_notification_intent()
                .map(|intent| Notification::from_android(intent.notification, intent.id)),
            NativeBackend::Ios(ios) => ios
                .get_last_responded_notification()
                .map(Notification::from_ios),
        })
    }

    /// Asynchronously retrieve the notification the user tapped to open the app
    pub fn query_last_responded_notification(
        &self,
    ) -> NotificationResult<QueryLastRespondedNotificationOp> {
        self.initialized_args()?;

        Ok(match &self.backend {
            NativeBackend::Android(android) => QueryLastRespondedNotificationOp::resolved(
                android
                    .get_last_notification_intent()
                    .map(|intent| Notification::from_android(intent.notification, intent.id)),
            ),
            NativeBackend::Ios(ios) => {
                QueryLastRespondedNotificationOp::ios(ios.query_last_responded_notification())
            },
        })
    }

    /// Cancel a notification that has not been shown yet. Unknown IDs are ignored.
    pub fn cancel_scheduled_notification(&self, id: i32) -> NotificationResult<()> {
        self.initialized_args()?;
        match &self.backend {
            NativeBackend::Android(android) => android.cancel_scheduled_notification(id),
            NativeBackend::Ios(ios) => ios.remove_scheduled_notification(&format_invariant_id(id)),
        }
        Ok(())
    }

    /// Remove a shown notification from the tray. Unknown IDs are ignored.
    pub fn cancel_delivered_notification(&self, id: i32) -> NotificationResult<()> {
        self.initialized_args()?;
        match &self.backend {
            NativeBackend::Android(android) => android.cancel_displayed_notification(id),
            NativeBackend::Ios(ios) => ios.remove_delivered_notification(&format_invariant_id(id)),
        }
        Ok(())
    }

    pub fn cancel_all_scheduled_notifications(&self) -> NotificationResult<()> {
        self.initialized_args()?;
        match &self.backend {
            NativeBackend::Android(android) => android.cancel_all_scheduled_notifications(),
            NativeBackend::Ios(ios) => ios.remove_all_scheduled_notifications(),
        }
        Ok(())
    }

    pub fn cancel_all_delivered_notifications(&self) -> NotificationResult<()> {
        self.initialized_args()?;
        match &self.backend {
            NativeBackend::Android(android) => android.cancel_all_displayed_notifications(),
            NativeBackend::Ios(ios) => ios.remove_all_delivered_notifications(),
        }
        Ok(())
    }

    /// Clear the app icon badge. Android manages badges itself, nothing happens there.
    pub fn clear_badge(&self) -> NotificationResult<()> {
        self.initialized_args()?;
        if let NativeBackend::Ios(ios) = &self.backend {
            ios.set_application_badge(0);
        }
        Ok(())
    }

    pub fn open_notification_settings(
        &self,
        section: NotificationSettingsSection,
    ) -> NotificationResult<()> {
        let args = self.initialized_args()?;
        match &self.backend {
            NativeBackend::Android(android) => {
                let channel = match section {
                    NotificationSettingsSection::Application => None,
                    NotificationSettingsSection::Category => args.android_channel_id.as_deref(),
                };
                android.open_notification_settings(channel);
            },
            NativeBackend::Ios(ios) => ios.open_notification_settings(),
        }
        Ok(())
    }

    /// Subscribe to notifications received while the app is running.
    ///
    /// Callbacks run synchronously on the thread delivering the notification,
    /// in subscription order. They fire even when the notification is not
    /// presented in foreground.
    pub fn on_notification_received(
        &self,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        self.bridge();
        id
    }

    /// Remove a subscription, returns false if it was not found.
    /// The native callback stays installed until [`shutdown`](Self::shutdown).
    pub fn remove_notification_received(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(subscription, _)| *subscription != id);
        subscribers.len() != before
    }

    fn bridge(&self) {
        let mut bridged = self.bridged.lock();
        if bridged.is_some() {
            return;
        }

        let subscribers = Arc::clone(&self.subscribers);
        let token = match &self.backend {
            NativeBackend::Android(android) => android.add_notification_received_callback(
                Arc::new(move |intent: AndroidNotificationIntentData| {
                    broadcast(
                        &subscribers,
                        Notification::from_android(intent.notification, intent.id),
                    );
                }),
            ),
            NativeBackend::Ios(ios) => ios.add_notification_received_callback(Arc::new(
                move |notification: IosNotification| {
                    broadcast(&subscribers, Notification::from_ios(notification));
                },
            )),
        };

        tracing::debug!(platform = %self.platform(), token = token.value(), "Received callback bridged");
        *bridged = Some(token);
    }

    /// Remove this center's registration only, other centers on the same subsystem keep theirs
    fn unbridge(&self) {
        let Some(token) = self.bridged.lock().take() else {
            return;
        };

        match &self.backend {
            NativeBackend::Android(android) => android.remove_notification_received_callback(token),
            NativeBackend::Ios(ios) => ios.remove_notification_received_callback(token),
        }
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.unbridge();
    }
}

fn broadcast(subscribers: &Subscribers, notification: Notification) {
    // callbacks may subscribe or unsubscribe, so they run without the lock held
    let callbacks: Vec<NotificationReceivedCallback> = subscribers
        .lock()
        .iter()
        .map(|(_, callback)| Arc::clone(callback))
        .collect();

    if callbacks.is_empty() {
        tracing::trace!(identifier = ?notification.identifier, "Received notification dropped, no subscribers");
        return;
    }

    for callback in callbacks {
        callback(&notification);
    }
}
