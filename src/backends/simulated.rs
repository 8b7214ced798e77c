// In-memory notification subsystems driven by a virtual clock
//
// Both simulators honour the native contracts the unified layer relies on:
// explicit-ID replacement, auto-generated IDs, repeat rules, best-effort
// cancellation and polled permission prompts. Delivery only happens inside
// `advance`, on the caller's thread, so host tests stay deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;

use super::CallbackToken;
use super::android::{
    AndroidNotification, AndroidNotificationCenter, AndroidNotificationChannel,
    AndroidNotificationIntentData, AndroidReceivedCallback, PermissionRequest, PermissionStatus,
};
use super::ios::{
    AuthorizationOption, AuthorizationRequest, AuthorizationStatus, IosNotification,
    IosNotificationCenter, IosNotificationTrigger, IosQueryLastRespondedOp, IosReceivedCallback,
};
use crate::components::notification::format_invariant_id;

/// Shortest repeat period honoured by the simulators
const MIN_REPEAT_PERIOD: Duration = Duration::from_secs(1);

const SIMULATED_DEVICE_TOKEN: &str = "simulated-device-token";

fn add(time: NaiveDateTime, duration: Duration) -> NaiveDateTime {
    let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
    time.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX)
}

/// First `start + k * period` at or after `now`. A repeating notification
/// first scheduled in the past resumes at its next occurrence.
fn first_occurrence_from(start: NaiveDateTime, period: Duration, now: NaiveDateTime) -> NaiveDateTime {
    if start >= now {
        return start;
    }
    let period_ms = i64::try_from(period.as_millis()).unwrap_or(i64::MAX).max(1);
    let elapsed_ms = (now - start).num_milliseconds();
    let periods = elapsed_ms / period_ms + i64::from(elapsed_ms % period_ms != 0);
    TimeDelta::try_milliseconds(periods.saturating_mul(period_ms))
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Received-callback registrations of one simulator, invoked in registration order
struct CallbackRegistry<C> {
    entries: Mutex<Vec<(CallbackToken, C)>>,
    next_token: AtomicU64,
    installs: AtomicUsize,
}

impl<C: Clone> CallbackRegistry<C> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
            installs: AtomicUsize::new(0),
        }
    }

    fn add(&self, callback: C) -> CallbackToken {
        let token = CallbackToken::new(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.entries.lock().push((token, callback));
        self.installs.fetch_add(1, Ordering::SeqCst);
        token
    }

    fn remove(&self, token: CallbackToken) {
        self.entries.lock().retain(|(registered, _)| *registered != token);
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    /// Copied out so no callback runs under the lock
    fn snapshot(&self) -> Vec<C> {
        self.entries.lock().iter().map(|(_, callback)| callback.clone()).collect()
    }
}

/// Earliest entry due at or before `deadline`, ties broken by key for determinism
fn earliest_due<K>(entries: impl Iterator<Item = (K, NaiveDateTime)>, deadline: NaiveDateTime) -> Option<(K, NaiveDateTime)>
where
    K: Ord,
{
    entries
        .filter(|(_, fire_time)| *fire_time <= deadline)
        .min_by(|(a_key, a_time), (b_key, b_time)| a_time.cmp(b_time).then_with(|| a_key.cmp(b_key)))
}

// =============================================================================
// Android
// =============================================================================

#[derive(Debug, Clone)]
struct ScheduledAndroid {
    notification: AndroidNotification,
    channel: String,
    next_fire: NaiveDateTime,
}

struct AndroidState {
    clock: Mutex<NaiveDateTime>,
    initialized: Mutex<bool>,
    channels: DashMap<String, AndroidNotificationChannel>,
    scheduled: DashMap<i32, ScheduledAndroid>,
    displayed: DashMap<i32, AndroidNotificationIntentData>,
    last_intent: Mutex<Option<AndroidNotificationIntentData>>,
    permission: Mutex<PermissionStatus>,
    pending_requests: Mutex<Vec<PermissionRequest>>,
    callbacks: CallbackRegistry<AndroidReceivedCallback>,
    opened_settings: Mutex<Vec<Option<String>>>,
}

/// Simulated Android notification subsystem
#[derive(Clone)]
pub struct SimulatedAndroidCenter {
    state: Arc<AndroidState>,
}

impl std::fmt::Debug for SimulatedAndroidCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedAndroidCenter")
            .field("now", &*self.state.clock.lock())
            .field("scheduled", &self.state.scheduled.len())
            .field("displayed", &self.state.displayed.len())
            .finish()
    }
}

impl SimulatedAndroidCenter {
    /// Simulator whose local clock starts at `start`. Permission is not yet requested.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            state: Arc::new(AndroidState {
                clock: Mutex::new(start),
                initialized: Mutex::new(false),
                channels: DashMap::new(),
                scheduled: DashMap::new(),
                displayed: DashMap::new(),
                last_intent: Mutex::new(None),
                permission: Mutex::new(PermissionStatus::NotRequested),
                pending_requests: Mutex::new(Vec::new()),
                callbacks: CallbackRegistry::new(),
                opened_settings: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn is_initialized(&self) -> bool {
        *self.state.initialized.lock()
    }

    pub fn channel(&self, id: &str) -> Option<AndroidNotificationChannel> {
        self.state.channels.get(id).map(|channel| channel.clone())
    }

    /// IDs of notifications waiting to fire, ascending
    pub fn scheduled_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.state.scheduled.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn scheduled_notification(&self, id: i32) -> Option<AndroidNotification> {
        self.state.scheduled.get(&id).map(|entry| entry.notification.clone())
    }

    pub fn scheduled_channel(&self, id: i32) -> Option<String> {
        self.state.scheduled.get(&id).map(|entry| entry.channel.clone())
    }

    /// IDs of notifications currently shown in the tray, ascending
    pub fn displayed_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.state.displayed.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Change the permission the user has granted, without a prompt
    pub fn set_user_permission(&self, status: PermissionStatus) {
        *self.state.permission.lock() = status;
    }

    /// Answer every open permission prompt
    pub fn respond_to_permission_requests(&self, status: PermissionStatus) {
        *self.state.permission.lock() = status;
        let requests = std::mem::take(&mut *self.state.pending_requests.lock());
        tracing::debug!(?status, count = requests.len(), "Answering Android permission prompts");
        for request in requests {
            request.respond(status);
        }
    }

    /// User taps a displayed notification, making it the last notification intent
    pub fn tap(&self, id: i32) -> bool {
        match self.state.displayed.remove(&id) {
            Some((_, intent)) => {
                *self.state.last_intent.lock() = Some(intent);
                true
            },
            None => false,
        }
    }

    /// How many received callbacks have ever been registered
    pub fn callback_installations(&self) -> usize {
        self.state.callbacks.installs()
    }

    /// Received callbacks currently registered
    pub fn received_callback_count(&self) -> usize {
        self.state.callbacks.len()
    }

    pub fn has_received_callback(&self) -> bool {
        self.received_callback_count() > 0
    }

    /// Next time the notification fires
    pub fn next_fire_time(&self, id: i32) -> Option<NaiveDateTime> {
        self.state.scheduled.get(&id).map(|entry| entry.next_fire)
    }

    /// Settings pages opened so far, `None` being the application page
    pub fn opened_settings(&self) -> Vec<Option<String>> {
        self.state.opened_settings.lock().clone()
    }

    /// Move the clock forward, delivering due notifications in fire-time order.
    /// Returns the number of deliveries.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = add(*self.state.clock.lock(), by);
        let mut delivered = 0;

        while let Some((id, fire_time)) = earliest_due(
            self.state
                .scheduled
                .iter()
                .map(|entry| (*entry.key(), entry.next_fire)),
            deadline,
        ) {
            *self.state.clock.lock() = fire_time;

            let Some(intent) = self.fire(id, fire_time) else {
                continue;
            };
            delivered += 1;

            for callback in self.state.callbacks.snapshot() {
                callback(intent.clone());
            }
        }

        *self.state.clock.lock() = deadline;
        delivered
    }

    fn fire(&self, id: i32, fire_time: NaiveDateTime) -> Option<AndroidNotificationIntentData> {
        let (notification, channel, repeat) = {
            let entry = self.state.scheduled.get(&id)?;
            (
                entry.notification.clone(),
                entry.channel.clone(),
                entry.notification.effective_repeat_interval(),
            )
        };

        match repeat {
            Some(period) => {
                if let Some(mut entry) = self.state.scheduled.get_mut(&id) {
                    entry.next_fire = add(fire_time, period.max(MIN_REPEAT_PERIOD));
                }
            },
            None => {
                self.state.scheduled.remove(&id);
            },
        }

        tracing::debug!(id, %fire_time, channel = %channel, "Simulated Android delivery");
        let intent = AndroidNotificationIntentData {
            id,
            channel,
            notification,
        };
        self.state.displayed.insert(id, intent.clone());
        Some(intent)
    }

    fn generate_id(&self) -> i32 {
        let mut rng = rand::rng();
        loop {
            let id = rng.random_range(1..=i32::MAX);
            if !self.state.scheduled.contains_key(&id) && !self.state.displayed.contains_key(&id) {
                return id;
            }
        }
    }

    fn post(&self, notification: AndroidNotification, channel_id: &str, id: i32) {
        if !self.state.channels.contains_key(channel_id) {
            tracing::warn!(channel = channel_id, id, "Posting to an unregistered channel");
        }
        let now = *self.state.clock.lock();
        let next_fire = match (notification.fire_time, notification.effective_repeat_interval()) {
            (Some(fire_time), Some(period)) => {
                first_occurrence_from(fire_time, period.max(MIN_REPEAT_PERIOD), now)
            },
            (fire_time, _) => fire_time.unwrap_or(now),
        };
        self.state.scheduled.insert(id, ScheduledAndroid {
            notification,
            channel: channel_id.to_string(),
            next_fire,
        });
    }
}

impl AndroidNotificationCenter for SimulatedAndroidCenter {
    fn initialize(&self) -> bool {
        *self.state.initialized.lock() = true;
        true
    }

    fn register_notification_channel(&self, channel: AndroidNotificationChannel) {
        tracing::debug!(channel = %channel.id, importance = ?channel.importance, "Registering channel");
        self.state.channels.insert(channel.id.clone(), channel);
    }

    fn send_notification(&self, notification: AndroidNotification, channel_id: &str) -> i32 {
        let id = self.generate_id();
        self.post(notification, channel_id, id);
        id
    }

    fn send_notification_with_explicit_id(
        &self,
        notification: AndroidNotification,
        channel_id: &str,
        id: i32,
    ) {
        self.post(notification, channel_id, id);
    }

    fn cancel_scheduled_notification(&self, id: i32) {
        self.state.scheduled.remove(&id);
    }

    fn cancel_displayed_notification(&self, id: i32) {
        self.state.displayed.remove(&id);
    }

    fn cancel_all_scheduled_notifications(&self) {
        self.state.scheduled.clear();
    }

    fn cancel_all_displayed_notifications(&self) {
        self.state.displayed.clear();
    }

    fn get_last_notification_intent(&self) -> Option<AndroidNotificationIntentData> {
        self.state.last_intent.lock().clone()
    }

    fn user_permission_to_post(&self) -> PermissionStatus {
        *self.state.permission.lock()
    }

    fn request_permission(&self) -> PermissionRequest {
        let status = *self.state.permission.lock();
        match status {
            PermissionStatus::Allowed
            | PermissionStatus::DeniedDontAskAgain
            | PermissionStatus::NotificationsBlockedForApp => PermissionRequest::new(status),
            _ => {
                let request = PermissionRequest::pending();
                self.state.pending_requests.lock().push(request.clone());
                request
            },
        }
    }

    fn add_notification_received_callback(&self, callback: AndroidReceivedCallback) -> CallbackToken {
        self.state.callbacks.add(callback)
    }

    fn remove_notification_received_callback(&self, token: CallbackToken) {
        self.state.callbacks.remove(token);
    }

    fn open_notification_settings(&self, channel_id: Option<&str>) {
        self.state
            .opened_settings
            .lock()
            .push(channel_id.map(str::to_owned));
    }

    fn now(&self) -> NaiveDateTime {
        *self.state.clock.lock()
    }
}

// =============================================================================
// iOS
// =============================================================================

#[derive(Debug, Clone)]
struct ScheduledIos {
    notification: IosNotification,
    /// `None` for triggers that never fire locally
    next_fire: Option<NaiveDateTime>,
}

struct IosState {
    clock: Mutex<NaiveDateTime>,
    scheduled: DashMap<String, ScheduledIos>,
    delivered: DashMap<String, IosNotification>,
    last_responded: Mutex<Option<IosNotification>>,
    pending_queries: Mutex<Vec<IosQueryLastRespondedOp>>,
    authorization: Mutex<AuthorizationStatus>,
    pending_authorizations: Mutex<Vec<AuthorizationRequest>>,
    badge: Mutex<i32>,
    callbacks: CallbackRegistry<IosReceivedCallback>,
    settings_opened: AtomicUsize,
}

/// Simulated iOS notification subsystem.
///
/// Calendar triggers are evaluated against the simulator clock directly, which
/// is taken to be in the time frame of the trigger fields.
#[derive(Clone)]
pub struct SimulatedIosCenter {
    state: Arc<IosState>,
}

impl std::fmt::Debug for SimulatedIosCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedIosCenter")
            .field("now", &*self.state.clock.lock())
            .field("scheduled", &self.state.scheduled.len())
            .field("delivered", &self.state.delivered.len())
            .finish()
    }
}

impl SimulatedIosCenter {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            state: Arc::new(IosState {
                clock: Mutex::new(start),
                scheduled: DashMap::new(),
                delivered: DashMap::new(),
                last_responded: Mutex::new(None),
                pending_queries: Mutex::new(Vec::new()),
                authorization: Mutex::new(AuthorizationStatus::NotDetermined),
                pending_authorizations: Mutex::new(Vec::new()),
                badge: Mutex::new(0),
                callbacks: CallbackRegistry::new(),
                settings_opened: AtomicUsize::new(0),
            }),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        *self.state.clock.lock()
    }

    /// Identifiers of notifications waiting to fire, sorted
    pub fn scheduled_identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> =
            self.state.scheduled.iter().map(|entry| entry.key().clone()).collect();
        identifiers.sort_unstable();
        identifiers
    }

    pub fn scheduled_notification(&self, identifier: &str) -> Option<IosNotification> {
        self.state
            .scheduled
            .get(identifier)
            .map(|entry| entry.notification.clone())
    }

    /// Next time the notification fires, `None` if never
    pub fn next_fire_time(&self, identifier: &str) -> Option<NaiveDateTime> {
        self.state.scheduled.get(identifier).and_then(|entry| entry.next_fire)
    }

    pub fn delivered_identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> =
            self.state.delivered.iter().map(|entry| entry.key().clone()).collect();
        identifiers.sort_unstable();
        identifiers
    }

    pub fn set_authorization_status(&self, status: AuthorizationStatus) {
        *self.state.authorization.lock() = status;
    }

    /// Answer every open authorization prompt
    pub fn respond_to_authorization_requests(&self, granted: bool) {
        *self.state.authorization.lock() = if granted {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        let requests = std::mem::take(&mut *self.state.pending_authorizations.lock());
        tracing::debug!(granted, count = requests.len(), "Answering iOS authorization prompts");
        for request in requests {
            Self::finish_authorization(&request, granted);
        }
    }

    /// User taps a delivered notification, making it the last responded one
    pub fn tap(&self, identifier: &str) -> bool {
        match self.state.delivered.remove(identifier) {
            Some((_, notification)) => {
                *self.state.last_responded.lock() = Some(notification);
                true
            },
            None => false,
        }
    }

    /// App finished launching: complete outstanding last-responded queries
    pub fn complete_last_responded_queries(&self) {
        let queries = std::mem::take(&mut *self.state.pending_queries.lock());
        let responded = self.state.last_responded.lock().clone();
        for query in queries {
            query.complete(responded.clone(), None, None);
        }
    }

    pub fn callback_installations(&self) -> usize {
        self.state.callbacks.installs()
    }

    pub fn received_callback_count(&self) -> usize {
        self.state.callbacks.len()
    }

    pub fn has_received_callback(&self) -> bool {
        self.received_callback_count() > 0
    }

    pub fn settings_opened(&self) -> usize {
        self.state.settings_opened.load(Ordering::SeqCst)
    }

    /// Move the clock forward, delivering due notifications in fire-time order.
    /// Outstanding last-responded queries complete first. Returns the number of deliveries.
    pub fn advance(&self, by: Duration) -> usize {
        self.complete_last_responded_queries();

        let deadline = add(*self.state.clock.lock(), by);
        let mut delivered = 0;

        while let Some((identifier, fire_time)) = earliest_due(
            self.state
                .scheduled
                .iter()
                .filter_map(|entry| entry.next_fire.map(|time| (entry.key().clone(), time))),
            deadline,
        ) {
            *self.state.clock.lock() = fire_time;

            let Some(notification) = self.fire(&identifier, fire_time) else {
                continue;
            };
            delivered += 1;

            for callback in self.state.callbacks.snapshot() {
                callback(notification.clone());
            }
        }

        *self.state.clock.lock() = deadline;
        delivered
    }

    fn fire(&self, identifier: &str, fire_time: NaiveDateTime) -> Option<IosNotification> {
        let notification = self.state.scheduled.get(identifier)?.notification.clone();

        let next_fire = match &notification.trigger {
            Some(IosNotificationTrigger::TimeInterval(trigger)) if trigger.repeats => {
                Some(add(fire_time, trigger.time_interval().max(MIN_REPEAT_PERIOD)))
            },
            Some(IosNotificationTrigger::Calendar(trigger)) if trigger.repeats => {
                trigger.next_fire_after(fire_time)
            },
            _ => None,
        };

        match next_fire {
            Some(next_fire) => {
                if let Some(mut entry) = self.state.scheduled.get_mut(identifier) {
                    entry.next_fire = Some(next_fire);
                }
            },
            None => {
                self.state.scheduled.remove(identifier);
            },
        }

        if notification.badge > 0 {
            *self.state.badge.lock() = notification.badge;
        }

        tracing::debug!(identifier, %fire_time, "Simulated iOS delivery");
        self.state
            .delivered
            .insert(identifier.to_string(), notification.clone());
        Some(notification)
    }

    fn generate_identifier(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let identifier = format_invariant_id(rng.random_range(1..=i32::MAX));
            if !self.state.scheduled.contains_key(&identifier)
                && !self.state.delivered.contains_key(&identifier)
            {
                return identifier;
            }
        }
    }

    fn finish_authorization(request: &AuthorizationRequest, granted: bool) {
        let token = (granted && request.register_for_remote_notifications())
            .then(|| SIMULATED_DEVICE_TOKEN.to_string());
        request.finish(granted, None, token);
    }
}

impl IosNotificationCenter for SimulatedIosCenter {
    fn schedule_notification(&self, mut notification: IosNotification) -> String {
        let identifier = match notification.identifier.clone() {
            Some(identifier) => identifier,
            None => self.generate_identifier(),
        };
        notification.identifier = Some(identifier.clone());

        let now = *self.state.clock.lock();
        let next_fire = match &notification.trigger {
            None => Some(now),
            Some(IosNotificationTrigger::TimeInterval(trigger)) => {
                Some(add(now, trigger.time_interval()))
            },
            Some(IosNotificationTrigger::Calendar(trigger)) => trigger.next_fire_after(now),
            Some(IosNotificationTrigger::Push) => None,
        };

        tracing::debug!(identifier = %identifier, ?next_fire, "Simulated iOS schedule");
        self.state.scheduled.insert(identifier.clone(), ScheduledIos {
            notification,
            next_fire,
        });
        identifier
    }

    fn remove_scheduled_notification(&self, identifier: &str) {
        self.state.scheduled.remove(identifier);
    }

    fn remove_delivered_notification(&self, identifier: &str) {
        self.state.delivered.remove(identifier);
    }

    fn remove_all_scheduled_notifications(&self) {
        self.state.scheduled.clear();
    }

    fn remove_all_delivered_notifications(&self) {
        self.state.delivered.clear();
    }

    fn get_last_responded_notification(&self) -> Option<IosNotification> {
        self.state.last_responded.lock().clone()
    }

    fn query_last_responded_notification(&self) -> IosQueryLastRespondedOp {
        let query = IosQueryLastRespondedOp::pending();
        self.state.pending_queries.lock().push(query.clone());
        query
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        *self.state.authorization.lock()
    }

    fn request_authorization(
        &self,
        options: AuthorizationOption,
        register_for_remote_notifications: bool,
    ) -> AuthorizationRequest {
        let request = AuthorizationRequest::new(options, register_for_remote_notifications);
        let status = *self.state.authorization.lock();
        match status {
            AuthorizationStatus::NotDetermined => {
                self.state.pending_authorizations.lock().push(request.clone());
            },
            // the prompt is only shown once, later requests answer immediately
            status => Self::finish_authorization(&request, status.is_authorized()),
        }
        request
    }

    fn application_badge(&self) -> i32 {
        *self.state.badge.lock()
    }

    fn set_application_badge(&self, badge: i32) {
        *self.state.badge.lock() = badge;
    }

    fn add_notification_received_callback(&self, callback: IosReceivedCallback) -> CallbackToken {
        self.state.callbacks.add(callback)
    }

    fn remove_notification_received_callback(&self, token: CallbackToken) {
        self.state.callbacks.remove(token);
    }

    fn open_notification_settings(&self) {
        self.state.settings_opened.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::backends::ios::{IosCalendarTrigger, IosTimeIntervalTrigger};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid test date")
    }

    #[test]
    fn android_explicit_id_replaces_pending_notification() {
        let android = SimulatedAndroidCenter::new(start());
        let mut first = AndroidNotification::default();
        first.title = Some("first".into());
        let mut second = AndroidNotification::default();
        second.title = Some("second".into());

        android.send_notification_with_explicit_id(first, "c", 42);
        android.send_notification_with_explicit_id(second, "c", 42);

        assert_eq!(android.scheduled_ids(), vec![42]);
        assert_eq!(
            android.scheduled_notification(42).and_then(|n| n.title),
            Some("second".to_string())
        );
    }

    #[test]
    fn android_repeating_notification_stays_scheduled() {
        let android = SimulatedAndroidCenter::new(start());
        let mut notification = AndroidNotification::default();
        notification.fire_time = Some(add(start(), Duration::from_secs(60)));
        notification.repeat_interval = Some(Duration::from_secs(60));
        let id = android.send_notification(notification, "c");

        assert_eq!(android.advance(Duration::from_secs(185)), 3);
        assert_eq!(android.scheduled_ids(), vec![id]);
        assert_eq!(android.displayed_ids(), vec![id]);
    }

    #[test]
    fn android_repeat_scheduled_in_the_past_resumes_at_next_occurrence() {
        let android = SimulatedAndroidCenter::new(start());
        let first = NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid test date");
        let mut notification = AndroidNotification::default();
        notification.fire_time = Some(first);
        notification.repeat_interval = Some(Duration::from_secs(24 * 3600));
        let id = android.send_notification(notification, "c");

        assert_eq!(
            android.next_fire_time(id),
            NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(8, 0, 0))
        );
        assert_eq!(android.advance(Duration::from_secs(1)), 0);
        assert_eq!(android.advance(Duration::from_secs(22 * 3600)), 1);
    }

    #[test]
    fn one_time_notification_in_the_past_fires_on_next_tick() {
        let android = SimulatedAndroidCenter::new(start());
        let mut notification = AndroidNotification::default();
        notification.fire_time = NaiveDate::from_ymd_opt(2020, 1, 1).and_then(|d| d.and_hms_opt(8, 0, 0));
        android.send_notification(notification, "c");

        assert_eq!(android.advance(Duration::from_secs(1)), 1);
    }

    #[test]
    fn every_registered_callback_sees_delivery_until_removed() {
        let android = SimulatedAndroidCenter::new(start());
        let seen = Arc::new(AtomicUsize::new(0));
        let register = |android: &SimulatedAndroidCenter| {
            let seen = Arc::clone(&seen);
            android.add_notification_received_callback(Arc::new(move |_: AndroidNotificationIntentData| {
                seen.fetch_add(1, Ordering::SeqCst);
            }))
        };
        let first = register(&android);
        let second = register(&android);
        assert_ne!(first, second);

        android.send_notification(AndroidNotification::default(), "c");
        android.advance(Duration::from_secs(1));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        android.remove_notification_received_callback(first);
        android.send_notification(AndroidNotification::default(), "c");
        android.advance(Duration::from_secs(1));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(android.received_callback_count(), 1);
    }

    #[test]
    fn android_tap_records_last_intent() {
        let android = SimulatedAndroidCenter::new(start());
        let id = android.send_notification(AndroidNotification::default(), "c");
        android.advance(Duration::from_secs(1));

        assert!(android.tap(id));
        assert_eq!(android.get_last_notification_intent().map(|i| i.id), Some(id));
        assert!(!android.tap(id));
    }

    #[test]
    fn ios_time_interval_trigger_fires_after_interval() {
        let ios = SimulatedIosCenter::new(start());
        let mut notification = IosNotification::default();
        notification.trigger = Some(IosNotificationTrigger::TimeInterval(
            IosTimeIntervalTrigger::new(Duration::from_secs(5), false),
        ));
        let identifier = ios.schedule_notification(notification);

        assert_eq!(ios.advance(Duration::from_secs(4)), 0);
        assert_eq!(ios.advance(Duration::from_secs(1)), 1);
        assert_eq!(ios.delivered_identifiers(), vec![identifier]);
        assert!(ios.scheduled_identifiers().is_empty());
    }

    #[test]
    fn ios_generated_identifiers_are_numeric() {
        let ios = SimulatedIosCenter::new(start());
        let identifier = ios.schedule_notification(IosNotification::default());
        assert!(identifier.parse::<i32>().is_ok_and(|id| id > 0));
    }

    #[test]
    fn ios_repeating_calendar_trigger_reschedules() {
        let ios = SimulatedIosCenter::new(start());
        let mut notification = IosNotification::with_identifier("7");
        notification.trigger = Some(IosNotificationTrigger::Calendar(IosCalendarTrigger {
            minute: Some(30),
            second: Some(0),
            repeats: true,
            ..Default::default()
        }));
        ios.schedule_notification(notification);

        assert_eq!(ios.advance(Duration::from_secs(2 * 3600)), 2);
        assert_eq!(
            ios.next_fire_time("7"),
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(12, 30, 0))
        );
    }

    #[test]
    fn ios_authorization_prompt_is_answered_later() {
        let ios = SimulatedIosCenter::new(start());
        let request = ios.request_authorization(AuthorizationOption::ALERT, true);
        assert!(!request.is_finished());

        ios.respond_to_authorization_requests(true);
        assert!(request.is_finished());
        assert!(request.granted());
        assert_eq!(request.device_token().as_deref(), Some(SIMULATED_DEVICE_TOKEN));

        let again = ios.request_authorization(AuthorizationOption::ALERT, false);
        assert!(again.is_finished());
        assert!(again.granted());
    }
}
