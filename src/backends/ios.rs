// iOS notification subsystem contract - string identifiers and trigger based scheduling

use std::collections::HashMap;
use std::ops::{BitOr, BitOrAssign, RangeInclusive};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::CallbackToken;

/// Native iOS notification value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IosNotification {
    /// String identifier; the subsystem generates one when left unset
    pub identifier: Option<String>,
    pub category_identifier: Option<String>,
    pub thread_identifier: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub badge: i32,
    /// Arbitrary payload handed back when the notification is received
    pub data: Option<String>,
    /// Present the notification while the app is in foreground
    pub show_in_foreground: bool,
    pub user_info: HashMap<String, String>,
    pub trigger: Option<IosNotificationTrigger>,
}

impl IosNotification {
    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Default::default()
        }
    }
}

/// Condition that makes a scheduled notification fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IosNotificationTrigger {
    TimeInterval(IosTimeIntervalTrigger),
    Calendar(IosCalendarTrigger),
    /// Delivered through remote push, never fires locally
    Push,
}

/// Fires after a time interval elapses, optionally repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IosTimeIntervalTrigger {
    time_interval: Duration,
    pub repeats: bool,
}

impl IosTimeIntervalTrigger {
    /// Sub-second precision is dropped, the native trigger counts whole seconds
    pub fn new(time_interval: Duration, repeats: bool) -> Self {
        Self {
            time_interval: Duration::from_secs(time_interval.as_secs()),
            repeats,
        }
    }

    pub fn time_interval(&self) -> Duration {
        self.time_interval
    }
}

/// Fires whenever the current date matches every field that is set.
/// Unset fields match any value, which is how recurrence is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IosCalendarTrigger {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Fields are expressed in UTC rather than device local time
    pub utc_time: bool,
    pub repeats: bool,
}

impl IosCalendarTrigger {
    pub fn matches(&self, time: NaiveDateTime) -> bool {
        use chrono::Timelike;

        self.matches_date(time.date())
            && self.hour.is_none_or(|hour| hour == time.hour())
            && self.minute.is_none_or(|minute| minute == time.minute())
            && self.second.is_none_or(|second| second == time.second())
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.year.is_none_or(|year| year == date.year())
            && self.month.is_none_or(|month| month == date.month())
            && self.day.is_none_or(|day| day == date.day())
    }

    /// First time strictly after `after` matching this trigger, in the same
    /// time frame as the trigger fields. Searches at most eight years ahead.
    pub fn next_fire_after(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut day = after.date();
        let last_day = match self.year {
            Some(year) => {
                if let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1)
                    && first > day
                {
                    day = first;
                }
                NaiveDate::from_ymd_opt(year, 12, 31)?
            },
            None => day.checked_add_days(chrono::Days::new(366 * 8))?,
        };

        while day <= last_day {
            if self.matches_date(day) {
                for hour in field_range(self.hour, 23) {
                    for minute in field_range(self.minute, 59) {
                        for second in field_range(self.second, 59) {
                            if let Some(candidate) = day.and_hms_opt(hour, minute, second)
                                && candidate > after
                            {
                                return Some(candidate);
                            }
                        }
                    }
                }
            }
            day = day.succ_opt()?;
        }
        None
    }
}

fn field_range(field: Option<u32>, max: u32) -> RangeInclusive<u32> {
    match field {
        Some(value) if value <= max => value..=value,
        #[allow(clippy::reversed_empty_ranges)]
        Some(_) => 1..=0,
        None => 0..=max,
    }
}

/// Authorization options requested from the user, combinable with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationOption(u32);

impl AuthorizationOption {
    pub const BADGE: Self = Self(1);
    pub const SOUND: Self = Self(1 << 1);
    pub const ALERT: Self = Self(1 << 2);
    pub const CAR_PLAY: Self = Self(1 << 3);
    pub const CRITICAL_ALERT: Self = Self(1 << 4);
    pub const PROVIDES_APP_NOTIFICATION_SETTINGS: Self = Self(1 << 5);
    pub const PROVISIONAL: Self = Self(1 << 6);

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

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AuthorizationOption {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AuthorizationOption {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Current authorization status of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
    Ephemeral,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized
                | AuthorizationStatus::Provisional
                | AuthorizationStatus::Ephemeral
        )
    }
}

#[derive(Debug, Default)]
struct AuthorizationRequestState {
    finished: bool,
    granted: bool,
    error: Option<String>,
    device_token: Option<String>,
}

/// Native authorization request, completion is observed through [`is_finished`](Self::is_finished)
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    options: AuthorizationOption,
    register_for_remote_notifications: bool,
    state: Arc<Mutex<AuthorizationRequestState>>,
}

impl AuthorizationRequest {
    pub fn new(options: AuthorizationOption, register_for_remote_notifications: bool) -> Self {
        Self {
            options,
            register_for_remote_notifications,
            state: Arc::new(Mutex::new(AuthorizationRequestState::default())),
        }
    }

    pub fn options(&self) -> AuthorizationOption {
        self.options
    }

    pub fn register_for_remote_notifications(&self) -> bool {
        self.register_for_remote_notifications
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    pub fn granted(&self) -> bool {
        self.state.lock().granted
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn device_token(&self) -> Option<String> {
        self.state.lock().device_token.clone()
    }

    /// Complete the request. Only the subsystem should call this.
    pub fn finish(&self, granted: bool, error: Option<String>, device_token: Option<String>) {
        let mut state = self.state.lock();
        state.finished = true;
        state.granted = granted;
        state.error = error;
        state.device_token = device_token;
    }
}

/// State of the native last responded notification query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IosQueryState {
    Pending,
    NoRespondedNotification,
    HaveRespondedNotification,
}

#[derive(Debug)]
struct QueryState {
    state: IosQueryState,
    notification: Option<IosNotification>,
    action_id: Option<String>,
    user_text: Option<String>,
}

/// Native asynchronous query for the notification the user tapped to open the app
#[derive(Debug, Clone)]
pub struct IosQueryLastRespondedOp {
    inner: Arc<Mutex<QueryState>>,
}

impl IosQueryLastRespondedOp {
    pub fn pending() -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueryState {
                state: IosQueryState::Pending,
                notification: None,
                action_id: None,
                user_text: None,
            })),
        }
    }

    pub fn keep_waiting(&self) -> bool {
        self.inner.lock().state == IosQueryState::Pending
    }

    pub fn state(&self) -> IosQueryState {
        self.inner.lock().state
    }

    pub fn notification(&self) -> Option<IosNotification> {
        self.inner.lock().notification.clone()
    }

    pub fn action_id(&self) -> Option<String> {
        self.inner.lock().action_id.clone()
    }

    pub fn user_text(&self) -> Option<String> {
        self.inner.lock().user_text.clone()
    }

    /// Complete the query. Only the subsystem should call this.
    pub fn complete(
        &self,
        notification: Option<IosNotification>,
        action_id: Option<String>,
        user_text: Option<String>,
    ) {
        let mut inner = self.inner.lock();
        inner.state = if notification.is_some() {
            IosQueryState::HaveRespondedNotification
        } else {
            IosQueryState::NoRespondedNotification
        };
        inner.notification = notification;
        inner.action_id = action_id;
        inner.user_text = user_text;
    }
}

/// Callback the iOS subsystem invokes for each notification received in foreground
pub type IosReceivedCallback = Arc<dyn Fn(IosNotification) + Send + Sync>;

/// Operations of the iOS notification subsystem consumed by the unified layer
pub trait IosNotificationCenter: Send + Sync {
    /// Schedule and return the identifier the notification was registered under.
    /// A pending notification with the same identifier is replaced.
    fn schedule_notification(&self, notification: IosNotification) -> String;

    fn remove_scheduled_notification(&self, identifier: &str);
    fn remove_delivered_notification(&self, identifier: &str);
    fn remove_all_scheduled_notifications(&self);
    fn remove_all_delivered_notifications(&self);

    fn get_last_responded_notification(&self) -> Option<IosNotification>;
    fn query_last_responded_notification(&self) -> IosQueryLastRespondedOp;

    fn authorization_status(&self) -> AuthorizationStatus;
    fn request_authorization(
        &self,
        options: AuthorizationOption,
        register_for_remote_notifications: bool,
    ) -> AuthorizationRequest;

    fn application_badge(&self) -> i32;
    fn set_application_badge(&self, badge: i32);

    /// Register a received callback. Every registration sees every received notification.
    fn add_notification_received_callback(&self, callback: IosReceivedCallback) -> CallbackToken;

    /// Remove one registration, unknown tokens are ignored
    fn remove_notification_received_callback(&self, token: CallbackToken);

    fn open_notification_settings(&self);
}
