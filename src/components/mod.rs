// Unified notification components shared by both mobile platforms

use serde::{Deserialize, Serialize};

pub mod center;
pub mod notification;
pub mod permission;
pub mod query;
pub mod schedule;

pub use center::{
    NotificationCenter, NotificationCenterArgs, NotificationPresentation,
    NotificationSettingsSection, SubscriptionId,
};
pub use notification::{Notification, PlatformNotification};
pub use permission::{NotificationsPermissionRequest, NotificationsPermissionStatus};
pub use query::{QueryLastRespondedNotificationOp, QueryLastRespondedNotificationState};
pub use schedule::{
    FireTimeKind, NotificationDateTimeSchedule, NotificationIntervalSchedule,
    NotificationRepeatInterval, NotificationSchedule,
};

/// Mobile platforms with a native notification subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Android NotificationManager with channels
    Android,
    /// iOS UserNotifications framework
    IOs,
}

impl Platform {
    /// Platform the crate was compiled for; hosts other than Android use iOS semantics
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::IOs
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::IOs => "iOS",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors signaled synchronously by the unified layer.
///
/// Permission denial is not an error, it is reported as
/// [`NotificationsPermissionStatus::Denied`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// An operation was called before [`NotificationCenter::initialize`]
    #[error("NotificationCenter not initialized")]
    NotInitialized,
    /// Configuration or argument rejected before any state changed
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
    /// The notification carries no native payload to schedule
    #[error("passed notification is empty")]
    EmptyNotification,
    /// The wait object has no result for the requested access
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The native subsystem returned something the unified layer cannot represent
    #[error("platform error on {platform}: {message}")]
    PlatformError { platform: Platform, message: String },
}

/// Type alias for results of unified notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;
