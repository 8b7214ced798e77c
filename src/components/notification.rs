// Platform-neutral notification value wrapping exactly one native representation

use serde::{Deserialize, Serialize};

use super::Platform;
use crate::backends::android::AndroidNotification;
use crate::backends::ios::IosNotification;

/// The native representation a [`Notification`] wraps.
///
/// The iOS payload is nullable: it is only constructed once a content field is
/// written or when the value comes from the iOS subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformNotification {
    Android(AndroidNotification),
    Ios(Option<IosNotification>),
}

impl PlatformNotification {
    pub fn new(platform: Platform) -> Self {
        match platform {
            Platform::Android => PlatformNotification::Android(AndroidNotification::default()),
            Platform::IOs => PlatformNotification::Ios(None),
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            PlatformNotification::Android(_) => Platform::Android,
            PlatformNotification::Ios(_) => Platform::IOs,
        }
    }
}

/// A notification to be sent, or one that has been received.
///
/// Only the fields common to both platforms are exposed. Everything else the
/// native value may carry (channel, group, icons, fire time, trigger, category,
/// thread identifier, subtitle, user info) is not representable here and is
/// lost when a notification passes through the unified layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    native: PlatformNotification,
    /// Unique identifier. `None` lets the platform generate one when scheduling.
    pub identifier: Option<i32>,
    /// Whether to present the notification while the app is in foreground.
    /// Native defaults differ, so the unified value overrides them on conversion.
    /// The received callback fires regardless of this flag.
    pub show_in_foreground: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}

impl Notification {
    /// Empty notification backed by the native type of [`Platform::current`]
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self {
            native: PlatformNotification::new(platform),
            identifier: None,
            show_in_foreground: false,
        }
    }

    /// Wrap a notification delivered by the Android subsystem under `id`
    pub fn from_android(notification: AndroidNotification, id: i32) -> Self {
        Self {
            show_in_foreground: notification.show_in_foreground,
            identifier: Some(id),
            native: PlatformNotification::Android(notification),
        }
    }

    /// Wrap a notification delivered by the iOS subsystem.
    /// A string identifier that is not a plain decimal integer leaves `identifier` unset.
    pub fn from_ios(notification: IosNotification) -> Self {
        Self {
            show_in_foreground: notification.show_in_foreground,
            identifier: notification.identifier.as_deref().and_then(parse_invariant_id),
            native: PlatformNotification::Ios(Some(notification)),
        }
    }

    pub fn platform(&self) -> Platform {
        self.native.platform()
    }

    pub fn native(&self) -> &PlatformNotification {
        &self.native
    }

    /// Native Android form. Auto-cancel is always forced on to match iOS,
    /// where tapping a notification always dismisses it.
    /// A notification built for iOS carries over only the unified fields.
    pub fn to_android(&self) -> AndroidNotification {
        let mut notification = match &self.native {
            PlatformNotification::Android(notification) => notification.clone(),
            PlatformNotification::Ios(_) => AndroidNotification {
                title: self.title().map(str::to_owned),
                text: self.text().map(str::to_owned),
                intent_data: self.data().map(str::to_owned),
                number: self.badge(),
                ..Default::default()
            },
        };
        notification.show_in_foreground = self.show_in_foreground;
        notification.should_auto_cancel = true;
        notification
    }

    /// Native iOS form, `None` when no content was ever set on an iOS payload.
    /// The identifier is written as an invariant decimal string, or left unset
    /// so the subsystem generates one.
    pub fn to_ios(&self) -> Option<IosNotification> {
        let mut notification = match &self.native {
            PlatformNotification::Ios(notification) => notification.clone()?,
            PlatformNotification::Android(_) => IosNotification {
                title: self.title().map(str::to_owned),
                body: self.text().map(str::to_owned),
                data: self.data().map(str::to_owned),
                badge: self.badge(),
                ..Default::default()
            },
        };
        notification.identifier = self.identifier.map(format_invariant_id);
        notification.show_in_foreground = self.show_in_foreground;
        Some(notification)
    }

    pub fn title(&self) -> Option<&str> {
        match &self.native {
            PlatformNotification::Android(n) => n.title.as_deref(),
            PlatformNotification::Ios(n) => n.as_ref().and_then(|n| n.title.as_deref()),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = Some(title.into());
        match &mut self.native {
            PlatformNotification::Android(n) => n.title = title,
            PlatformNotification::Ios(n) => n.get_or_insert_with(Default::default).title = title,
        }
    }

    /// Main body text
    pub fn text(&self) -> Option<&str> {
        match &self.native {
            PlatformNotification::Android(n) => n.text.as_deref(),
            PlatformNotification::Ios(n) => n.as_ref().and_then(|n| n.body.as_deref()),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = Some(text.into());
        match &mut self.native {
            PlatformNotification::Android(n) => n.text = text,
            PlatformNotification::Ios(n) => n.get_or_insert_with(Default::default).body = text,
        }
    }

    /// Arbitrary data sent with the notification, available again when it
    /// arrives or is tapped
    pub fn data(&self) -> Option<&str> {
        match &self.native {
            PlatformNotification::Android(n) => n.intent_data.as_deref(),
            PlatformNotification::Ios(n) => n.as_ref().and_then(|n| n.data.as_deref()),
        }
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        let data = Some(data.into());
        match &mut self.native {
            PlatformNotification::Android(n) => n.intent_data = data,
            PlatformNotification::Ios(n) => n.get_or_insert_with(Default::default).data = data,
        }
    }

    /// Number associated with the notification, zero is ignored.
    /// Shows up as a launcher badge where supported.
    pub fn badge(&self) -> i32 {
        match &self.native {
            PlatformNotification::Android(n) => n.number,
            PlatformNotification::Ios(n) => n.as_ref().map_or(0, |n| n.badge),
        }
    }

    pub fn set_badge(&mut self, badge: i32) {
        match &mut self.native {
            PlatformNotification::Android(n) => n.number = badge,
            PlatformNotification::Ios(n) => n.get_or_insert_with(Default::default).badge = badge,
        }
    }

    pub fn with_identifier(mut self, identifier: i32) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.set_data(data);
        self
    }

    pub fn with_badge(mut self, badge: i32) -> Self {
        self.set_badge(badge);
        self
    }

    pub fn with_show_in_foreground(mut self, show_in_foreground: bool) -> Self {
        self.show_in_foreground = show_in_foreground;
        self
    }
}

/// Culture independent integer formatting used for native string identifiers
pub(crate) fn format_invariant_id(id: i32) -> String {
    id.to_string()
}

/// Plain decimal digits only: no sign, whitespace or separators
pub(crate) fn parse_invariant_id(identifier: &str) -> Option<i32> {
    if identifier.is_empty() || !identifier.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    identifier.parse().ok()
}
