// Native notification subsystems the unified layer sits on
// Each subsystem is a contract plus its native value types

pub mod android;
pub mod ios;
pub mod simulated;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;

use self::android::AndroidNotificationCenter;
use self::ios::IosNotificationCenter;
use self::simulated::{SimulatedAndroidCenter, SimulatedIosCenter};
use crate::components::Platform;
use crate::components::notification::format_invariant_id;

/// Handle for one received-callback registration on a native subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackToken(u64);

impl CallbackToken {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// The native subsystem a notification center talks to.
/// Exactly one platform is active per center.
#[derive(Clone)]
pub enum NativeBackend {
    Android(Arc<dyn AndroidNotificationCenter>),
    Ios(Arc<dyn IosNotificationCenter>),
}

impl NativeBackend {
    pub fn android(center: impl AndroidNotificationCenter + 'static) -> Self {
        NativeBackend::Android(Arc::new(center))
    }

    pub fn ios(center: impl IosNotificationCenter + 'static) -> Self {
        NativeBackend::Ios(Arc::new(center))
    }

    pub fn platform(&self) -> Platform {
        match self {
            NativeBackend::Android(_) => Platform::Android,
            NativeBackend::Ios(_) => Platform::IOs,
        }
    }
}

impl std::fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NativeBackend").field(&self.platform()).finish()
    }
}

/// A simulated subsystem together with the handle driving it
#[derive(Debug, Clone)]
pub enum SimulatedBackend {
    Android(SimulatedAndroidCenter),
    Ios(SimulatedIosCenter),
}

impl SimulatedBackend {
    pub fn platform(&self) -> Platform {
        match self {
            SimulatedBackend::Android(_) => Platform::Android,
            SimulatedBackend::Ios(_) => Platform::IOs,
        }
    }

    /// Backend to hand to a notification center, sharing state with `self`
    pub fn native(&self) -> NativeBackend {
        match self {
            SimulatedBackend::Android(center) => NativeBackend::android(center.clone()),
            SimulatedBackend::Ios(center) => NativeBackend::ios(center.clone()),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            SimulatedBackend::Android(center) => AndroidNotificationCenter::now(center),
            SimulatedBackend::Ios(center) => center.now(),
        }
    }

    /// Move the virtual clock, returns the number of deliveries
    pub fn advance(&self, by: Duration) -> usize {
        match self {
            SimulatedBackend::Android(center) => center.advance(by),
            SimulatedBackend::Ios(center) => center.advance(by),
        }
    }

    /// Number of notifications waiting to fire
    pub fn scheduled_count(&self) -> usize {
        match self {
            SimulatedBackend::Android(center) => center.scheduled_ids().len(),
            SimulatedBackend::Ios(center) => center.scheduled_identifiers().len(),
        }
    }

    /// Answer open permission prompts
    pub fn respond_to_permission_requests(&self, granted: bool) {
        match self {
            SimulatedBackend::Android(center) => {
                center.respond_to_permission_requests(if granted {
                    android::PermissionStatus::Allowed
                } else {
                    android::PermissionStatus::Denied
                })
            },
            SimulatedBackend::Ios(center) => center.respond_to_authorization_requests(granted),
        }
    }

    /// Grant permission up front, without a prompt
    pub fn grant_permission(&self) {
        match self {
            SimulatedBackend::Android(center) => {
                center.set_user_permission(android::PermissionStatus::Allowed)
            },
            SimulatedBackend::Ios(center) => {
                center.set_authorization_status(ios::AuthorizationStatus::Authorized)
            },
        }
    }

    /// User taps the delivered notification with the given unified ID
    pub fn tap(&self, id: i32) -> bool {
        match self {
            SimulatedBackend::Android(center) => center.tap(id),
            SimulatedBackend::Ios(center) => center.tap(&format_invariant_id(id)),
        }
    }
}

/// Factory for creating platform backends
pub struct PlatformBackendFactory;

impl PlatformBackendFactory {
    /// Create an in-memory subsystem for `platform` whose clock starts at `start`
    pub fn create_simulated(platform: Platform, start: NaiveDateTime) -> SimulatedBackend {
        match platform {
            Platform::Android => SimulatedBackend::Android(SimulatedAndroidCenter::new(start)),
            Platform::IOs => SimulatedBackend::Ios(SimulatedIosCenter::new(start)),
        }
    }

    /// Simulated subsystems for every supported platform, Android first
    pub fn all_simulated(start: NaiveDateTime) -> Vec<SimulatedBackend> {
        [Platform::Android, Platform::IOs]
            .into_iter()
            .map(|platform| Self::create_simulated(platform, start))
            .collect()
    }
}
