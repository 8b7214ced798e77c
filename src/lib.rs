//! Unified local notifications for Android and iOS
//!
//! One platform-neutral API over two native notification subsystems: the
//! channel based Android subsystem with integer IDs, and the iOS subsystem with
//! string identifiers and trigger objects. The [`NotificationCenter`] is the
//! entry point; it converts unified [`Notification`] values to the native
//! representation, applies a [`NotificationSchedule`], and hands out polling
//! wait objects for permission prompts and launch queries.
//!
//! The native subsystems are contracts ([`AndroidNotificationCenter`],
//! [`IosNotificationCenter`]). In-memory implementations driven by a virtual
//! clock live in [`backends::simulated`].
//!
//! ```
//! use std::time::Duration;
//!
//! use chrono::NaiveDate;
//! use unified_notifications::{
//!     Notification, NotificationCenter, NotificationCenterArgs, NotificationIntervalSchedule,
//!     Platform, PlatformBackendFactory,
//! };
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let simulated = PlatformBackendFactory::create_simulated(Platform::Android, start);
//! let center = NotificationCenter::new(simulated.native());
//! center
//!     .initialize(NotificationCenterArgs::default().with_android_channel("news", "News", "Daily news"))
//!     .unwrap();
//!
//! let notification = Notification::for_platform(Platform::Android).with_title("Hello");
//! let id = center
//!     .schedule_notification(&notification, &NotificationIntervalSchedule::once(Duration::from_secs(5)))
//!     .unwrap();
//! assert!(id > 0);
//! assert_eq!(simulated.advance(Duration::from_secs(5)), 1);
//! ```

pub mod backends;
pub mod components;

// Re-export for convenience
pub use backends::android::AndroidNotificationCenter;
pub use backends::ios::IosNotificationCenter;
pub use backends::{NativeBackend, PlatformBackendFactory, SimulatedBackend};
pub use components::*;
