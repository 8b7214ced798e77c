// Unified permission request over the Android and iOS polling primitives

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::backends::android::{PermissionRequest, PermissionStatus};
use crate::backends::ios::AuthorizationRequest;

/// Status of a notification permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationsPermissionStatus {
    /// Request ongoing, usually the user is looking at the permission prompt
    RequestPending,
    /// Notifications can be posted
    Granted,
    /// Notifications will not be shown; native errors also end up here
    Denied,
}

#[derive(Debug)]
enum PermissionSource {
    /// Permission was granted before the request was made, no native request exists
    AlreadyGranted,
    Android(PermissionRequest),
    Ios(AuthorizationRequest),
}

/// Tracks a permission request until the user grants or denies it.
///
/// Poll [`keep_waiting`](Self::keep_waiting) once per tick, or `.await` the
/// request: a pending poll re-wakes its task so the executor checks again on the
/// next tick. There is no timeout, impose one externally if needed.
/// Once a terminal status is observed it never changes.
#[derive(Debug)]
pub struct NotificationsPermissionRequest {
    source: PermissionSource,
    resolved: Mutex<Option<NotificationsPermissionStatus>>,
}

impl NotificationsPermissionRequest {
    pub(crate) fn already_granted() -> Self {
        Self::from_source(PermissionSource::AlreadyGranted)
    }

    pub(crate) fn android(request: PermissionRequest) -> Self {
        Self::from_source(PermissionSource::Android(request))
    }

    pub(crate) fn ios(request: AuthorizationRequest) -> Self {
        Self::from_source(PermissionSource::Ios(request))
    }

    fn from_source(source: PermissionSource) -> Self {
        Self {
            source,
            resolved: Mutex::new(None),
        }
    }

    /// True while the request is still pending
    pub fn keep_waiting(&self) -> bool {
        self.status() == NotificationsPermissionStatus::RequestPending
    }

    pub fn status(&self) -> NotificationsPermissionStatus {
        let mut resolved = self.resolved.lock();
        if let Some(status) = *resolved {
            return status;
        }

        let status = match &self.source {
            PermissionSource::AlreadyGranted => NotificationsPermissionStatus::Granted,
            PermissionSource::Android(request) => match request.status() {
                PermissionStatus::RequestPending => NotificationsPermissionStatus::RequestPending,
                PermissionStatus::Allowed => NotificationsPermissionStatus::Granted,
                _ => NotificationsPermissionStatus::Denied,
            },
            PermissionSource::Ios(request) => {
                if !request.is_finished() {
                    NotificationsPermissionStatus::RequestPending
                } else if request.granted() {
                    NotificationsPermissionStatus::Granted
                } else {
                    NotificationsPermissionStatus::Denied
                }
            },
        };

        if status != NotificationsPermissionStatus::RequestPending {
            *resolved = Some(status);
        }
        status
    }

    /// Device token for remote notifications, iOS only and only when remote
    /// registration was requested
    pub fn device_token(&self) -> Option<String> {
        match &self.source {
            PermissionSource::Ios(request) => request.device_token(),
            _ => None,
        }
    }

    /// Error reported by the native request, iOS only. The status is Denied in that case.
    pub fn error(&self) -> Option<String> {
        match &self.source {
            PermissionSource::Ios(request) => request.error(),
            _ => None,
        }
    }
}

impl Future for NotificationsPermissionRequest {
    type Output = NotificationsPermissionStatus;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.status() {
            NotificationsPermissionStatus::RequestPending => {
                cx.waker().wake_by_ref();
                Poll::Pending
            },
            status => Poll::Ready(status),
        }
    }
}
