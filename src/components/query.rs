// Unified query for the notification the user tapped to open the app

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::notification::Notification;
use super::{NotificationError, NotificationResult};
use crate::backends::ios::{IosQueryLastRespondedOp, IosQueryState};

/// State of a [`QueryLastRespondedNotificationOp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryLastRespondedNotificationState {
    /// Still running, check again on the next tick
    Pending,
    /// App was launched normally
    NoRespondedNotification,
    /// App was launched by tapping a notification, see
    /// [`QueryLastRespondedNotificationOp::notification`]
    HaveRespondedNotification,
}

impl From<IosQueryState> for QueryLastRespondedNotificationState {
    fn from(state: IosQueryState) -> Self {
        match state {
            IosQueryState::Pending => QueryLastRespondedNotificationState::Pending,
            IosQueryState::NoRespondedNotification => {
                QueryLastRespondedNotificationState::NoRespondedNotification
            },
            IosQueryState::HaveRespondedNotification => {
                QueryLastRespondedNotificationState::HaveRespondedNotification
            },
        }
    }
}

#[derive(Debug)]
enum QuerySource {
    /// Answer was available synchronously
    Resolved,
    Ios(IosQueryLastRespondedOp),
}

/// Retrieves the notification used to open the app.
///
/// When the app was not running it launches first and the notification is
/// handed over later, so the operation may take a few ticks. Poll
/// [`keep_waiting`](Self::keep_waiting) once per tick or `.await` it.
#[derive(Debug)]
pub struct QueryLastRespondedNotificationOp {
    source: QuerySource,
    notification: Mutex<Option<Notification>>,
}

impl QueryLastRespondedNotificationOp {
    pub(crate) fn resolved(notification: Option<Notification>) -> Self {
        Self {
            source: QuerySource::Resolved,
            notification: Mutex::new(notification),
        }
    }

    pub(crate) fn ios(operation: IosQueryLastRespondedOp) -> Self {
        Self {
            source: QuerySource::Ios(operation),
            notification: Mutex::new(None),
        }
    }

    pub fn keep_waiting(&self) -> bool {
        match &self.source {
            QuerySource::Resolved => false,
            QuerySource::Ios(operation) => operation.keep_waiting(),
        }
    }

    pub fn state(&self) -> QueryLastRespondedNotificationState {
        match &self.source {
            QuerySource::Resolved => {
                if self.notification.lock().is_some() {
                    QueryLastRespondedNotificationState::HaveRespondedNotification
                } else {
                    QueryLastRespondedNotificationState::NoRespondedNotification
                }
            },
            QuerySource::Ios(operation) => operation.state().into(),
        }
    }

    /// The notification that opened the app.
    ///
    /// Fails while the operation is pending or when the app was launched normally.
    /// The unified value is built on first access and cached.
    pub fn notification(&self) -> NotificationResult<Notification> {
        let mut cached = self.notification.lock();
        if let Some(notification) = cached.as_ref() {
            return Ok(notification.clone());
        }

        if let QuerySource::Ios(operation) = &self.source
            && operation.state() == IosQueryState::HaveRespondedNotification
            && let Some(native) = operation.notification()
        {
            let notification = Notification::from_ios(native);
            *cached = Some(notification.clone());
            return Ok(notification);
        }

        Err(NotificationError::InvalidOperation(
            "operation does not have a valid notification".to_string(),
        ))
    }
}

impl Future for QueryLastRespondedNotificationOp {
    type Output = Option<Notification>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.state() {
            QueryLastRespondedNotificationState::Pending => {
                cx.waker().wake_by_ref();
                Poll::Pending
            },
            QueryLastRespondedNotificationState::NoRespondedNotification => Poll::Ready(None),
            QueryLastRespondedNotificationState::HaveRespondedNotification => {
                Poll::Ready(self.notification().ok())
            },
        }
    }
}
