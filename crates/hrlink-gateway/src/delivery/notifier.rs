//! Workflow notification surface
//!
//! The approval/leave/payment handlers elsewhere in the application hold a
//! [`Notifier`] and call it when a business event occurs. It is a thin layer
//! over the delivery engine; durability of the notification itself stays with
//! the storage side.

use super::{DeliveryEngine, Target};
use crate::protocol::OutboundEvent;
use hrlink_core::{NotificationKind, Role, UserId};
use std::sync::Arc;

/// Pushes HR workflow notifications to connected users.
#[derive(Debug, Clone)]
pub struct Notifier {
    engine: Arc<DeliveryEngine>,
}

impl Notifier {
    #[must_use]
    pub fn new(engine: Arc<DeliveryEngine>) -> Self {
        Self { engine }
    }

    /// Push an arbitrary notification to one user.
    pub async fn notify_user(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> usize {
        let event = OutboundEvent::Notification {
            user_id,
            title: title.into(),
            body: body.into(),
            kind,
        };
        self.engine.deliver(&Target::user(user_id), &event).await
    }

    /// Push a notification to everyone currently holding a role.
    pub async fn notify_role(
        &self,
        role: Role,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> usize {
        // user_id on a role broadcast is a sentinel; clients render title/body
        let event = OutboundEvent::Notification {
            user_id: UserId::new(0),
            title: title.into(),
            body: body.into(),
            kind,
        };
        self.engine.deliver(&Target::role(role), &event).await
    }

    /// A leave request was approved.
    pub async fn leave_approved(&self, user_id: UserId, detail: impl Into<String>) -> usize {
        self.notify_user(
            user_id,
            NotificationKind::LeaveApproved,
            "Leave request approved",
            detail,
        )
        .await
    }

    /// A leave request was rejected.
    pub async fn leave_rejected(&self, user_id: UserId, detail: impl Into<String>) -> usize {
        self.notify_user(
            user_id,
            NotificationKind::LeaveRejected,
            "Leave request rejected",
            detail,
        )
        .await
    }

    /// A payment was issued.
    pub async fn payment_issued(&self, user_id: UserId, detail: impl Into<String>) -> usize {
        self.notify_user(user_id, NotificationKind::Payment, "Payment issued", detail)
            .await
    }

    /// A new leave request needs review (sent to the approver role).
    pub async fn leave_requested(&self, approvers: Role, detail: impl Into<String>) -> usize {
        self.notify_role(
            approvers,
            NotificationKind::LeaveRequest,
            "New leave request",
            detail,
        )
        .await
    }
}
