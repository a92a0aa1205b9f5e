//! Notification taxonomy for HR workflow events

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of business event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A leave/vacation request was submitted (sent to approvers).
    LeaveRequest,
    /// A leave request was approved.
    LeaveApproved,
    /// A leave request was rejected.
    LeaveRejected,
    /// A payment was issued.
    Payment,
    /// Anything administrative that does not fit the above.
    System,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LeaveRequest => "leave_request",
            Self::LeaveApproved => "leave_approved",
            Self::LeaveRejected => "leave_rejected",
            Self::Payment => "payment",
            Self::System => "system",
        };
        f.write_str(s)
    }
}
