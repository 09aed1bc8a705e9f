use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum NotificationKind {
    #[serde(rename = "info")]
    #[strum(serialize = "info")]
    Info,
    #[serde(rename = "success")]
    #[strum(serialize = "success")]
    Success,
    #[serde(rename = "alert")]
    #[strum(serialize = "alert")]
    Alert,
}

/// What an actionable notification points at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum RelatedKind {
    #[serde(rename = "LEAVE")]
    #[strum(serialize = "LEAVE")]
    Leave,
    #[serde(rename = "CLAIM")]
    #[strum(serialize = "CLAIM")]
    Claim,
}

/// An inbox entry for a single receiver. `related_id`/`related_kind` are set
/// when an admin can resolve the underlying item directly from the inbox.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_kind: Option<RelatedKind>,
}
