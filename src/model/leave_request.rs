use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveType {
    #[serde(rename = "Annual Leave")]
    #[strum(serialize = "Annual Leave")]
    Annual,
    #[serde(rename = "Sick Leave")]
    #[strum(serialize = "Sick Leave")]
    Sick,
    #[serde(rename = "Hospitalization Leave")]
    #[strum(serialize = "Hospitalization Leave")]
    Hospitalization,
    #[serde(rename = "Emergency Leave")]
    #[strum(serialize = "Emergency Leave")]
    Emergency,
    #[serde(rename = "No Pay Leave")]
    #[strum(serialize = "No Pay Leave")]
    NoPay,
    #[serde(rename = "Replacement Leave")]
    #[strum(serialize = "Replacement Leave")]
    Replacement,
    #[serde(rename = "Birthday Leave")]
    #[strum(serialize = "Birthday Leave")]
    Birthday,
}

impl LeaveType {
    /// Sick, hospitalization and emergency leave cannot be planned ahead,
    /// so the advance-notice rule does not apply to them.
    pub fn is_unplanned(self) -> bool {
        matches!(
            self,
            LeaveType::Sick | LeaveType::Hospitalization | LeaveType::Emergency
        )
    }

    /// Leave types that require a medical certificate attachment.
    pub fn needs_attachment(self) -> bool {
        matches!(self, LeaveType::Sick | LeaveType::Hospitalization)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveDuration {
    #[serde(rename = "Full Day")]
    #[strum(serialize = "Full Day")]
    Full,
    #[serde(rename = "Half Day (AM)")]
    #[strum(serialize = "Half Day (AM)")]
    HalfAm,
    #[serde(rename = "Half Day (PM)")]
    #[strum(serialize = "Half Day (PM)")]
    HalfPm,
}

impl LeaveDuration {
    pub fn is_half(self) -> bool {
        self != LeaveDuration::Full
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveStatus {
    #[serde(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    Pending,
    #[serde(rename = "APPROVED")]
    #[strum(serialize = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    #[strum(serialize = "REJECTED")]
    Rejected,
}

/// A staff leave application. Immutable once submitted except for `status`,
/// which moves Pending -> Approved/Rejected exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub leave_type: LeaveType,
    pub duration: LeaveDuration,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    pub status: LeaveStatus,
    #[schema(value_type = String, format = "date-time")]
    pub applied_at: DateTime<Utc>,
}
