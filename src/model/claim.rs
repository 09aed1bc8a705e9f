use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveDuration, LeaveStatus};

/// A claim for replacement-leave credit earned by working on an off day.
/// Approval credits the owner's replacement balance by 1.0 (full day) or
/// 0.5 (half day).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReplacementClaim {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    pub duration: LeaveDuration,
    pub description: String,
    pub status: LeaveStatus,
    #[schema(value_type = String, format = "date-time")]
    pub applied_at: DateTime<Utc>,
}

impl ReplacementClaim {
    /// Credit earned on approval.
    pub fn credit(&self) -> f64 {
        if self.duration.is_half() { 0.5 } else { 1.0 }
    }
}
