use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Signed balance corrections an admin can apply on top of the policy
/// tiers. Old data files may predate these fields, so both default to zero
/// at deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LeaveAdjustments {
    #[serde(default)]
    pub annual_leave_adjustment: f64,
    #[serde(default)]
    pub replacement_leave_balance: f64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum AdjustmentKind {
    #[serde(rename = "Annual Leave")]
    #[strum(serialize = "Annual Leave")]
    AnnualLeave,
    #[serde(rename = "Replacement Credit")]
    #[strum(serialize = "Replacement Credit")]
    ReplacementCredit,
}

/// Audit entry for a manual balance change, newest first on the owning user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustmentLog {
    pub id: String,
    #[schema(value_type = String, format = "date-time")]
    pub date: DateTime<Utc>,
    pub admin_name: String,
    pub kind: AdjustmentKind,
    pub amount: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub position: String,
    #[schema(example = "2022-05-15", format = "date", value_type = String)]
    pub joining_date: NaiveDate,
    pub role: Role,
    #[serde(default)]
    pub leave_adjustments: LeaveAdjustments,
    #[serde(default)]
    pub adjustment_logs: Vec<AdjustmentLog>,
}
