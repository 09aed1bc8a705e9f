use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum AttendanceStatus {
    #[serde(rename = "Checked In")]
    #[strum(serialize = "Checked In")]
    CheckedIn,
    #[serde(rename = "Completed")]
    #[strum(serialize = "Completed")]
    Completed,
    #[serde(rename = "Incomplete Hours")]
    #[strum(serialize = "Incomplete Hours")]
    IncompleteHours,
}

/// One record per user per calendar date. Created on check-in, mutated once
/// on check-out when the final status is derived from the elapsed hours.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub location: String,
    pub coordinates: Coordinates,
    pub status: AttendanceStatus,
}
