//! Admin CSV exports. The period filter is a plain date prefix: `YYYY-MM`
//! selects a month, `YYYY` a whole year.

use serde::Deserialize;
use strum_macros::Display;
use utoipa::ToSchema;

use crate::store::Store;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Display, ToSchema)]
pub enum ReportKind {
    #[serde(rename = "attendance")]
    #[strum(serialize = "Attendance")]
    Attendance,
    #[serde(rename = "leaves")]
    #[strum(serialize = "Leaves")]
    Leaves,
}

/// Download name, e.g. `Jenco_Attendance_2026-01.csv`.
pub fn csv_filename(org: &str, kind: ReportKind, period: &str) -> String {
    format!("{org}_{kind}_{period}.csv")
}

/// Every cell is double-quoted; embedded quotes are doubled. The header row
/// is emitted as-is.
fn build_csv(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        let cells: Vec<String> = row
            .into_iter()
            .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Attendance report for the period, one row per record, filtered on the
/// record date.
pub fn attendance_csv(store: &Store, period: &str) -> String {
    let headers = ["Date", "Staff Name", "Check In", "Check Out", "Status", "Location"];
    let rows = store.read(|s| {
        s.attendance
            .iter()
            .filter(|a| a.date.to_string().starts_with(period))
            .map(|a| {
                let name = s
                    .users
                    .iter()
                    .find(|u| u.id == a.user_id)
                    .map(|u| u.full_name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                vec![
                    a.date.to_string(),
                    name,
                    a.check_in_time.format("%H:%M:%S").to_string(),
                    a.check_out_time
                        .map(|t| t.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    a.status.to_string(),
                    a.location.clone(),
                ]
            })
            .collect()
    });
    build_csv(&headers, rows)
}

/// Leave report for the period, filtered on the start date.
pub fn leaves_csv(store: &Store, period: &str) -> String {
    let headers = [
        "Staff Name",
        "Leave Type",
        "Start Date",
        "End Date",
        "Duration",
        "Status",
        "Reason",
        "Applied On",
    ];
    let rows = store.read(|s| {
        s.leaves
            .iter()
            .filter(|l| l.start_date.to_string().starts_with(period))
            .map(|l| {
                vec![
                    l.user_name.clone(),
                    l.leave_type.to_string(),
                    l.start_date.to_string(),
                    l.end_date.to_string(),
                    l.duration.to_string(),
                    l.status.to_string(),
                    l.reason.clone(),
                    l.applied_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect()
    });
    build_csv(&headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    use crate::model::attendance::{AttendanceRecord, AttendanceStatus, Coordinates};
    use crate::model::leave_request::{LeaveDuration, LeaveRequest, LeaveStatus, LeaveType};

    fn open_store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("hr.json")).unwrap();
        (dir, store)
    }

    fn attendance_record(date: NaiveDate, closed: bool) -> AttendanceRecord {
        let check_in = Utc
            .from_utc_datetime(&date.and_hms_opt(8, 30, 0).unwrap());
        AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            user_id: "staff-1".to_string(),
            date,
            check_in_time: check_in,
            check_out_time: closed.then(|| check_in + chrono::Duration::hours(9)),
            location: "Jalan Teknologi 5".to_string(),
            coordinates: Coordinates { lat: 3.0738, lng: 101.5183 },
            status: if closed { AttendanceStatus::Completed } else { AttendanceStatus::CheckedIn },
        }
    }

    fn leave_request(start: NaiveDate, reason: &str) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4().to_string(),
            user_id: "staff-1".to_string(),
            user_name: "Alex Tan".to_string(),
            leave_type: LeaveType::Annual,
            duration: LeaveDuration::Full,
            start_date: start,
            end_date: start,
            reason: reason.to_string(),
            attachment_url: None,
            status: LeaveStatus::Pending,
            applied_at: Utc.with_ymd_and_hms(2026, 1, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn filename_pattern() {
        assert_eq!(
            csv_filename("Jenco", ReportKind::Attendance, "2026-01"),
            "Jenco_Attendance_2026-01.csv"
        );
        assert_eq!(csv_filename("Jenco", ReportKind::Leaves, "2026"), "Jenco_Leaves_2026.csv");
    }

    #[test]
    fn attendance_rows_filtered_by_period_prefix() {
        let (_dir, store) = open_store();
        store
            .mutate(|s| {
                s.attendance.push(attendance_record(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), true));
                s.attendance.push(attendance_record(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(), false));
            })
            .unwrap();

        let monthly = attendance_csv(&store, "2026-01");
        assert_eq!(monthly.lines().count(), 2);
        assert!(monthly.contains("\"Alex Tan\""));
        assert!(monthly.contains("\"17:30:00\""));

        let yearly = attendance_csv(&store, "2026");
        assert_eq!(yearly.lines().count(), 3);
        // Open record renders a dash for check-out.
        assert!(yearly.contains("\"-\""));
        assert!(yearly.contains("\"Checked In\""));
    }

    #[test]
    fn unknown_user_renders_as_unknown() {
        let (_dir, store) = open_store();
        let mut record = attendance_record(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), true);
        record.user_id = "ghost".to_string();
        store.mutate(|s| s.attendance.push(record)).unwrap();

        assert!(attendance_csv(&store, "2026").contains("\"Unknown\""));
    }

    #[test]
    fn leave_rows_escape_embedded_quotes() {
        let (_dir, store) = open_store();
        let request = leave_request(
            NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            "attending \"family day\"",
        );
        store.append_leave(request).unwrap();

        let csv = leaves_csv(&store, "2026-01");
        assert!(csv.starts_with("Staff Name,Leave Type,"));
        assert!(csv.contains("\"attending \"\"family day\"\"\""));
        assert!(csv.contains("\"Annual Leave\""));
        assert!(csv.contains("\"2026-01-02\""));
    }

    #[test]
    fn period_mismatch_yields_header_only() {
        let (_dir, store) = open_store();
        store
            .append_leave(leave_request(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(), "x"))
            .unwrap();

        let csv = leaves_csv(&store, "2025");
        assert_eq!(csv.lines().count(), 1);
    }
}
