//! Approval state machine for leave requests and replacement claims, the
//! application-time policy checks, and the domain event bus the rest of the
//! system subscribes to.

use std::sync::RwLock;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, Coordinates};
use crate::model::claim::ReplacementClaim;
use crate::model::leave_request::{LeaveDuration, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::{AdjustmentKind, AdjustmentLog, User};
use crate::store::{Store, StoreError};

/// Minimum lead time for planned leave types, in calendar days.
const ADVANCE_NOTICE_DAYS: i64 = 7;
/// Cap on weekdays covered by a single full-day application.
const MAX_WORKING_DAYS: u32 = 5;
/// A workday shorter than this checks out as incomplete.
const FULL_DAY_HOURS: i64 = 9;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("a medical certificate attachment is required for {leave_type}")]
    MissingAttachment { leave_type: LeaveType },
    #[error("Birthday Leave is only applicable for half day")]
    BirthdayFullDay,
    #[error("{leave_type} must be applied at least 7 days in advance")]
    ShortNotice { leave_type: LeaveType },
    #[error("a single application covers at most 5 working days, got {days}")]
    WorkingDayCapExceeded { days: u32 },
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("request {id} was already {status}")]
    AlreadyDecided { id: String, status: LeaveStatus },
    #[error("already checked in today")]
    AlreadyCheckedIn,
    #[error("no active check-in found for today")]
    NoOpenCheckIn,
    #[error("check-in coordinates must be finite numbers")]
    InvalidCoordinates,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
            WorkflowError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let WorkflowError::Store(e) = self {
            tracing::error!(error = %e, "Store operation failed");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Published after every workflow transition. The notification dispatcher
/// subscribes at startup; additional consumers can subscribe without the
/// engine knowing about them.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    LeaveApplied(LeaveRequest),
    LeaveDecided(LeaveRequest),
    ClaimSubmitted(ReplacementClaim),
    ClaimDecided(ReplacementClaim),
    BalanceAdjusted {
        user_id: String,
        admin_name: String,
        kind: AdjustmentKind,
        amount: f64,
    },
}

type Subscriber = Box<dyn Fn(&DomainEvent) + Send + Sync>;

/// Synchronous in-process publish/subscribe fan-out. Subscribers run on the
/// publishing thread before the triggering request completes.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn subscribe(&self, subscriber: impl Fn(&DomainEvent) + Send + Sync + 'static) {
        self.subscribers
            .write()
            .expect("event bus lock poisoned")
            .push(Box::new(subscriber));
    }

    pub fn publish(&self, event: &DomainEvent) {
        for subscriber in self.subscribers.read().expect("event bus lock poisoned").iter() {
            subscriber(event);
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

/// Weekdays (Mon-Fri) between two dates inclusive. Weekend-only ranges
/// collapse to zero, so a 7-day window spanning one weekend still fits the
/// 5-working-day cap.
pub fn weekday_count(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Application-time policy checks. All checks are independent and all must
/// pass before the request is persisted.
pub fn validate_application(leave: &LeaveRequest, today: NaiveDate) -> WorkflowResult<()> {
    if leave.leave_type.needs_attachment() && leave.attachment_url.is_none() {
        return Err(WorkflowError::MissingAttachment {
            leave_type: leave.leave_type,
        });
    }

    if leave.leave_type == LeaveType::Birthday && leave.duration == LeaveDuration::Full {
        return Err(WorkflowError::BirthdayFullDay);
    }

    if !leave.leave_type.is_unplanned()
        && (leave.start_date - today).num_days() < ADVANCE_NOTICE_DAYS
    {
        return Err(WorkflowError::ShortNotice {
            leave_type: leave.leave_type,
        });
    }

    if leave.duration == LeaveDuration::Full {
        let days = weekday_count(leave.start_date, leave.end_date);
        if days > MAX_WORKING_DAYS {
            return Err(WorkflowError::WorkingDayCapExceeded { days });
        }
    }

    Ok(())
}

/// Validates and persists a new leave request, then notifies subscribers.
/// Half-day requests cover the start date only.
pub fn submit_leave(store: &Store, bus: &EventBus, mut leave: LeaveRequest) -> WorkflowResult<LeaveRequest> {
    if leave.duration.is_half() {
        leave.end_date = leave.start_date;
    }
    validate_application(&leave, Utc::now().date_naive())?;

    store.append_leave(leave.clone())?;
    bus.publish(&DomainEvent::LeaveApplied(leave.clone()));
    Ok(leave)
}

/// Moves a pending leave request to its terminal status. Requests already
/// decided stay as they are.
pub fn decide_leave(store: &Store, bus: &EventBus, leave_id: &str, decision: Decision) -> WorkflowResult<LeaveRequest> {
    let updated = store.mutate(|s| {
        let leave = s
            .leaves
            .iter_mut()
            .find(|l| l.id == leave_id)
            .ok_or_else(|| WorkflowError::NotFound {
                kind: "leave request",
                id: leave_id.to_string(),
            })?;
        if leave.status != LeaveStatus::Pending {
            return Err(WorkflowError::AlreadyDecided {
                id: leave_id.to_string(),
                status: leave.status,
            });
        }
        leave.status = decision.status();
        Ok(leave.clone())
    })??;

    bus.publish(&DomainEvent::LeaveDecided(updated.clone()));
    Ok(updated)
}

/// Persists a new replacement-credit claim and notifies subscribers.
pub fn submit_claim(store: &Store, bus: &EventBus, claim: ReplacementClaim) -> WorkflowResult<ReplacementClaim> {
    store.append_claim(claim.clone())?;
    bus.publish(&DomainEvent::ClaimSubmitted(claim.clone()));
    Ok(claim)
}

/// Moves a pending claim to its terminal status. Approval credits the
/// owner's replacement balance in the same store transaction as the status
/// write; the prior-status guard makes re-approval unable to double-credit.
pub fn decide_claim(store: &Store, bus: &EventBus, claim_id: &str, decision: Decision) -> WorkflowResult<ReplacementClaim> {
    let updated = store.mutate(|s| {
        let claim = s
            .claims
            .iter_mut()
            .find(|c| c.id == claim_id)
            .ok_or_else(|| WorkflowError::NotFound {
                kind: "claim",
                id: claim_id.to_string(),
            })?;
        if claim.status != LeaveStatus::Pending {
            return Err(WorkflowError::AlreadyDecided {
                id: claim_id.to_string(),
                status: claim.status,
            });
        }
        let prior = claim.status;
        claim.status = decision.status();
        let claim = claim.clone();

        if decision == Decision::Approve && prior != LeaveStatus::Approved {
            match s.users.iter_mut().find(|u| u.id == claim.user_id) {
                Some(user) => {
                    user.leave_adjustments.replacement_leave_balance += claim.credit();
                }
                None => {
                    warn!(claim_id, user_id = %claim.user_id, "Claim owner missing, credit skipped");
                }
            }
        }
        Ok(claim)
    })??;

    bus.publish(&DomainEvent::ClaimDecided(updated.clone()));
    Ok(updated)
}

/// Admin balance adjustment: applies the signed amount and prepends an
/// audit log entry in one transaction. Amount and reason are validated at
/// the API boundary.
pub fn adjust_balance(
    store: &Store,
    bus: &EventBus,
    admin_name: &str,
    user_id: &str,
    kind: AdjustmentKind,
    amount: f64,
    reason: &str,
) -> WorkflowResult<User> {
    let updated = store.mutate(|s| {
        let user = s
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| WorkflowError::NotFound {
                kind: "user",
                id: user_id.to_string(),
            })?;

        match kind {
            AdjustmentKind::AnnualLeave => user.leave_adjustments.annual_leave_adjustment += amount,
            AdjustmentKind::ReplacementCredit => {
                user.leave_adjustments.replacement_leave_balance += amount
            }
        }
        user.adjustment_logs.insert(
            0,
            AdjustmentLog {
                id: Uuid::new_v4().to_string(),
                date: Utc::now(),
                admin_name: admin_name.to_string(),
                kind,
                amount,
                reason: reason.to_string(),
            },
        );
        Ok::<_, WorkflowError>(user.clone())
    })??;

    bus.publish(&DomainEvent::BalanceAdjusted {
        user_id: user_id.to_string(),
        admin_name: admin_name.to_string(),
        kind,
        amount,
    });
    Ok(updated)
}

/// Final status for a completed attendance record.
pub fn checkout_status(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> AttendanceStatus {
    if check_out - check_in >= chrono::Duration::hours(FULL_DAY_HOURS) {
        AttendanceStatus::Completed
    } else {
        AttendanceStatus::IncompleteHours
    }
}

/// Creates today's attendance record. At most one record exists per user
/// and calendar date.
pub fn check_in(store: &Store, user_id: &str, location: &str, coordinates: Coordinates) -> WorkflowResult<AttendanceRecord> {
    if !coordinates.lat.is_finite() || !coordinates.lng.is_finite() {
        return Err(WorkflowError::InvalidCoordinates);
    }

    let now = Utc::now();
    let today = now.date_naive();
    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        date: today,
        check_in_time: now,
        check_out_time: None,
        location: location.to_string(),
        coordinates,
        status: AttendanceStatus::CheckedIn,
    };

    // Uniqueness check and insert share one write lock, so two concurrent
    // check-ins cannot both pass the check.
    store.mutate(|s| {
        if s.attendance.iter().any(|a| a.user_id == user_id && a.date == today) {
            return Err(WorkflowError::AlreadyCheckedIn);
        }
        s.attendance.push(record.clone());
        Ok(record.clone())
    })?
}

/// Closes today's open attendance record, deriving the final status from
/// the elapsed hours.
pub fn check_out(store: &Store, user_id: &str) -> WorkflowResult<AttendanceRecord> {
    let now = Utc::now();
    let today = now.date_naive();

    store.mutate(|s| {
        let record = s
            .attendance
            .iter_mut()
            .find(|a| a.user_id == user_id && a.date == today && a.check_out_time.is_none())
            .ok_or(WorkflowError::NoOpenCheckIn)?;
        record.check_out_time = Some(now);
        record.status = checkout_status(record.check_in_time, now);
        Ok(record.clone())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("hr.json")).unwrap();
        (dir, store)
    }

    fn leave(leave_type: LeaveType, duration: LeaveDuration, start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4().to_string(),
            user_id: "staff-1".to_string(),
            user_name: "Alex Tan".to_string(),
            leave_type,
            duration,
            start_date: start,
            end_date: end,
            reason: "test".to_string(),
            attachment_url: None,
            status: LeaveStatus::Pending,
            applied_at: Utc::now(),
        }
    }

    fn claim(duration: LeaveDuration) -> ReplacementClaim {
        ReplacementClaim {
            id: Uuid::new_v4().to_string(),
            user_id: "staff-1".to_string(),
            user_name: "Alex Tan".to_string(),
            work_date: date(2026, 1, 3),
            duration,
            description: "worked Saturday".to_string(),
            status: LeaveStatus::Pending,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn weekday_count_spans() {
        // Mon-Fri.
        assert_eq!(weekday_count(date(2024, 1, 1), date(2024, 1, 5)), 5);
        // Sat-Sun collapses to zero.
        assert_eq!(weekday_count(date(2024, 1, 6), date(2024, 1, 7)), 0);
        // A 7-day window spanning one weekend still counts 5 weekdays.
        assert_eq!(weekday_count(date(2024, 1, 5), date(2024, 1, 11)), 5);
        assert_eq!(weekday_count(date(2024, 1, 5), date(2024, 1, 4)), 0);
    }

    #[test]
    fn sick_leave_requires_attachment() {
        let today = date(2026, 1, 1);
        let mut request = leave(LeaveType::Sick, LeaveDuration::Full, today, today);
        assert!(matches!(
            validate_application(&request, today),
            Err(WorkflowError::MissingAttachment { .. })
        ));

        // With an attachment it passes regardless of advance notice.
        request.attachment_url = Some("mc.jpg".to_string());
        assert!(validate_application(&request, today).is_ok());
    }

    #[test]
    fn birthday_leave_is_half_day_only() {
        let today = date(2026, 1, 1);
        let start = date(2026, 1, 20);
        let request = leave(LeaveType::Birthday, LeaveDuration::Full, start, start);
        assert!(matches!(
            validate_application(&request, today),
            Err(WorkflowError::BirthdayFullDay)
        ));

        let request = leave(LeaveType::Birthday, LeaveDuration::HalfAm, start, start);
        assert!(validate_application(&request, today).is_ok());
    }

    #[test]
    fn planned_leave_needs_seven_days_notice() {
        let today = date(2026, 1, 1);
        let short = leave(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 4), date(2026, 1, 4));
        assert!(matches!(
            validate_application(&short, today),
            Err(WorkflowError::ShortNotice { .. })
        ));

        // Exactly seven days out is accepted.
        let exact = leave(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 8), date(2026, 1, 8));
        assert!(validate_application(&exact, today).is_ok());

        // Emergency leave is exempt.
        let emergency = leave(LeaveType::Emergency, LeaveDuration::Full, date(2026, 1, 2), date(2026, 1, 2));
        assert!(validate_application(&emergency, today).is_ok());
    }

    #[test]
    fn working_day_cap_allows_weekend_spanning_week() {
        let today = date(2026, 1, 1);
        // Fri 2026-01-09 .. Thu 2026-01-15: 7 calendar days, 5 weekdays.
        let ok = leave(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 9), date(2026, 1, 15));
        assert!(validate_application(&ok, today).is_ok());

        // Mon .. Mon next week: 6 weekdays.
        let too_long = leave(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 12), date(2026, 1, 19));
        assert!(matches!(
            validate_application(&too_long, today),
            Err(WorkflowError::WorkingDayCapExceeded { days: 6 })
        ));
    }

    #[test]
    fn half_day_submission_collapses_end_date() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let start = Utc::now().date_naive() + chrono::Duration::days(10);
        let request = leave(LeaveType::Annual, LeaveDuration::HalfPm, start, start + chrono::Duration::days(3));

        let stored = submit_leave(&store, &bus, request).unwrap();
        assert_eq!(stored.end_date, stored.start_date);
    }

    #[test]
    fn leave_decision_is_terminal() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let start = Utc::now().date_naive() + chrono::Duration::days(10);
        let request = submit_leave(
            &store,
            &bus,
            leave(LeaveType::Annual, LeaveDuration::Full, start, start),
        )
        .unwrap();

        let decided = decide_leave(&store, &bus, &request.id, Decision::Approve).unwrap();
        assert_eq!(decided.status, LeaveStatus::Approved);

        assert!(matches!(
            decide_leave(&store, &bus, &request.id, Decision::Reject),
            Err(WorkflowError::AlreadyDecided { .. })
        ));
        assert_eq!(store.leave_by_id(&request.id).unwrap().status, LeaveStatus::Approved);
    }

    #[test]
    fn approving_claim_credits_balance_once() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let submitted = submit_claim(&store, &bus, claim(LeaveDuration::Full)).unwrap();

        decide_claim(&store, &bus, &submitted.id, Decision::Approve).unwrap();
        let balance = store.user_by_id("staff-1").unwrap().leave_adjustments.replacement_leave_balance;
        assert_eq!(balance, 1.0);

        // Re-approval is rejected and must not credit again.
        assert!(decide_claim(&store, &bus, &submitted.id, Decision::Approve).is_err());
        let balance = store.user_by_id("staff-1").unwrap().leave_adjustments.replacement_leave_balance;
        assert_eq!(balance, 1.0);
    }

    #[test]
    fn half_day_claim_credits_half() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let submitted = submit_claim(&store, &bus, claim(LeaveDuration::HalfAm)).unwrap();
        decide_claim(&store, &bus, &submitted.id, Decision::Approve).unwrap();

        let balance = store.user_by_id("staff-1").unwrap().leave_adjustments.replacement_leave_balance;
        assert_eq!(balance, 0.5);
    }

    #[test]
    fn rejected_claim_does_not_credit() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let submitted = submit_claim(&store, &bus, claim(LeaveDuration::Full)).unwrap();
        decide_claim(&store, &bus, &submitted.id, Decision::Reject).unwrap();

        let balance = store.user_by_id("staff-1").unwrap().leave_adjustments.replacement_leave_balance;
        assert_eq!(balance, 0.0);
    }

    #[test]
    fn adjustment_prepends_audit_log() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();

        adjust_balance(&store, &bus, "Jenco Director", "staff-1", AdjustmentKind::AnnualLeave, 2.0, "loyalty bonus").unwrap();
        let user = adjust_balance(&store, &bus, "Jenco Director", "staff-1", AdjustmentKind::ReplacementCredit, -0.5, "correction").unwrap();

        assert_eq!(user.leave_adjustments.annual_leave_adjustment, 2.0);
        assert_eq!(user.leave_adjustments.replacement_leave_balance, -0.5);
        assert_eq!(user.adjustment_logs.len(), 2);
        // Newest first.
        assert_eq!(user.adjustment_logs[0].kind, AdjustmentKind::ReplacementCredit);
        assert_eq!(user.adjustment_logs[0].amount, -0.5);
    }

    #[test]
    fn adjusting_unknown_user_is_not_found() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        assert!(matches!(
            adjust_balance(&store, &bus, "Jenco Director", "ghost", AdjustmentKind::AnnualLeave, 1.0, "x"),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn checkout_status_nine_hour_boundary() {
        let start = Utc::now();
        assert_eq!(
            checkout_status(start, start + chrono::Duration::hours(9)),
            AttendanceStatus::Completed
        );
        assert_eq!(
            checkout_status(start, start + chrono::Duration::hours(9) - chrono::Duration::seconds(1)),
            AttendanceStatus::IncompleteHours
        );
    }

    #[test]
    fn one_check_in_per_day() {
        let (_dir, store) = open_store();
        let coords = Coordinates { lat: 3.0738, lng: 101.5183 };

        check_in(&store, "staff-1", "Jalan Teknologi 5", coords).unwrap();
        assert!(matches!(
            check_in(&store, "staff-1", "Jalan Teknologi 5", coords),
            Err(WorkflowError::AlreadyCheckedIn)
        ));
    }

    #[test]
    fn concurrent_check_ins_record_once() {
        let (_dir, store) = open_store();
        let store = Arc::new(store);
        let barrier = Arc::new(std::sync::Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    let coords = Coordinates { lat: 3.0738, lng: 101.5183 };
                    check_in(&store, "staff-1", "Jalan Teknologi 5", coords).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.attendance(Some("staff-1")).len(), 1);
    }

    #[test]
    fn check_out_without_check_in_fails() {
        let (_dir, store) = open_store();
        assert!(matches!(
            check_out(&store, "staff-1"),
            Err(WorkflowError::NoOpenCheckIn)
        ));
    }

    #[test]
    fn same_day_check_out_is_incomplete() {
        let (_dir, store) = open_store();
        let coords = Coordinates { lat: 3.0738, lng: 101.5183 };
        check_in(&store, "staff-1", "Jalan Teknologi 5", coords).unwrap();

        let record = check_out(&store, "staff-1").unwrap();
        assert_eq!(record.status, AttendanceStatus::IncompleteHours);
        assert!(record.check_out_time.is_some());

        // The record is closed; a second check-out has nothing to act on.
        assert!(check_out(&store, "staff-1").is_err());
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        let (_dir, store) = open_store();
        let coords = Coordinates { lat: f64::NAN, lng: 101.5183 };
        assert!(matches!(
            check_in(&store, "staff-1", "nowhere", coords),
            Err(WorkflowError::InvalidCoordinates)
        ));
    }

    #[test]
    fn transitions_publish_domain_events() {
        let (_dir, store) = open_store();
        let bus = EventBus::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(move |event| {
            let name = match event {
                DomainEvent::LeaveApplied(_) => "leave_applied",
                DomainEvent::LeaveDecided(_) => "leave_decided",
                DomainEvent::ClaimSubmitted(_) => "claim_submitted",
                DomainEvent::ClaimDecided(_) => "claim_decided",
                DomainEvent::BalanceAdjusted { .. } => "balance_adjusted",
            };
            sink.lock().unwrap().push(name);
        });

        let start = Utc::now().date_naive() + chrono::Duration::days(10);
        let request = submit_leave(
            &store,
            &bus,
            leave(LeaveType::Annual, LeaveDuration::Full, start, start),
        )
        .unwrap();
        decide_leave(&store, &bus, &request.id, Decision::Reject).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["leave_applied", "leave_decided"]);
    }
}
