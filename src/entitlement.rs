//! Leave entitlement derivation: tenure tiers plus manual adjustments on
//! the total side, approved-request accumulation on the used side.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::User;

/// Computed allowance vs. used amount per leave category for the current
/// cycle. Callers derive remaining as `total - used`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Entitlement {
    pub annual_total: f64,
    pub sick_total: f64,
    pub hospitalization_total: f64,
    pub replacement_total: f64,
    pub birthday_total: f64,
    pub annual_used: f64,
    pub sick_used: f64,
    pub hospitalization_used: f64,
    pub replacement_used: f64,
    pub birthday_used: f64,
    pub carried_forward: f64,
}

/// Whole years of service, decremented by one when today's (month, day)
/// still precedes the joining anniversary.
pub fn years_of_service(joining: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - joining.year();
    if (today.month(), today.day()) < (joining.month(), joining.day()) {
        years -= 1;
    }
    years
}

/// Base annual-leave allotment for a given tenure.
pub fn annual_allotment(years: i32) -> f64 {
    match years {
        i32::MIN..=2 => 12.0,
        3..=4 => 14.0,
        5..=9 => 16.0,
        _ => 18.0,
    }
}

/// Sick-leave allotment uses its own tier table.
pub fn sick_allotment(years: i32) -> f64 {
    match years {
        i32::MIN..=1 => 14.0,
        2..=4 => 18.0,
        _ => 22.0,
    }
}

/// Inclusive calendar-day count between two dates, weekends included.
///
/// Deliberately distinct from [`crate::workflow::weekday_count`], which the
/// application validator uses: entitlement usage debits weekends, the 5-day
/// application cap does not. Flagged for product clarification; do not
/// unify without a policy decision.
pub fn inclusive_calendar_days(start: NaiveDate, end: NaiveDate) -> f64 {
    ((end - start).num_days().abs() + 1) as f64
}

/// Days a single approved request debits from its category.
fn used_days(leave: &LeaveRequest) -> f64 {
    if leave.duration.is_half() {
        0.5
    } else {
        inclusive_calendar_days(leave.start_date, leave.end_date)
    }
}

/// Derives a user's entitlement from tenure, manual adjustments and their
/// leave history as of `today`. Only approved requests count as used.
pub fn calculate(user: &User, leaves: &[LeaveRequest], today: NaiveDate) -> Entitlement {
    let years = years_of_service(user.joining_date, today);
    let adjustments = &user.leave_adjustments;

    let used_of = |leave_type: LeaveType| -> f64 {
        leaves
            .iter()
            .filter(|l| l.status == LeaveStatus::Approved && l.leave_type == leave_type)
            .map(used_days)
            .sum()
    };

    Entitlement {
        annual_total: annual_allotment(years) + adjustments.annual_leave_adjustment,
        sick_total: sick_allotment(years),
        hospitalization_total: 60.0,
        replacement_total: adjustments.replacement_leave_balance,
        birthday_total: 0.5,
        annual_used: used_of(LeaveType::Annual),
        sick_used: used_of(LeaveType::Sick),
        hospitalization_used: used_of(LeaveType::Hospitalization),
        replacement_used: used_of(LeaveType::Replacement),
        birthday_used: used_of(LeaveType::Birthday),
        carried_forward: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::model::leave_request::LeaveDuration;
    use crate::model::role::Role;
    use crate::model::user::LeaveAdjustments;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user_joined(joining: NaiveDate) -> User {
        User {
            id: "staff-1".to_string(),
            username: "alex".to_string(),
            password: "password".to_string(),
            full_name: "Alex Tan".to_string(),
            position: "Marketing Exec".to_string(),
            joining_date: joining,
            role: Role::Staff,
            leave_adjustments: LeaveAdjustments::default(),
            adjustment_logs: Vec::new(),
        }
    }

    fn approved(leave_type: LeaveType, duration: LeaveDuration, start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            id: "leave-1".to_string(),
            user_id: "staff-1".to_string(),
            user_name: "Alex Tan".to_string(),
            leave_type,
            duration,
            start_date: start,
            end_date: end,
            reason: String::new(),
            attachment_url: None,
            status: LeaveStatus::Approved,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn years_of_service_respects_anniversary() {
        let today = date(2026, 5, 15);
        assert_eq!(years_of_service(date(2022, 5, 15), today), 4);
        assert_eq!(years_of_service(date(2022, 5, 16), today), 3);
        assert_eq!(years_of_service(date(2026, 1, 1), today), 0);
    }

    #[test]
    fn annual_tier_boundaries() {
        assert_eq!(annual_allotment(0), 12.0);
        assert_eq!(annual_allotment(2), 12.0);
        assert_eq!(annual_allotment(3), 14.0);
        assert_eq!(annual_allotment(4), 14.0);
        assert_eq!(annual_allotment(5), 16.0);
        assert_eq!(annual_allotment(9), 16.0);
        assert_eq!(annual_allotment(10), 18.0);
    }

    #[test]
    fn sick_tier_boundaries() {
        assert_eq!(sick_allotment(1), 14.0);
        assert_eq!(sick_allotment(2), 18.0);
        assert_eq!(sick_allotment(4), 18.0);
        assert_eq!(sick_allotment(5), 22.0);
    }

    #[test]
    fn joining_exactly_three_years_ago_crosses_the_tier() {
        let today = date(2026, 3, 1);
        let on_boundary = user_joined(date(2023, 3, 1));
        let one_day_short = user_joined(date(2023, 3, 2));

        assert_eq!(calculate(&on_boundary, &[], today).annual_total, 14.0);
        assert_eq!(calculate(&one_day_short, &[], today).annual_total, 12.0);
    }

    #[test]
    fn manual_adjustment_shifts_annual_total() {
        let today = date(2026, 3, 1);
        let mut user = user_joined(date(2025, 1, 1));
        user.leave_adjustments.annual_leave_adjustment = -2.0;
        assert_eq!(calculate(&user, &[], today).annual_total, 10.0);
    }

    #[test]
    fn inclusive_days_count_weekends() {
        // Fri..Mon spans a weekend: four calendar days.
        assert_eq!(inclusive_calendar_days(date(2024, 1, 5), date(2024, 1, 8)), 4.0);
        assert_eq!(inclusive_calendar_days(date(2024, 1, 5), date(2024, 1, 5)), 1.0);
    }

    #[test]
    fn used_accumulates_full_and_half_days() {
        let today = date(2026, 6, 1);
        let user = user_joined(date(2025, 1, 1));
        let leaves = vec![
            approved(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 5), date(2026, 1, 8)),
            approved(LeaveType::Annual, LeaveDuration::HalfAm, date(2026, 2, 2), date(2026, 2, 2)),
            approved(LeaveType::Sick, LeaveDuration::Full, date(2026, 3, 2), date(2026, 3, 2)),
        ];

        let ent = calculate(&user, &leaves, today);
        assert_eq!(ent.annual_used, 4.5);
        assert_eq!(ent.sick_used, 1.0);
        assert_eq!(ent.hospitalization_used, 0.0);
    }

    #[test]
    fn pending_and_rejected_requests_do_not_debit() {
        let today = date(2026, 6, 1);
        let user = user_joined(date(2025, 1, 1));
        let mut pending = approved(LeaveType::Annual, LeaveDuration::Full, date(2026, 1, 5), date(2026, 1, 5));
        pending.status = LeaveStatus::Pending;
        let mut rejected = pending.clone();
        rejected.status = LeaveStatus::Rejected;

        let ent = calculate(&user, &[pending, rejected], today);
        assert_eq!(ent.annual_used, 0.0);
    }

    #[test]
    fn replacement_total_tracks_live_balance() {
        let today = date(2026, 6, 1);
        let mut user = user_joined(date(2025, 1, 1));
        user.leave_adjustments.replacement_leave_balance = 1.5;

        let ent = calculate(&user, &[], today);
        assert_eq!(ent.replacement_total, 1.5);
        assert_eq!(ent.birthday_total, 0.5);
        assert_eq!(ent.hospitalization_total, 60.0);
    }
}
