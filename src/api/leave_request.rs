use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::model::leave_request::{LeaveDuration, LeaveRequest, LeaveStatus, LeaveType};
use crate::store::Store;
use crate::workflow::{self, Decision, EventBus};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    pub leave_type: LeaveType,
    pub duration: LeaveDuration,
    #[schema(example = "2026-01-12", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    /// Ignored for half-day applications, which cover the start date only.
    #[schema(example = "2026-01-14", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    pub attachment_url: Option<String>,
}

/// Prefilled outbound links so the applicant can notify management
/// immediately. Informational only, not an API contract.
#[derive(Serialize, ToSchema)]
pub struct NotifyLinks {
    pub wa1: String,
    pub wa2: String,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct ApplyLeaveResponse {
    pub id: String,
    pub status: LeaveStatus,
    pub message: String,
    pub notify: NotifyLinks,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Restrict to one employee (admin only; staff always see their own).
    pub user_id: Option<String>,
}

/// Minimal percent-encoding for the deep-link query payloads. None of the
/// stack's crates cover this and the links are informational, so unreserved
/// characters pass through and everything else is hex-escaped.
fn url_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn notify_links(leave: &LeaveRequest) -> NotifyLinks {
    let text = format!(
        "{} applied for {} from {} to {}. Reason: {}.",
        leave.user_name, leave.leave_type, leave.start_date, leave.end_date, leave.reason
    );
    let encoded = url_encode(&text);
    NotifyLinks {
        wa1: format!("https://wa.me/60126539881?text={encoded}"),
        wa2: format!("https://wa.me/60173309940?text={encoded}"),
        email: format!(
            "mailto:baogaliao.marketing@gmail.com?subject={}&body={}",
            url_encode(&format!("Leave Application - {}", leave.user_name)),
            encoded
        ),
    }
}

/// Submit a leave application.
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = ApplyLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = ApplyLeaveResponse),
        (status = 400, description = "Policy violation or invalid dates"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let end_date = payload.end_date.unwrap_or(payload.start_date);
    if payload.start_date > end_date {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let request = LeaveRequest {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        user_name: auth.full_name.clone(),
        leave_type: payload.leave_type,
        duration: payload.duration,
        start_date: payload.start_date,
        end_date,
        reason: payload.reason,
        attachment_url: payload.attachment_url,
        status: LeaveStatus::Pending,
        applied_at: Utc::now(),
    };

    let stored = workflow::submit_leave(&store, &bus, request)?;

    Ok(HttpResponse::Ok().json(ApplyLeaveResponse {
        id: stored.id.clone(),
        status: stored.status,
        message: "Leave request submitted".to_string(),
        notify: notify_links(&stored),
    }))
}

/// Leave requests, newest first. Staff see their own; admins see all or a
/// chosen employee's.
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave list", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let leaves = if auth.is_admin() {
        store.leaves(query.user_id.as_deref())
    } else {
        store.leaves(Some(auth.user_id.as_str()))
    };
    Ok(HttpResponse::Ok().json(leaves))
}

/// One leave request; owners and admins only.
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    match store.leave_by_id(&leave_id) {
        Some(leave) if auth.is_admin() || leave.user_id == auth.user_id => {
            Ok(HttpResponse::Ok().json(leave))
        }
        Some(_) => Err(actix_web::error::ErrorForbidden("Not your request")),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        }))),
    }
}

/// Approve a pending leave request (admin).
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 400, description = "Already processed"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    workflow::decide_leave(&store, &bus, &path.into_inner(), Decision::Approve)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave approved" })))
}

/// Reject a pending leave request (admin).
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(("leave_id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 400, description = "Already processed"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    workflow::decide_leave(&store, &bus, &path.into_inner(), Decision::Reject)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave rejected" })))
}
