use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceRecord, Coordinates};
use crate::store::Store;
use crate::workflow;

/// Geolocation is acquired on the client; the server only records the
/// resolved address and raw coordinates.
#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = "Jalan Teknologi 5, Taman Sains Selangor")]
    pub location: String,
    #[schema(example = 3.0738)]
    pub lat: f64,
    #[schema(example = 101.5183)]
    pub lng: f64,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceFilter {
    pub user_id: Option<String>,
}

/// Check-in endpoint. One record per user per calendar date.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceRecord),
        (status = 400, description = "Already checked in today or bad coordinates"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CheckInReq>,
) -> actix_web::Result<impl Responder> {
    let coords = Coordinates {
        lat: payload.lat,
        lng: payload.lng,
    };
    let record = workflow::check_in(&store, &auth.user_id, &payload.location, coords)?;
    Ok(HttpResponse::Ok().json(record))
}

/// Check-out endpoint. Closes today's open record; the final status is
/// derived from the elapsed hours.
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 400, description = "No active check-in found for today"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    let record = workflow::check_out(&store, &auth.user_id)?;
    Ok(HttpResponse::Ok().json(record))
}

/// Attendance history, newest check-in first. Staff see their own; admins
/// see all or a chosen employee's.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let records = if auth.is_admin() {
        store.attendance(query.user_id.as_deref())
    } else {
        store.attendance(Some(auth.user_id.as_str()))
    };
    Ok(HttpResponse::Ok().json(records))
}

/// Today's record for the caller, if any. Lets the client restore the
/// checked-in state after a reload.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's record or null"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_today(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    let today = chrono::Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(json!({
        "record": store.attendance_on(&auth.user_id, today)
    })))
}
