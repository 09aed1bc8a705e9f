use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::model::claim::ReplacementClaim;
use crate::model::leave_request::{LeaveDuration, LeaveStatus};
use crate::store::Store;
use crate::workflow::{self, Decision, EventBus};

#[derive(Deserialize, ToSchema)]
pub struct SubmitClaim {
    /// The off day that was worked.
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    pub duration: LeaveDuration,
    pub description: String,
}

#[derive(Deserialize, IntoParams)]
pub struct ClaimFilter {
    pub user_id: Option<String>,
}

/// Submit a replacement-credit claim.
#[utoipa::path(
    post,
    path = "/api/v1/claims",
    request_body = SubmitClaim,
    responses(
        (status = 200, description = "Claim submitted"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Claim"
)]
pub async fn create_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    payload: web::Json<SubmitClaim>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let claim = ReplacementClaim {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        user_name: auth.full_name.clone(),
        work_date: payload.work_date,
        duration: payload.duration,
        description: payload.description,
        status: LeaveStatus::Pending,
        applied_at: Utc::now(),
    };

    let stored = workflow::submit_claim(&store, &bus, claim)?;

    Ok(HttpResponse::Ok().json(json!({
        "id": stored.id,
        "message": "Claim submitted",
        "status": stored.status
    })))
}

/// Claims, newest first. Staff see their own; admins see all or a chosen
/// employee's.
#[utoipa::path(
    get,
    path = "/api/v1/claims",
    params(ClaimFilter),
    responses(
        (status = 200, description = "Claim list", body = [ReplacementClaim]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Claim"
)]
pub async fn claim_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<ClaimFilter>,
) -> actix_web::Result<impl Responder> {
    let claims = if auth.is_admin() {
        store.claims(query.user_id.as_deref())
    } else {
        store.claims(Some(auth.user_id.as_str()))
    };
    Ok(HttpResponse::Ok().json(claims))
}

/// Approve a pending claim (admin). Credits the owner's replacement
/// balance together with the status change.
#[utoipa::path(
    put,
    path = "/api/v1/claims/{claim_id}/approve",
    params(("claim_id" = String, Path, description = "Claim id")),
    responses(
        (status = 200, description = "Claim approved"),
        (status = 400, description = "Already processed"),
        (status = 404, description = "Claim not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Claim"
)]
pub async fn approve_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    workflow::decide_claim(&store, &bus, &path.into_inner(), Decision::Approve)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Claim approved" })))
}

/// Reject a pending claim (admin).
#[utoipa::path(
    put,
    path = "/api/v1/claims/{claim_id}/reject",
    params(("claim_id" = String, Path, description = "Claim id")),
    responses(
        (status = 200, description = "Claim rejected"),
        (status = 400, description = "Already processed"),
        (status = 404, description = "Claim not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Claim"
)]
pub async fn reject_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    workflow::decide_claim(&store, &bus, &path.into_inner(), Decision::Reject)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Claim rejected" })))
}
