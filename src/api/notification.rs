use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::notification::{Notification, RelatedKind};
use crate::notify;
use crate::store::Store;
use crate::workflow::{self, Decision, EventBus};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    Approve,
    Reject,
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveReq {
    pub action: ResolveAction,
}

/// The caller's inbox, newest first. Clients poll this endpoint; workflow
/// transitions also publish in-process events, so a future push channel
/// can subscribe without changing this surface.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Inbox", body = [Notification]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn notification_list(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(notify::user_notifications(&store, &auth.user_id)))
}

/// Flip one notification to read. Only the owner's entries are visible;
/// anyone else's ids read as not found.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(("notification_id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn mark_read(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    match notify::mark_read(&store, &auth.user_id, &id) {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "message": "Marked read" }))),
        Ok(false) => {
            warn!(id, "Mark-read targeted an unknown notification");
            Ok(HttpResponse::NotFound().json(json!({ "message": "Notification not found" })))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to mark notification read");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Flip the caller's whole inbox to read.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "All marked read"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn mark_all_read(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    match notify::mark_all_read(&store, &auth.user_id) {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({ "updated": updated }))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to mark inbox read");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Resolve the leave request or claim behind an actionable notification
/// without leaving the inbox (admin). The decision routes through the same
/// workflow transition as the direct endpoints, then the notification is
/// marked read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{notification_id}/resolve",
    params(("notification_id" = String, Path, description = "Notification id")),
    request_body = ResolveReq,
    responses(
        (status = 200, description = "Underlying item resolved"),
        (status = 400, description = "Notification is not actionable or item already processed"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn resolve(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
    payload: web::Json<ResolveReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let id = path.into_inner();

    let note = match notify::notification_by_id(&store, &id) {
        Some(note) => note,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Notification not found"
            })));
        }
    };
    if note.user_id != auth.user_id {
        return Err(actix_web::error::ErrorForbidden("Not your notification"));
    }

    let (related_id, related_kind) = match (&note.related_id, note.related_kind) {
        (Some(related_id), Some(related_kind)) => (related_id.clone(), related_kind),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Notification is not actionable"
            })));
        }
    };

    let decision = match payload.action {
        ResolveAction::Approve => Decision::Approve,
        ResolveAction::Reject => Decision::Reject,
    };

    match related_kind {
        RelatedKind::Leave => {
            workflow::decide_leave(&store, &bus, &related_id, decision)?;
        }
        RelatedKind::Claim => {
            workflow::decide_claim(&store, &bus, &related_id, decision)?;
        }
    }

    if let Err(e) = notify::mark_read(&store, &auth.user_id, &id) {
        tracing::error!(error = %e, "Resolved item but failed to mark notification read");
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Resolved" })))
}
