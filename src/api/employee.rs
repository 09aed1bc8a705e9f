use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::entitlement;
use crate::model::role::Role;
use crate::model::user::{AdjustmentKind, LeaveAdjustments, User};
use crate::store::Store;
use crate::workflow::{self, EventBus, WorkflowError};

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub position: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub joining_date: NaiveDate,
    /// Defaults to staff.
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub joining_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct AdjustBalance {
    pub kind: AdjustmentKind,
    /// Signed; negative amounts deduct.
    #[schema(example = 1.0)]
    pub amount: f64,
    pub reason: String,
}

/// Create an employee account (admin).
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = User),
        (status = 409, description = "Username already exists"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Username and password must not be empty"
        })));
    }
    if store.user_by_username(&username).is_some() {
        return Ok(HttpResponse::Conflict().json(json!({
            "error": "Username already exists"
        })));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username,
        password: payload.password,
        full_name: payload.full_name,
        position: payload.position,
        joining_date: payload.joining_date,
        role: payload.role.unwrap_or(Role::Staff),
        leave_adjustments: LeaveAdjustments::default(),
        adjustment_logs: Vec::new(),
    };

    match store.add_user(user.clone()) {
        Ok(()) => Ok(HttpResponse::Created().json(user)),
        Err(e) => {
            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// All employee accounts (admin).
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employee list", body = [User]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(store.users()))
}

/// One employee account (admin).
#[utoipa::path(
    get,
    path = "/api/v1/employees/{user_id}",
    params(("user_id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = User),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    match store.user_by_id(&path.into_inner()) {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" }))),
    }
}

/// Update profile fields on an employee account (admin). Balances are not
/// touched here; use the adjust endpoint so the audit trail stays intact.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{user_id}",
    params(("user_id" = String, Path, description = "Employee id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = User),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let mut user = match store.user_by_id(&user_id) {
        Some(user) => user,
        None => {
            warn!(user_id, "Update targeted an unknown employee");
            return Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" })));
        }
    };

    let payload = payload.into_inner();
    if let Some(username) = payload.username {
        user.username = username;
    }
    if let Some(password) = payload.password {
        user.password = password;
    }
    if let Some(full_name) = payload.full_name {
        user.full_name = full_name;
    }
    if let Some(position) = payload.position {
        user.position = position;
    }
    if let Some(joining_date) = payload.joining_date {
        user.joining_date = joining_date;
    }

    match store.update_user(user.clone()) {
        Ok(true) => Ok(HttpResponse::Ok().json(user)),
        Ok(false) => {
            warn!(user_id = %user.id, "Employee vanished between read and update");
            Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" })))
        }
        Err(e) => {
            error!(error = %e, "Failed to update employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Delete an employee account (admin).
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{user_id}",
    params(("user_id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();
    match store.delete_user(&user_id) {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" }))),
        Err(e) => {
            error!(error = %e, user_id, "Failed to delete employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Adjust an employee's annual-leave or replacement balance (admin).
/// Prepends an audit log entry and notifies the employee.
#[utoipa::path(
    post,
    path = "/api/v1/employees/{user_id}/adjust",
    params(("user_id" = String, Path, description = "Employee id")),
    request_body = AdjustBalance,
    responses(
        (status = 200, description = "Balance adjusted", body = User),
        (status = 400, description = "Zero amount or empty reason"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn adjust_balance(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<String>,
    payload: web::Json<AdjustBalance>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    // Callers reject no-op and unexplained adjustments before the workflow
    // engine is invoked.
    if payload.amount == 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Adjustment amount must not be zero"
        })));
    }
    if payload.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Adjustment reason is required"
        })));
    }

    let user = workflow::adjust_balance(
        &store,
        &bus,
        &auth.full_name,
        &path.into_inner(),
        payload.kind,
        payload.amount,
        payload.reason.trim(),
    )?;
    Ok(HttpResponse::Ok().json(user))
}

/// The caller's own entitlement summary.
#[utoipa::path(
    get,
    path = "/api/v1/entitlement",
    responses(
        (status = 200, description = "Entitlement summary", body = entitlement::Entitlement),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn my_entitlement(auth: AuthUser, store: web::Data<Store>) -> actix_web::Result<impl Responder> {
    entitlement_response(&store, &auth.user_id)
}

/// Any employee's entitlement summary (admin).
#[utoipa::path(
    get,
    path = "/api/v1/employees/{user_id}/entitlement",
    params(("user_id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Entitlement summary", body = entitlement::Entitlement),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn employee_entitlement(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    entitlement_response(&store, &path.into_inner())
}

fn entitlement_response(store: &Store, user_id: &str) -> actix_web::Result<HttpResponse> {
    let user = store.user_by_id(user_id).ok_or_else(|| {
        actix_web::Error::from(WorkflowError::NotFound {
            kind: "user",
            id: user_id.to_string(),
        })
    })?;
    let leaves = store.leaves(Some(user_id));
    let summary = entitlement::calculate(&user, &leaves, Utc::now().date_naive());
    Ok(HttpResponse::Ok().json(summary))
}
