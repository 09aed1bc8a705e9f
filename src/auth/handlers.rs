use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::auth::jwt::{generate_session_token, verify_token};
use crate::config::Config;
use crate::models::{LoginReqDto, LoginResponse};
use crate::store::Store;

/// Login handler. Credential checks are plaintext comparisons against the
/// stored user record; the issued token and the persisted session slot are
/// both refreshed on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(store, config, body), fields(username = %body.username))]
pub async fn login(
    body: web::Json<LoginReqDto>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if body.username.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    debug!("Fetching user from store");

    let user = match store.user_by_username(body.username.trim()) {
        Some(user) if user.password == body.password => user,
        Some(_) => {
            info!("Invalid credentials: password mismatch");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        None => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
    };

    if let Err(e) = store.set_current_user(Some(user.id.clone())) {
        error!(error = %e, "Failed to persist session slot");
        return HttpResponse::InternalServerError().finish();
    }

    let token = generate_session_token(&user, &config.jwt_secret, config.session_ttl);

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse { token, user })
}

/// Clears the persisted session slot. Succeeds even without a valid token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        if verify_token(token, &config.jwt_secret).is_ok() {
            if let Err(e) = store.set_current_user(None) {
                error!(error = %e, "Failed to clear session slot");
            }
        }
    }

    HttpResponse::NoContent().finish()
}

/// The stored record behind the caller's token, re-read from the store.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = crate::model::user::User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: crate::auth::auth::AuthUser, store: web::Data<Store>) -> impl Responder {
    match store.user_by_id(&auth.user_id) {
        Some(user) => HttpResponse::Ok().json(user),
        None => HttpResponse::NotFound().json(json!({ "message": "User not found" })),
    }
}
