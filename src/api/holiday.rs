use actix_web::{HttpResponse, Responder};

use crate::model::holiday::PUBLIC_HOLIDAYS;

/// The static company holiday table.
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses((status = 200, description = "Public holidays")),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn holidays() -> impl Responder {
    HttpResponse::Ok().json(PUBLIC_HOLIDAYS)
}
