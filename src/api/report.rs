use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::report::{self, ReportKind};
use crate::store::Store;

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// `YYYY-MM` for a monthly report, `YYYY` for a yearly one.
    pub period: String,
}

/// CSV report download (admin). The response is the raw CSV with a
/// `{Org}_{ReportKind}_{period}.csv` attachment name.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{kind}",
    params(
        ("kind" = String, Path, description = "attendance or leaves"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn export(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
    path: web::Path<ReportKind>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let kind = path.into_inner();

    let csv = match kind {
        ReportKind::Attendance => report::attendance_csv(&store, &query.period),
        ReportKind::Leaves => report::leaves_csv(&store, &query.period),
    };
    let filename = report::csv_filename(&config.org_name, kind, &query.period);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(csv))
}
