use crate::api::attendance::CheckInReq;
use crate::api::claim::SubmitClaim;
use crate::api::employee::{AdjustBalance, CreateEmployee, UpdateEmployee};
use crate::api::leave_request::{ApplyLeave, ApplyLeaveResponse, NotifyLinks};
use crate::api::notification::{ResolveAction, ResolveReq};
use crate::entitlement::Entitlement;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, Coordinates};
use crate::model::claim::ReplacementClaim;
use crate::model::leave_request::{LeaveDuration, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::{Notification, NotificationKind, RelatedKind};
use crate::model::role::Role;
use crate::model::user::{AdjustmentKind, AdjustmentLog, LeaveAdjustments, User};
use crate::models::{LoginReqDto, LoginResponse};
use crate::report::ReportKind;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jenco HR API",
        version = "1.0.0",
        description = r#"
## Jenco HR Self-Service

This API powers the staff self-service portal: GPS attendance, leave
applications with an approval workflow, replacement-leave claims, and an
entitlement calculator.

### 🔹 Key Features
- **Attendance**
  - Daily check-in/check-out with location capture and a 9-hour full-day rule
- **Leave Management**
  - Apply for leave, approve/reject requests, and view leave history
- **Replacement Claims**
  - Claim replacement credit for off-day work; approved claims credit the balance
- **Entitlement**
  - Tenure-based allotments plus admin adjustments with an audit trail
- **Reports**
  - Admin CSV exports for attendance and leave, by month or year

### 🔐 Security
Endpoints under the API prefix are protected with **JWT Bearer authentication**.
Administrative operations additionally require the **Admin** role.

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::claim::claim_list,
        crate::api::claim::create_claim,
        crate::api::claim::approve_claim,
        crate::api::claim::reject_claim,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::attendance_list,
        crate::api::attendance::attendance_today,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::adjust_balance,
        crate::api::employee::my_entitlement,
        crate::api::employee::employee_entitlement,

        crate::api::notification::notification_list,
        crate::api::notification::mark_read,
        crate::api::notification::mark_all_read,
        crate::api::notification::resolve,

        crate::api::holiday::holidays,
        crate::api::report::export
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            User,
            Role,
            LeaveAdjustments,
            AdjustmentKind,
            AdjustmentLog,
            CreateEmployee,
            UpdateEmployee,
            AdjustBalance,
            Entitlement,
            ApplyLeave,
            ApplyLeaveResponse,
            NotifyLinks,
            LeaveRequest,
            LeaveType,
            LeaveDuration,
            LeaveStatus,
            SubmitClaim,
            ReplacementClaim,
            CheckInReq,
            AttendanceRecord,
            AttendanceStatus,
            Coordinates,
            Notification,
            NotificationKind,
            RelatedKind,
            ResolveReq,
            ResolveAction,
            ReportKind
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and session APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Claim", description = "Replacement-leave claim APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Notification", description = "In-app notification APIs"),
        (name = "Report", description = "CSV report and holiday APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
