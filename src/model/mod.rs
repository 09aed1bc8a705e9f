pub mod attendance;
pub mod claim;
pub mod holiday;
pub mod leave_request;
pub mod notification;
pub mod role;
pub mod user;
