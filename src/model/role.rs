use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    #[strum(serialize = "ADMIN")]
    Admin,
    #[serde(rename = "STAFF")]
    #[strum(serialize = "STAFF")]
    Staff,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}
