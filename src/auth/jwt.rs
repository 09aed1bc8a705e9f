use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::model::user::User;
use crate::models::Claims;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Session tokens are a transport detail only; credential checks are
/// plaintext comparisons (see the non-goals on authentication security).
pub fn generate_session_token(user: &User, secret: &str, ttl: usize) -> String {
    let claims = Claims {
        user_id: user.id.clone(),
        sub: user.username.clone(),
        full_name: user.full_name.clone(),
        role: user.role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::role::Role;
    use crate::model::user::LeaveAdjustments;

    fn sample_user() -> User {
        User {
            id: "staff-1".to_string(),
            username: "alex".to_string(),
            password: "password".to_string(),
            full_name: "Alex Tan".to_string(),
            position: "Marketing Exec".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2022, 5, 15).unwrap(),
            role: Role::Staff,
            leave_adjustments: LeaveAdjustments::default(),
            adjustment_logs: Vec::new(),
        }
    }

    #[test]
    fn round_trips_claims() {
        let token = generate_session_token(&sample_user(), "secret", 3600);
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id, "staff-1");
        assert_eq!(claims.sub, "alex");
        assert_eq!(claims.role, Role::Staff);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_session_token(&sample_user(), "secret", 3600);
        assert!(verify_token(&token, "other").is_err());
    }
}
