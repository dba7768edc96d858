use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, User};
use shared_store::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        port: 0,
        store_max_transactions: 8,
        store_acquire_timeout_ms: 1_000,
        validate_on_reschedule: false,
    }
}

pub fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_config()))
}

pub fn test_state_with(config: AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config))
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn therapist(email: &str) -> Self {
        Self::new(email, "therapist")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.to_string(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
        }
    }

    /// Mint a bearer token for this user, signed with the test secret.
    pub fn token(&self) -> String {
        let claims = JwtClaims {
            sub: self.id.to_string(),
            exp: (Utc::now().timestamp() + 3_600) as u64,
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            iat: Some(Utc::now().timestamp() as u64),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("test token encodes")
    }
}
