use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

/// Validate a bearer token issued by the external auth service and resolve
/// the authenticated principal. Signature and expiry are checked; token
/// issuance lives outside this system.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token validation failed: {}", e);
        "Invalid token".to_string()
    })?;

    let claims = data.claims;
    debug!("Token validated successfully for user: {}", claims.sub);

    Ok(User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}
