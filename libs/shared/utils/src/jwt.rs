use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, Principal, Role};

type HmacSha256 = Hmac<Sha256>;

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Principal, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    // Decode claims
    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    // Check expiration
    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| "Invalid subject claim".to_string())?;

    let role = claims
        .role
        .as_deref()
        .ok_or_else(|| "Token missing role".to_string())?
        .parse::<Role>()?;

    let principal = Principal {
        user_id,
        role,
        email: claims.email,
    };

    debug!("Token validated successfully for user: {}", principal.user_id);
    Ok(principal)
}

/// Issues an HS256 token carrying the same claims `validate_token` expects.
pub fn sign_token(
    user_id: Uuid,
    role: Role,
    email: Option<&str>,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let exp = now + Duration::hours(ttl_hours);

    let header = json!({
        "alg": "HS256",
        "typ": "JWT"
    });

    let payload = json!({
        "sub": user_id,
        "email": email,
        "role": role.as_str(),
        "iat": now.timestamp(),
        "exp": exp.timestamp()
    });

    let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
    let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
    let signing_input = format!("{}.{}", header_encoded, payload_encoded);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-key";

    #[test]
    fn sign_then_validate_round_trip() {
        let user_id = Uuid::new_v4();
        let token = sign_token(user_id, Role::Nurse, Some("nurse@clinic.test"), SECRET, 1)
            .expect("signing should succeed");

        let principal = validate_token(&token, SECRET).expect("token should validate");
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.role, Role::Nurse);
        assert_eq!(principal.email.as_deref(), Some("nurse@clinic.test"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign_token(Uuid::new_v4(), Role::Patient, None, SECRET, 1).unwrap();
        assert!(validate_token(&token, "a-different-secret").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign_token(Uuid::new_v4(), Role::Patient, None, SECRET, -1).unwrap();
        assert_eq!(
            validate_token(&token, SECRET).unwrap_err(),
            "Token expired".to_string()
        );
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(validate_token("not.a-token", SECRET).is_err());
    }
}
