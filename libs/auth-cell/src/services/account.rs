use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::auth::Role;
use shared_models::records::UserAccount;
use shared_store::AppContext;
use shared_utils::jwt::sign_token;

use crate::models::{AuthCellError, AuthResponse, LoginRequest, SignupRequest};
use crate::services::password::{hash_password, verify_password};

pub struct AccountService {
    ctx: Arc<AppContext>,
}

impl AccountService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Registers a new patient account. Staff accounts are provisioned out
    /// of band, never through the public signup endpoint.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthCellError> {
        let email = normalize_email(&request.email);
        validate_signup(&request, &email)?;

        if self
            .ctx
            .store
            .users
            .find_one(|u| u.email == email)
            .await
            .is_some()
        {
            warn!("Signup rejected, email already registered: {}", email);
            return Err(AuthCellError::EmailTaken);
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| AuthCellError::Internal(e.to_string()))?;

        let now = Utc::now();
        let user = self
            .ctx
            .store
            .users
            .insert(UserAccount {
                id: Uuid::new_v4(),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email,
                password_hash,
                role: Role::Patient,
                created_at: now,
                updated_at: now,
            })
            .await;

        info!("Account created for {}", user.email);
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthCellError> {
        let email = normalize_email(&request.email);

        let Some(user) = self.ctx.store.users.find_one(|u| u.email == email).await else {
            debug!("Login failed, no account for {}", email);
            return Err(AuthCellError::InvalidCredentials);
        };

        let verified = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AuthCellError::Internal(e.to_string()))?;
        if !verified {
            debug!("Login failed, wrong password for {}", email);
            return Err(AuthCellError::InvalidCredentials);
        }

        info!("Login succeeded for {}", user.email);
        self.issue(user)
    }

    fn issue(&self, user: UserAccount) -> Result<AuthResponse, AuthCellError> {
        let token = sign_token(
            user.id,
            user.role,
            Some(&user.email),
            &self.ctx.config.jwt_secret,
            self.ctx.config.token_ttl_hours,
        )
        .map_err(AuthCellError::Internal)?;

        Ok(AuthResponse { token, user })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(request: &SignupRequest, email: &str) -> Result<(), AuthCellError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AuthCellError::Validation(
            "First name and last name are required".to_string(),
        ));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AuthCellError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.len() < 8 {
        return Err(AuthCellError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::jwt::validate_token;
    use shared_utils::test_utils::TestConfig;

    fn service() -> (AccountService, Arc<AppContext>) {
        let ctx = TestConfig::default().to_context();
        (AccountService::new(ctx.clone()), ctx)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            first_name: "Juan".to_string(),
            last_name: "Dela Cruz".to_string(),
            email: email.to_string(),
            password: "a-long-enough-password".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_issues_a_valid_patient_token() {
        let (svc, ctx) = service();
        let response = svc.signup(signup_request("juan@example.com")).await.unwrap();

        assert_eq!(response.user.role, Role::Patient);
        let principal = validate_token(&response.token, &ctx.config.jwt_secret).unwrap();
        assert_eq!(principal.user_id, response.user.id);
        assert_eq!(principal.role, Role::Patient);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let (svc, _ctx) = service();
        svc.signup(signup_request("juan@example.com")).await.unwrap();

        let err = svc
            .signup(signup_request("JUAN@example.com"))
            .await
            .unwrap_err();
        assert_matches!(err, AuthCellError::EmailTaken);
    }

    #[tokio::test]
    async fn login_round_trip() {
        let (svc, _ctx) = service();
        svc.signup(signup_request("maria@example.com")).await.unwrap();

        let response = svc
            .login(LoginRequest {
                email: "maria@example.com".to_string(),
                password: "a-long-enough-password".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "maria@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let (svc, _ctx) = service();
        svc.signup(signup_request("maria@example.com")).await.unwrap();

        let wrong_password = svc
            .login(LoginRequest {
                email: "maria@example.com".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = svc
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "a-long-enough-password".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let (svc, _ctx) = service();
        let mut request = signup_request("short@example.com");
        request.password = "short".to_string();

        assert_matches!(
            svc.signup(request).await.unwrap_err(),
            AuthCellError::Validation(_)
        );
    }
}
