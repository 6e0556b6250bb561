use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, token_ttl_days: 7 }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new account and its role profile.
    ///
    /// Donors must supply a document number; a duplicate email or document is
    /// a conflict. If the profile insert fails after the user row was
    /// created, the user row is deleted again so a retry can succeed.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterInput {
    ///     email: "donor@example.com".into(),
    ///     password: "Secret123".into(),
    ///     role: "donor".into(),
    ///     name: "Test Donor".into(),
    ///     document: Some("CC1000".into()),
    ///     location: None,
    ///     city: None,
    ///     department: None,
    /// };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "donor@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("name required".into()));
        }
        if input.role != models::user::ROLE_DONOR && input.role != models::user::ROLE_ENTITY {
            return Err(AuthError::Validation(format!("invalid role: {}", input.role)));
        }

        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("email taken: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let document = if input.role == models::user::ROLE_DONOR {
            let document = input
                .document
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or_else(|| AuthError::Validation("document required for donors".into()))?;
            if self.repo.donor_document_exists(document).await? {
                return Err(AuthError::DocumentConflict);
            }
            Some(document.to_string())
        } else {
            None
        };

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(&input.email, &hash, &input.role).await?;

        let profile = match &document {
            Some(document) => {
                self.repo
                    .create_donor_profile(document, &input.name, &input.email, user.id)
                    .await
            }
            None => {
                self.repo
                    .create_entity_profile(
                        &input.name,
                        &input.email,
                        input.location.clone(),
                        input.city.clone(),
                        input.department.clone(),
                        user.id,
                    )
                    .await
            }
        };
        if let Err(e) = profile {
            // Compensating delete: leave no orphaned login without a profile.
            let _ = self.repo.delete_user(user.id).await;
            return Err(e);
        }

        info!(user_id = %user.id, role = %user.role, email = %user.email, "user_registered");
        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Authenticate a user and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: Some("secret".into()), token_ttl_days: 7 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     email: "bank@example.com".into(),
    ///     password: "Passw0rd!".into(),
    ///     role: "entity".into(),
    ///     name: "Central Bank".into(),
    ///     document: None,
    ///     location: None,
    ///     city: Some("Bogota".into()),
    ///     department: None,
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "bank@example.com".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let hash = self
            .repo
            .get_password_hash(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    fn issue_token(&self, user: &AuthUser) -> Result<Option<String>, AuthError> {
        let Some(secret) = &self.cfg.jwt_secret else { return Ok(None) };
        let exp = (chrono::Utc::now() + chrono::Duration::days(self.cfg.token_ttl_days)).timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            exp,
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::RegisterInput;
    use crate::auth::repository::mock::MockAuthRepository;

    fn donor_input(email: &str, document: &str) -> RegisterInput {
        RegisterInput {
            email: email.into(),
            password: "Sup3rSecret".into(),
            role: "donor".into(),
            name: "Donor".into(),
            document: Some(document.into()),
            location: None,
            city: None,
            department: None,
        }
    }

    #[tokio::test]
    async fn register_rejects_donor_without_document() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        let mut input = donor_input("a@b.co", "CC1");
        input.document = None;
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_document() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        svc.register(donor_input("a@b.co", "CC1")).await.unwrap();
        let err = svc.register(donor_input("c@d.co", "CC1")).await.unwrap_err();
        assert!(matches!(err, AuthError::DocumentConflict));
    }

    #[tokio::test]
    async fn failed_profile_rolls_back_user_row() {
        let repo = Arc::new(MockAuthRepository::failing_donor_profiles());
        let svc = AuthService::new(Arc::clone(&repo), AuthConfig::default());
        let err = svc.register(donor_input("a@b.co", "CC1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("s".into()), token_ttl_days: 7 },
        );
        svc.register(donor_input("a@b.co", "CC1")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "a@b.co".into(), password: "wrong-password".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }
}
