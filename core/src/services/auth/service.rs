//! Main authentication service implementation

use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{ConfirmationRepository, TokenRepository, UserRepository};
use crate::services::confirmation::ConfirmationService;
use crate::services::mail::Mailer;
use crate::services::token::TokenService;

use super::password::PasswordHasher;

use tn_shared::utils::validation::validators;

/// Registration data as accepted by [`AuthService::register`]
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Authentication service for managing the account lifecycle
///
/// Covers registration with email confirmation, credential login, token
/// refresh with rotation, and logout.
pub struct AuthService<U, T, C, M>
where
    U: UserRepository,
    T: TokenRepository,
    C: ConfirmationRepository,
    M: Mailer,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Token service for JWT and refresh token management
    token_service: Arc<TokenService<T>>,
    /// Confirmation service for account activation mails
    confirmation_service: Arc<ConfirmationService<C, M>>,
    /// Password hashing
    password_hasher: PasswordHasher,
}

impl<U, T, C, M> AuthService<U, T, C, M>
where
    U: UserRepository,
    T: TokenRepository,
    C: ConfirmationRepository,
    M: Mailer,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service for JWT token management
    /// * `confirmation_service` - Service for confirmation mails
    /// * `password_hasher` - Password hashing configuration
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<T>>,
        confirmation_service: Arc<ConfirmationService<C, M>>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            confirmation_service,
            password_hasher,
        }
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Validates the registration fields
    /// 2. Checks username and email uniqueness
    /// 3. Hashes the password and stores the user, unconfirmed
    /// 4. Issues a single-use confirmation token and mails the link
    ///
    /// A mail delivery failure does not fail the registration; the account
    /// exists and a fresh link can be requested later. The undelivered token
    /// is removed so it can never be claimed.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored, not yet confirmed user
    /// * `Err(DomainError)` - Validation failed or identifier already taken
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        let registration = normalize(registration);
        validate_registration(&registration)?;

        if self
            .user_repository
            .username_exists(&registration.username)
            .await?
        {
            return Err(DomainError::Auth(AuthError::UsernameTaken));
        }
        if self.user_repository.email_exists(&registration.email).await? {
            return Err(DomainError::Auth(AuthError::EmailTaken));
        }

        let password_hash = self.password_hasher.hash(&registration.password)?;
        let user = User::new(
            registration.username,
            registration.email,
            password_hash,
            registration.first_name,
            registration.last_name,
            registration.phone,
        );
        let user = self.user_repository.create(user).await?;

        if let Err(e) = self.confirmation_service.issue(&user).await {
            warn!(
                user_id = %user.id,
                error = %e,
                "confirmation mail could not be sent at registration"
            );
        }

        Ok(user)
    }

    /// Log a user in with username and password
    ///
    /// This method:
    /// 1. Looks the user up by username
    /// 2. Verifies the password against the stored hash
    /// 3. Rejects disabled and unconfirmed accounts
    /// 4. Records the login and issues a fresh token pair
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Tokens and user information
    /// * `Err(DomainError)` - Unknown user, wrong password, or blocked account
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = self
            .user_repository
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        self.password_hasher.verify(password, &user.password_hash)?;

        if user.is_disabled {
            return Err(DomainError::Auth(AuthError::AccountDisabled));
        }
        if !user.is_active {
            return Err(DomainError::Auth(AuthError::AccountNotConfirmed));
        }

        self.user_repository.record_login(user.id).await?;

        let token_pair = self.token_service.generate_tokens(user.id).await?;
        Ok(AuthResponse::from_token_pair(&user, token_pair))
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The presented refresh token is rotated: the new pair comes with a new
    /// refresh token and the old one is revoked.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - New tokens and user information
    /// * `Err(DomainError)` - Token invalid, expired, revoked, or account blocked
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let user_id = self.token_service.verify_refresh_token(refresh_token).await?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        if user.is_disabled {
            return Err(DomainError::Auth(AuthError::AccountDisabled));
        }

        let token_pair = self.token_service.refresh_tokens(refresh_token).await?;
        Ok(AuthResponse::from_token_pair(&user, token_pair))
    }

    /// Log out by invalidating a refresh token
    ///
    /// Logout is idempotent; presenting an unknown or already revoked token
    /// succeeds without effect. The short-lived access token is left to
    /// expire on its own.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let _ = self
            .token_service
            .revoke_refresh_token(refresh_token)
            .await?;
        Ok(())
    }

    /// Confirm an email address with a token from the confirmation link
    ///
    /// The token is claimed atomically; a second visit with the same link
    /// reads as an invalid token.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The now active user
    /// * `Err(DomainError)` - Token unknown or expired
    pub async fn confirm_email(&self, raw_token: &str) -> DomainResult<User> {
        let confirmation = self.confirmation_service.consume(raw_token).await?;

        self.user_repository.activate(confirmation.user_id).await?;

        self.user_repository
            .find_by_id(confirmation.user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))
    }

    /// Send a fresh confirmation link to a registered address
    ///
    /// Unlike registration, a mail failure here is reported: resending is
    /// the whole point of the call.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A new link is on its way
    /// * `Err(DomainError)` - Unknown address, already confirmed, or mail failed
    pub async fn resend_confirmation(&self, email: &str) -> DomainResult<()> {
        let user = self
            .user_repository
            .find_by_email(email.trim().to_lowercase().as_str())
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        if user.is_active {
            return Err(DomainError::BusinessRule {
                message: "Account is already confirmed".to_string(),
            });
        }

        self.confirmation_service.issue(&user).await
    }

    /// Whether a username is still free
    pub async fn is_username_available(&self, username: &str) -> DomainResult<bool> {
        Ok(!self
            .user_repository
            .username_exists(username.trim())
            .await?)
    }

    /// Whether an email address is still free
    pub async fn is_email_available(&self, email: &str) -> DomainResult<bool> {
        Ok(!self
            .user_repository
            .email_exists(email.trim().to_lowercase().as_str())
            .await?)
    }
}

fn normalize(mut registration: Registration) -> Registration {
    registration.username = registration.username.trim().to_string();
    registration.email = registration.email.trim().to_lowercase();
    registration.first_name = registration.first_name.trim().to_string();
    registration.last_name = registration.last_name.trim().to_string();
    registration.phone = registration
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    registration
}

fn validate_registration(registration: &Registration) -> DomainResult<()> {
    if !validators::is_valid_username(&registration.username) {
        return Err(DomainError::ValidationErr(ValidationError::PatternMismatch {
            field: "username".to_string(),
        }));
    }
    if !validators::is_valid_email(&registration.email) {
        return Err(DomainError::ValidationErr(ValidationError::InvalidEmail));
    }
    if !validators::is_valid_password(&registration.password) {
        return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
            field: "password".to_string(),
            min: "8".to_string(),
            max: "72".to_string(),
        }));
    }
    for (field, value) in [
        ("first_name", &registration.first_name),
        ("last_name", &registration.last_name),
    ] {
        if !validators::not_empty(value) {
            return Err(DomainError::ValidationErr(ValidationError::RequiredField {
                field: field.to_string(),
            }));
        }
        if !validators::length_between(value, 1, 100) {
            return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
                field: field.to_string(),
                min: "1".to_string(),
                max: "100".to_string(),
            }));
        }
    }
    if let Some(phone) = &registration.phone {
        if !validators::is_valid_phone(phone) {
            return Err(DomainError::ValidationErr(ValidationError::PatternMismatch {
                field: "phone".to_string(),
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        MockConfirmationRepository, MockTokenRepository, MockUserRepository,
    };
    use crate::services::confirmation::ConfirmationConfig;
    use crate::services::mail::MockMailer;
    use crate::services::token::TokenConfig;

    struct Fixture {
        service: AuthService<
            MockUserRepository,
            MockTokenRepository,
            MockConfirmationRepository,
            MockMailer,
        >,
        users: Arc<MockUserRepository>,
        confirmations: Arc<MockConfirmationRepository>,
        mailer: Arc<MockMailer>,
    }

    fn fixture() -> Fixture {
        fixture_with_mailer(Arc::new(MockMailer::new()))
    }

    fn fixture_with_mailer(mailer: Arc<MockMailer>) -> Fixture {
        let users = Arc::new(MockUserRepository::new());
        let confirmations = Arc::new(MockConfirmationRepository::new());
        let token_service = Arc::new(TokenService::new(
            MockTokenRepository::new(),
            TokenConfig::default(),
        ));
        let confirmation_service = Arc::new(ConfirmationService::new(
            confirmations.clone(),
            mailer.clone(),
            ConfirmationConfig::default(),
        ));

        Fixture {
            service: AuthService::new(
                users.clone(),
                token_service,
                confirmation_service,
                // Low cost keeps the tests fast
                PasswordHasher::new(4),
            ),
            users,
            confirmations,
            mailer,
        }
    }

    fn registration() -> Registration {
        Registration {
            username: "maria_92".to_string(),
            email: "maria@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Soler".to_string(),
            phone: None,
        }
    }

    async fn confirmed_user(fixture: &Fixture) -> User {
        let user = fixture.service.register(registration()).await.unwrap();
        fixture.users.activate(user.id).await.unwrap();
        fixture.users.find_by_id(user.id).await.unwrap().unwrap()
    }

    fn token_from_mail(body: &str) -> String {
        body.lines()
            .find(|line| line.contains("/confirm-email/"))
            .expect("mail should contain a confirmation link")
            .rsplit('/')
            .next()
            .unwrap()
            .trim()
            .to_string()
    }

    #[tokio::test]
    async fn test_register_stores_unconfirmed_user_and_sends_mail() {
        let fixture = fixture();

        let user = fixture.service.register(registration()).await.unwrap();
        assert!(!user.is_active);
        assert_ne!(user.password_hash, "hunter2hunter2");

        assert_eq!(fixture.mailer.sent_count().await, 1);
        assert_eq!(fixture.confirmations.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username_and_email() {
        let fixture = fixture();
        fixture.service.register(registration()).await.unwrap();

        let mut same_username = registration();
        same_username.email = "other@example.com".to_string();
        let result = fixture.service.register(same_username).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::UsernameTaken))
        ));

        let mut same_email = registration();
        same_email.username = "other_user".to_string();
        let result = fixture.service.register(same_email).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::EmailTaken))
        ));
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let fixture = fixture();

        let mut bad_email = registration();
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            fixture.service.register(bad_email).await,
            Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
        ));

        let mut short_password = registration();
        short_password.password = "short".to_string();
        assert!(matches!(
            fixture.service.register(short_password).await,
            Err(DomainError::ValidationErr(ValidationError::OutOfRange { .. }))
        ));

        let mut bad_username = registration();
        bad_username.username = "2bad".to_string();
        assert!(matches!(
            fixture.service.register(bad_username).await,
            Err(DomainError::ValidationErr(
                ValidationError::PatternMismatch { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_register_succeeds_when_mail_fails() {
        let fixture = fixture_with_mailer(Arc::new(MockMailer::failing()));

        let user = fixture.service.register(registration()).await.unwrap();
        assert!(!user.is_active);

        // The undeliverable token must not stay claimable
        assert!(fixture.confirmations.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_ladder() {
        let fixture = fixture();

        // Unknown username
        let result = fixture.service.login("nobody", "whatever").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::UserNotFound))
        ));

        let user = fixture.service.register(registration()).await.unwrap();

        // Wrong password comes before account state
        let result = fixture.service.login("maria_92", "wrong-password").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InvalidCredentials))
        ));

        // Right password but not confirmed yet
        let result = fixture.service.login("maria_92", "hunter2hunter2").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::AccountNotConfirmed))
        ));

        // Confirmed: login works and is recorded
        fixture.users.activate(user.id).await.unwrap();
        let response = fixture
            .service
            .login("maria_92", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(response.username, "maria_92");
        assert!(!response.access_token.is_empty());
        assert!(!response.refresh_token.is_empty());

        let stored = fixture.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());

        // Disabled accounts are locked out again
        fixture.users.disable(user.id).await.unwrap();
        let result = fixture.service.login("maria_92", "hunter2hunter2").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::AccountDisabled))
        ));
    }

    #[tokio::test]
    async fn test_confirm_email_activates_account() {
        let fixture = fixture();
        fixture.service.register(registration()).await.unwrap();

        let sent = fixture.mailer.sent_messages().await;
        let raw_token = token_from_mail(&sent[0].body);

        let user = fixture.service.confirm_email(&raw_token).await.unwrap();
        assert!(user.is_active);

        // The link is single use
        let result = fixture.service.confirm_email(&raw_token).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InvalidConfirmationToken))
        ));

        // And login now works
        assert!(fixture
            .service
            .login("maria_92", "hunter2hunter2")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let fixture = fixture();
        confirmed_user(&fixture).await;
        let response = fixture
            .service
            .login("maria_92", "hunter2hunter2")
            .await
            .unwrap();

        let refreshed = fixture.service.refresh(&response.refresh_token).await.unwrap();
        assert_ne!(refreshed.refresh_token, response.refresh_token);

        // The old refresh token died with the rotation
        assert!(fixture.service.refresh(&response.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_logout_invalidates_refresh_token_idempotently() {
        let fixture = fixture();
        confirmed_user(&fixture).await;
        let response = fixture
            .service
            .login("maria_92", "hunter2hunter2")
            .await
            .unwrap();

        fixture.service.logout(&response.refresh_token).await.unwrap();
        assert!(fixture.service.refresh(&response.refresh_token).await.is_err());

        // Logging out again, or with garbage, still succeeds
        fixture.service.logout(&response.refresh_token).await.unwrap();
        fixture.service.logout("never-issued").await.unwrap();
    }

    #[tokio::test]
    async fn test_resend_confirmation() {
        let fixture = fixture();

        let result = fixture.service.resend_confirmation("ghost@example.com").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::UserNotFound))
        ));

        let user = fixture.service.register(registration()).await.unwrap();
        fixture
            .service
            .resend_confirmation("maria@example.com")
            .await
            .unwrap();
        assert_eq!(fixture.mailer.sent_count().await, 2);
        assert_eq!(fixture.confirmations.len().await, 1);

        fixture.users.activate(user.id).await.unwrap();
        let result = fixture.service.resend_confirmation("maria@example.com").await;
        assert!(matches!(result, Err(DomainError::BusinessRule { .. })));
    }

    #[tokio::test]
    async fn test_availability_checks() {
        let fixture = fixture();
        fixture.service.register(registration()).await.unwrap();

        assert!(!fixture
            .service
            .is_username_available("maria_92")
            .await
            .unwrap());
        assert!(fixture
            .service
            .is_username_available("someone_else")
            .await
            .unwrap());

        assert!(!fixture
            .service
            .is_email_available("maria@example.com")
            .await
            .unwrap());
        // Email availability is case insensitive
        assert!(!fixture
            .service
            .is_email_available("Maria@Example.com")
            .await
            .unwrap());
        assert!(fixture
            .service
            .is_email_available("free@example.com")
            .await
            .unwrap());
    }
}
