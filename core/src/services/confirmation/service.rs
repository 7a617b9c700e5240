//! Email confirmation issuing and consumption.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::confirmation::{EmailConfirmation, CONFIRMATION_TOKEN_LENGTH};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::ConfirmationRepository;
use crate::services::mail::{Mailer, OutboundEmail};

/// Configuration for the confirmation service
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Token time to live in seconds
    pub ttl_seconds: i64,
    /// Base url the confirmation link is built on
    pub public_base_url: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 86400,
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Service issuing and consuming single-use email confirmation tokens
///
/// Only the SHA-256 digest of a token is persisted; the raw value exists
/// solely inside the link mailed to the user. Consumption claims the row
/// atomically, which is what makes each token single use.
pub struct ConfirmationService<C: ConfirmationRepository, M: Mailer> {
    repository: Arc<C>,
    mailer: Arc<M>,
    config: ConfirmationConfig,
}

impl<C: ConfirmationRepository, M: Mailer> ConfirmationService<C, M> {
    /// Create a new confirmation service
    pub fn new(repository: Arc<C>, mailer: Arc<M>, config: ConfirmationConfig) -> Self {
        Self {
            repository,
            mailer,
            config,
        }
    }

    /// Issue a fresh confirmation token for a user and mail the link
    ///
    /// Any previous confirmations for the user are dropped first, so only
    /// the latest link works. If the mail cannot be sent the stored token is
    /// removed again; a token that was never delivered must not stay
    /// claimable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Token stored and mail accepted for delivery
    /// * `Err(DomainError::Mail)` - Mail delivery failed, token removed
    pub async fn issue(&self, user: &User) -> DomainResult<()> {
        self.repository.delete_for_user(user.id).await?;

        let raw_token = generate_token();
        let confirmation = EmailConfirmation::with_ttl(
            user.id,
            hash_token(&raw_token),
            self.config.ttl_seconds,
        );
        self.repository.save(confirmation).await?;

        let email = self.compose_confirmation_mail(user, &raw_token);
        if let Err(reason) = self.mailer.send(&email).await {
            self.repository.delete_for_user(user.id).await?;
            return Err(DomainError::Mail {
                message: format!("Failed to send confirmation mail: {}", reason),
            });
        }

        Ok(())
    }

    /// Consume a raw confirmation token
    ///
    /// # Returns
    ///
    /// * `Ok(EmailConfirmation)` - The claimed confirmation
    /// * `Err(DomainError)` - Token unknown or expired
    pub async fn consume(&self, raw_token: &str) -> DomainResult<EmailConfirmation> {
        let confirmation = self
            .repository
            .consume(&hash_token(raw_token))
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidConfirmationToken))?;

        if confirmation.is_expired() {
            return Err(DomainError::Auth(AuthError::ConfirmationTokenExpired));
        }

        Ok(confirmation)
    }

    fn compose_confirmation_mail(&self, user: &User, raw_token: &str) -> OutboundEmail {
        let link = format!(
            "{}/confirm-email/{}",
            self.config.public_base_url.trim_end_matches('/'),
            raw_token
        );
        let valid_hours = (self.config.ttl_seconds / 3600).max(1);

        let body = format!(
            "Hi {},\n\n\
             Welcome to TradeNest! Please confirm your email address by visiting:\n\n\
             {}\n\n\
             The link is valid for {} hours. If you did not create this account,\n\
             you can ignore this message.\n\n\
             The TradeNest team",
            user.first_name, link, valid_hours
        );

        OutboundEmail::new(
            user.email.clone(),
            user.display_name(),
            "Confirm your TradeNest account",
            body,
        )
    }
}

/// Generate a raw confirmation token
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a raw token for storage and lookup
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockConfirmationRepository;
    use crate::services::mail::MockMailer;

    fn sample_user() -> User {
        User::new(
            "maria_92".to_string(),
            "maria@example.com".to_string(),
            "$2b$12$hash".to_string(),
            "Maria".to_string(),
            "Soler".to_string(),
            None,
        )
    }

    fn service(
        repository: Arc<MockConfirmationRepository>,
        mailer: Arc<MockMailer>,
    ) -> ConfirmationService<MockConfirmationRepository, MockMailer> {
        ConfirmationService::new(repository, mailer, ConfirmationConfig::default())
    }

    fn token_from_mail(body: &str) -> String {
        let link = body
            .lines()
            .find(|line| line.contains("/confirm-email/"))
            .expect("mail should contain a confirmation link");
        link.rsplit('/').next().unwrap().trim().to_string()
    }

    #[tokio::test]
    async fn test_issue_then_consume() {
        let repository = Arc::new(MockConfirmationRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let service = service(repository.clone(), mailer.clone());
        let user = sample_user();

        service.issue(&user).await.unwrap();

        let sent = mailer.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "maria@example.com");

        let raw_token = token_from_mail(&sent[0].body);
        assert_eq!(raw_token.len(), CONFIRMATION_TOKEN_LENGTH);

        let claimed = service.consume(&raw_token).await.unwrap();
        assert_eq!(claimed.user_id, user.id);

        // Second consumption fails; the token is single use
        let reuse = service.consume(&raw_token).await;
        assert!(matches!(
            reuse,
            Err(DomainError::Auth(AuthError::InvalidConfirmationToken))
        ));
    }

    #[tokio::test]
    async fn test_issue_replaces_previous_token() {
        let repository = Arc::new(MockConfirmationRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let service = service(repository.clone(), mailer.clone());
        let user = sample_user();

        service.issue(&user).await.unwrap();
        service.issue(&user).await.unwrap();

        let sent = mailer.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(repository.len().await, 1);

        // Only the latest link works
        let old_token = token_from_mail(&sent[0].body);
        let new_token = token_from_mail(&sent[1].body);
        assert!(service.consume(&old_token).await.is_err());
        assert!(service.consume(&new_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_mail_failure_removes_stored_token() {
        let repository = Arc::new(MockConfirmationRepository::new());
        let mailer = Arc::new(MockMailer::failing());
        let service = service(repository.clone(), mailer);
        let user = sample_user();

        let result = service.issue(&user).await;
        assert!(matches!(result, Err(DomainError::Mail { .. })));
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_and_gone() {
        let repository = Arc::new(MockConfirmationRepository::new());
        let mailer = Arc::new(MockMailer::new());
        let user = sample_user();
        let service = ConfirmationService::new(
            repository.clone(),
            mailer.clone(),
            ConfirmationConfig {
                ttl_seconds: -1,
                ..ConfirmationConfig::default()
            },
        );

        service.issue(&user).await.unwrap();
        let sent = mailer.sent_messages().await;
        let raw_token = token_from_mail(&sent[0].body);

        let result = service.consume(&raw_token).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::ConfirmationTokenExpired))
        ));

        // The expired token was still claimed
        assert!(repository.is_empty().await);
    }
}
