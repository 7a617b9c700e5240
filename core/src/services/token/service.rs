//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenConfig;

/// Length of the opaque refresh token handed to the client
const REFRESH_TOKEN_LENGTH: usize = 32;

/// Service for managing JWT access tokens and opaque refresh tokens
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `config` - Token service configuration
    pub fn new(repository: R, config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generates a new token pair (access + refresh tokens) for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(DomainError)` - Token generation failed
    pub async fn generate_tokens(&self, user_id: Uuid) -> Result<TokenPair, DomainError> {
        let access_token = self.generate_access_token(user_id)?;
        let refresh_token = self.generate_refresh_token(user_id).await?;

        Ok(TokenPair::with_expiries(
            access_token,
            refresh_token,
            self.config.access_token_expiry,
            self.config.refresh_token_expiry,
        ))
    }

    /// Generates an access token
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        let claims = Claims::with_ttl(user_id, self.config.access_token_expiry);
        self.encode_jwt(&claims)
    }

    /// Generates a refresh token and stores its hash
    async fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        // Generate a random alphanumeric token string
        let mut rng = rand::thread_rng();
        let token_string: String = (0..REFRESH_TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..62);
                match idx {
                    0..10 => (b'0' + idx) as char,
                    10..36 => (b'a' + idx - 10) as char,
                    36..62 => (b'A' + idx - 36) as char,
                    _ => unreachable!(),
                }
            })
            .collect();

        // Only the hash is persisted
        let token_hash = self.hash_token(&token_string);
        let refresh_token =
            RefreshToken::with_ttl(user_id, token_hash, self.config.refresh_token_expiry);

        self.repository
            .save_refresh_token(refresh_token)
            .await
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(token_string)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT access token to verify
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - Token is invalid, expired, or malformed
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else if e.kind() == &jsonwebtoken::errors::ErrorKind::ImmatureSignature {
                    DomainError::Token(TokenError::TokenNotYetValid)
                } else {
                    DomainError::Token(TokenError::InvalidTokenFormat)
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verifies a refresh token and returns the user ID
    ///
    /// # Arguments
    ///
    /// * `token` - The refresh token to verify
    ///
    /// # Returns
    ///
    /// * `Ok(Uuid)` - The user ID if token is valid
    /// * `Err(DomainError)` - Token is unknown, expired, or revoked
    pub async fn verify_refresh_token(&self, token: &str) -> Result<Uuid, DomainError> {
        let token_hash = self.hash_token(token);

        let refresh_token = self
            .repository
            .find_refresh_token(&token_hash)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if refresh_token.is_expired() {
            return Err(DomainError::Token(TokenError::RefreshTokenExpired));
        }

        if refresh_token.is_revoked {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        Ok(refresh_token.user_id)
    }

    /// Refreshes tokens using a refresh token, rotating the refresh token
    ///
    /// The old refresh token is revoked once the new pair exists; a stolen
    /// token therefore stops working the moment its owner refreshes.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token presented by the client
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New token pair
    /// * `Err(DomainError)` - Refresh failed
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let user_id = self.verify_refresh_token(refresh_token).await?;

        let access_token = self.generate_access_token(user_id)?;
        let new_refresh_token = self.generate_refresh_token(user_id).await?;

        let token_hash = self.hash_token(refresh_token);
        let _ = self.repository.revoke_token(&token_hash).await;

        Ok(TokenPair::with_expiries(
            access_token,
            new_refresh_token,
            self.config.access_token_expiry,
            self.config.refresh_token_expiry,
        ))
    }

    /// Revokes a specific refresh token
    ///
    /// # Arguments
    ///
    /// * `token` - The raw refresh token to revoke
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - True if the token was revoked, false if not found
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<bool, DomainError> {
        let token_hash = self.hash_token(token);
        self.repository.revoke_token(&token_hash).await
    }

    /// Revokes all tokens for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens revoked
    pub async fn revoke_all_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.repository.revoke_all_user_tokens(user_id).await
    }

    /// Removes expired tokens from storage
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens cleaned up
    pub async fn cleanup_expired_tokens(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired_tokens().await
    }

    /// Hashes a token for storage
    pub(crate) fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
