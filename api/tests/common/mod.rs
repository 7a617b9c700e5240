//! Shared fixture for the HTTP integration tests.
//!
//! Builds the full application on top of the in-memory mock repositories
//! and mailer, so every test exercises the real route tree, middleware
//! stack, and error mapping without external services.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};
use uuid::Uuid;

use tn_api::app::create_app;
use tn_api::middleware::AccessTokenVerifier;
use tn_api::routes::AppState;
use tn_api::uploads::UploadStore;

use tn_core::domain::entities::post::PostWithImages;
use tn_core::domain::entities::user::User;
use tn_core::domain::value_objects::AuthResponse;
use tn_core::repositories::{
    MockConfirmationRepository, MockPostRepository, MockTokenRepository,
    MockTradeRequestRepository, MockUserRepository, UserRepository,
};
use tn_core::services::auth::{AuthService, PasswordHasher, Registration};
use tn_core::services::confirmation::{ConfirmationConfig, ConfirmationService};
use tn_core::services::mail::MockMailer;
use tn_core::services::post::{NewPost, PostService, PostServiceConfig};
use tn_core::services::token::{TokenConfig, TokenService};
use tn_core::services::trade::TradeService;
use tn_core::services::user::UserService;
use tn_shared::config::UploadConfig;

/// Password shared by every seeded account
pub const TEST_PASSWORD: &str = "hunter2hunter2";

/// The application state specialised to the mock implementations
pub type MockAppState = AppState<
    MockUserRepository,
    MockTokenRepository,
    MockConfirmationRepository,
    MockMailer,
    MockPostRepository,
    MockTradeRequestRepository,
>;

/// Everything a test needs: the wired state plus handles on the mocks
pub struct TestContext {
    pub state: web::Data<MockAppState>,
    pub verifier: web::Data<Arc<dyn AccessTokenVerifier>>,
    pub users: Arc<MockUserRepository>,
    pub mailer: Arc<MockMailer>,
    pub upload_dir: PathBuf,
}

impl TestContext {
    /// Context with the default token configuration
    pub fn new() -> Self {
        Self::with_token_config(TokenConfig::default())
    }

    /// Context with a custom token configuration, for expiry tests
    pub fn with_token_config(token_config: TokenConfig) -> Self {
        let users = Arc::new(MockUserRepository::new());
        let confirmations = Arc::new(MockConfirmationRepository::new());
        let posts = Arc::new(MockPostRepository::new());
        let trades = Arc::new(MockTradeRequestRepository::new());
        let mailer = Arc::new(MockMailer::new());

        let token_service = Arc::new(TokenService::new(
            MockTokenRepository::new(),
            token_config,
        ));
        let confirmation_service = Arc::new(ConfirmationService::new(
            confirmations,
            mailer.clone(),
            ConfirmationConfig::default(),
        ));
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            token_service.clone(),
            confirmation_service,
            // Low cost keeps the tests fast
            PasswordHasher::new(4),
        ));
        let user_service = Arc::new(UserService::new(users.clone(), token_service.clone()));

        let upload_dir = std::env::temp_dir().join(format!("tn-http-test-{}", Uuid::new_v4()));
        let upload_config = UploadConfig {
            dir: upload_dir.to_string_lossy().into_owned(),
            public_prefix: "uploads".to_string(),
            max_file_bytes: 64 * 1024,
            max_images_per_post: 3,
        };
        let post_service = Arc::new(PostService::new(
            posts.clone(),
            PostServiceConfig::from(&upload_config),
        ));
        let trade_service = Arc::new(TradeService::new(trades, posts));

        let uploads = UploadStore::new(&upload_config);
        uploads.ensure_dir().expect("upload dir should be creatable");

        let state = web::Data::new(AppState {
            auth_service,
            user_service,
            post_service,
            trade_service,
            uploads,
        });
        let verifier: Arc<dyn AccessTokenVerifier> = token_service;

        Self {
            state,
            verifier: web::Data::new(verifier),
            users,
            mailer,
            upload_dir,
        }
    }

    /// The application under test
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = Error,
            InitError = (),
        >,
    > {
        create_app(self.state.clone(), self.verifier.clone())
    }

    /// Register and activate an account, bypassing the confirmation mail
    pub async fn seeded_user(&self, username: &str, email: &str) -> User {
        let user = self
            .state
            .auth_service
            .register(Registration {
                username: username.to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                first_name: "Maria".to_string(),
                last_name: "Soler".to_string(),
                phone: None,
            })
            .await
            .expect("seed registration should succeed");
        self.users.activate(user.id).await.unwrap();
        self.users.find_by_id(user.id).await.unwrap().unwrap()
    }

    /// Log a seeded account in, returning its token pair
    pub async fn tokens_for(&self, username: &str) -> AuthResponse {
        self.state
            .auth_service
            .login(username, TEST_PASSWORD)
            .await
            .expect("seeded account should be able to log in")
    }

    /// Publish a post without images directly through the service
    pub async fn seeded_post(&self, owner_id: Uuid, title: &str) -> PostWithImages {
        self.state
            .post_service
            .create_post(
                owner_id,
                NewPost {
                    title: title.to_string(),
                    description: "Well kept, pick up only.".to_string(),
                    location: None,
                    images: vec![],
                },
            )
            .await
            .expect("seed post should be accepted")
    }

    /// Raw confirmation token from the nth mail the mock mailer accepted
    pub async fn confirmation_token(&self, index: usize) -> String {
        let sent = self.mailer.sent_messages().await;
        let body = &sent
            .get(index)
            .expect("expected a recorded confirmation mail")
            .body;
        body.lines()
            .find(|line| line.contains("/confirm-email/"))
            .expect("mail should contain a confirmation link")
            .rsplit('/')
            .next()
            .unwrap()
            .trim()
            .to_string()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Bytes posing as a JPEG; the handler only checks the declared mime type
pub const TEST_IMAGE: &[u8] = b"\xFF\xD8\xFF\xE0 not a real jpeg but close enough";

/// Builds `multipart/form-data` request bodies byte by byte
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: format!("test-boundary-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Append a plain text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field with an explicit content type
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the stream, returning the content type header and the body
    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
