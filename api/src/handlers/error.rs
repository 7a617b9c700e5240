//! Mapping from domain errors to HTTP responses.
//!
//! Every route handler funnels its `Err` branch through
//! [`handle_domain_error`], so status codes and error codes stay uniform
//! across the API. Internal detail (database, mail transport) is logged
//! here and never leaks into a response body.

use actix_web::HttpResponse;
use tracing::error;
use validator::ValidationErrors;

use tn_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use tn_shared::errors::{error_codes, ErrorResponse};

use crate::uploads::UploadError;

/// Convert a domain error into its HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => handle_auth_error(auth_error),
        DomainError::Token(token_error) => handle_token_error(token_error),
        DomainError::ValidationErr(validation_error) => {
            handle_validation_error(validation_error)
        }
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message)),
        DomainError::BusinessRule { message } => HttpResponse::Conflict().json(
            ErrorResponse::new(error_codes::BUSINESS_RULE_VIOLATION, message),
        ),
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(
            ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource)),
        ),
        DomainError::Unauthorized => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required"),
        ),
        DomainError::Database { message } => {
            error!(detail = %message, "database error");
            internal_error()
        }
        DomainError::Internal { message } => {
            error!(detail = %message, "internal error");
            internal_error()
        }
        DomainError::Mail { message } => {
            error!(detail = %message, "mail delivery error");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::MAIL_ERROR,
                "The mail could not be sent",
            ))
        }
    }
}

fn handle_auth_error(error: AuthError) -> HttpResponse {
    match error {
        AuthError::UserNotFound => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            "User not found",
        )),
        AuthError::UsernameTaken => HttpResponse::Conflict().json(ErrorResponse::new(
            error_codes::USERNAME_TAKEN,
            "Username is already taken",
        )),
        AuthError::EmailTaken => HttpResponse::Conflict().json(ErrorResponse::new(
            error_codes::EMAIL_TAKEN,
            "Email is already registered",
        )),
        AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid username or password"),
        ),
        AuthError::AccountNotConfirmed => HttpResponse::Forbidden().json(ErrorResponse::new(
            error_codes::ACCOUNT_NOT_CONFIRMED,
            "Account has not been confirmed yet",
        )),
        AuthError::AccountDisabled => HttpResponse::Forbidden().json(ErrorResponse::new(
            error_codes::ACCOUNT_DISABLED,
            "Account has been disabled",
        )),
        AuthError::InsufficientPermissions => HttpResponse::Forbidden().json(
            ErrorResponse::new(error_codes::FORBIDDEN, "Insufficient permissions"),
        ),
        AuthError::InvalidConfirmationToken => HttpResponse::BadRequest().json(
            ErrorResponse::new(
                error_codes::CONFIRMATION_TOKEN_INVALID,
                "Confirmation link is invalid or has already been used",
            ),
        ),
        AuthError::ConfirmationTokenExpired => HttpResponse::BadRequest().json(
            ErrorResponse::new(
                error_codes::CONFIRMATION_TOKEN_INVALID,
                "Confirmation link has expired",
            ),
        ),
    }
}

fn handle_token_error(error: TokenError) -> HttpResponse {
    match error {
        TokenError::TokenExpired => HttpResponse::Unauthorized().json(ErrorResponse::new(
            error_codes::TOKEN_EXPIRED,
            "Token has expired",
        )),
        TokenError::RefreshTokenExpired => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Refresh token has expired"),
        ),
        TokenError::InvalidTokenFormat
        | TokenError::InvalidSignature
        | TokenError::TokenNotYetValid
        | TokenError::InvalidClaims
        | TokenError::InvalidRefreshToken => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::TOKEN_INVALID, "Token is invalid"),
        ),
        TokenError::TokenRevoked => HttpResponse::Unauthorized().json(ErrorResponse::new(
            error_codes::TOKEN_INVALID,
            "Token has been revoked",
        )),
        TokenError::MissingClaim { claim } => HttpResponse::Unauthorized().json(
            ErrorResponse::new(
                error_codes::TOKEN_INVALID,
                format!("Token is missing the {} claim", claim),
            ),
        ),
        TokenError::TokenGenerationFailed => {
            error!("token generation failed");
            internal_error()
        }
    }
}

fn handle_validation_error(error: ValidationError) -> HttpResponse {
    match error {
        ValidationError::DuplicateValue { field } => HttpResponse::Conflict().json(
            ErrorResponse::new(
                error_codes::CONFLICT,
                format!("Duplicate value for {}", field),
            ),
        ),
        ValidationError::BusinessRuleViolation { rule } => HttpResponse::Conflict().json(
            ErrorResponse::new(error_codes::BUSINESS_RULE_VIOLATION, rule),
        ),
        other => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::VALIDATION_ERROR,
            other.to_string(),
        )),
    }
}

/// Convert `validator` derive failures into a 400 with per-field detail
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        "Request validation failed",
    );
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }
    HttpResponse::BadRequest().json(response)
}

/// Convert an upload failure into its HTTP response
pub fn handle_upload_error(error: UploadError) -> HttpResponse {
    match error {
        UploadError::TooLarge { limit } => HttpResponse::PayloadTooLarge().json(
            ErrorResponse::new(
                error_codes::UPLOAD_ERROR,
                format!("File exceeds the {} byte upload limit", limit),
            ),
        ),
        UploadError::NotAnImage => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::UPLOAD_ERROR,
            "Only image uploads are accepted",
        )),
        UploadError::Stream(message) => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::UPLOAD_ERROR,
            format!("Upload could not be read: {}", message),
        )),
        UploadError::Io(io_error) => {
            error!(detail = %io_error, "upload write failed");
            internal_error()
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal server error occurred",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_conflicts_map_to_409() {
        let taken = handle_domain_error(DomainError::Auth(AuthError::UsernameTaken));
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let rule = handle_domain_error(DomainError::BusinessRule {
            message: "A pending request for this post already exists".to_string(),
        });
        assert_eq!(rule.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_login_ladder_statuses() {
        let unknown = handle_domain_error(DomainError::Auth(AuthError::UserNotFound));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let wrong_password =
            handle_domain_error(DomainError::Auth(AuthError::InvalidCredentials));
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

        let disabled = handle_domain_error(DomainError::Auth(AuthError::AccountDisabled));
        assert_eq!(disabled.status(), StatusCode::FORBIDDEN);

        let unconfirmed =
            handle_domain_error(DomainError::Auth(AuthError::AccountNotConfirmed));
        assert_eq!(unconfirmed.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        for error in [
            TokenError::TokenExpired,
            TokenError::InvalidSignature,
            TokenError::TokenRevoked,
            TokenError::InvalidRefreshToken,
        ] {
            let response = handle_domain_error(DomainError::Token(error));
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_infrastructure_detail_is_not_leaked() {
        let response = handle_domain_error(DomainError::Database {
            message: "connection refused at 10.0.0.5:3306".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
