//! CORS middleware configuration for cross-origin requests.
//!
//! Development gets a permissive policy so local web and mobile clients can
//! talk to the API without ceremony. Production only admits the origins
//! named in the configuration.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use tn_shared::config::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the current environment
pub fn create_cors(config: &CorsConfig) -> Cors {
    if Environment::from_env().is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config)
    }
}

/// Permissive policy for local development
fn create_development_cors(config: &CorsConfig) -> Cors {
    info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        .max_age(config.max_age as usize)
}

/// Allowlist policy for production
fn create_production_cors(config: &CorsConfig) -> Cors {
    info!(
        origins = config.allowed_origins.len(),
        "Configuring CORS for production environment"
    );

    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(config.max_age as usize);

    for origin in &config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_cors_builds() {
        let _cors = create_development_cors(&CorsConfig::default());
    }

    #[test]
    fn test_production_cors_builds_with_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.tradenest.io".to_string()],
            allow_credentials: true,
            ..CorsConfig::default()
        };
        let _cors = create_production_cors(&config);
    }
}
