use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Environment variable holding the comma-separated allowed origins
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Parses a comma-separated origin list, skipping blank entries.
///
/// Fails on an invalid header value or when no origin remains.
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ALLOWED_ORIGIN} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ALLOWED_ORIGIN} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// Reads and parses `CORS_ALLOWED_ORIGIN`.
///
/// Examples:
/// - Development: `CORS_ALLOWED_ORIGIN=http://localhost:3000,http://localhost:5173`
/// - Production: `CORS_ALLOWED_ORIGIN=https://example.com`
pub fn origins_from_env() -> io::Result<Vec<HeaderValue>> {
    let raw = std::env::var(CORS_ALLOWED_ORIGIN).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{CORS_ALLOWED_ORIGIN} environment variable is required. \
                 Example: {CORS_ALLOWED_ORIGIN}=http://localhost:3000,https://example.com"
            ),
        )
    })?;

    parse_origins(&raw)
}

/// Creates a CORS layer for the users API.
///
/// # Returns
/// A configured `CorsLayer` with:
/// - The given allowed origins
/// - The methods the API serves (GET, POST, PUT, DELETE, OPTIONS)
/// - Content-Type and Accept headers
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" http://localhost:3000, ,https://example.com ").unwrap();
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://example.com"),
            ]
        );
    }

    #[test]
    fn test_parse_origins_rejects_empty() {
        let err = parse_origins(" , ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_parse_origins_rejects_invalid_value() {
        assert!(parse_origins("http://bad\norigin").is_err());
    }

    #[test]
    fn test_origins_from_env_requires_variable() {
        temp_env::with_var_unset(CORS_ALLOWED_ORIGIN, || {
            let err = origins_from_env().unwrap_err();
            assert!(err.to_string().contains(CORS_ALLOWED_ORIGIN));
        });
    }

    #[test]
    fn test_origins_from_env() {
        temp_env::with_var(CORS_ALLOWED_ORIGIN, Some("http://localhost:3000"), || {
            assert_eq!(origins_from_env().unwrap().len(), 1);
        });
    }
}
