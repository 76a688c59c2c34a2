//! HTTP Basic-auth gate for the API.
//!
//! The ledger is a single-user tool; this is the login screen's placeholder
//! credential pair, not a security boundary. Credentials are checked against
//! a configured username and argon2 PHC hash.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Verify credentials directly from headers.
pub fn verify_basic(headers: &HeaderMap, config: &AuthConfig) -> bool {
  let Some(header_val) = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };

  let Some(encoded) = header_val.strip_prefix("Basic ") else {
    return false;
  };
  let Ok(decoded) = B64.decode(encoded) else {
    return false;
  };
  let Ok(creds) = std::str::from_utf8(&decoded) else {
    return false;
  };
  let Some((username, password)) = creds.split_once(':') else {
    return false;
  };

  if username != config.username {
    return false;
  }

  let Ok(parsed_hash) = PasswordHash::new(&config.password_hash) else {
    return false;
  };

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .is_ok()
}

/// Middleware applied to every `/api` route.
pub async fn require_basic_auth(
  State(config): State<Arc<AuthConfig>>,
  request: Request,
  next: Next,
) -> Response {
  if verify_basic(request.headers(), &config) {
    return next.run(request).await;
  }

  (
    StatusCode::UNAUTHORIZED,
    [(header::WWW_AUTHENTICATE, "Basic realm=\"simledger\"")],
  )
    .into_response()
}
