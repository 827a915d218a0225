//! # Results Password Gate
//!
//! Shared-secret check in front of the results views.
//!
//! ## Configuration
//!
//! The secret comes from `[general] password` or `AIIQ_PASSWORD`. When no
//! secret is configured every gated request is refused.
//!
//! ## Usage
//!
//! ```text
//! Authorization: Bearer <password>
//! ```
//!
//! The raw password without the `Bearer ` prefix is accepted as well.
//!
//! This is a static secret comparison, not an authentication system. Put a
//! real identity provider in front of the server for anything sensitive.

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::{Choice, ConstantTimeEq};

// =============================================================================
// SECRET COMPARISON
// =============================================================================

/// Constant-time password comparison.
///
/// Every byte position up to the longer input is compared, missing bytes
/// count as zero, so the running time depends only on the longer length.
#[must_use]
pub fn password_matches(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    let span = provided.len().max(expected.len());

    let same_bytes = (0..span).fold(Choice::from(1u8), |acc, i| {
        let a = provided.get(i).copied().unwrap_or(0);
        let b = expected.get(i).copied().unwrap_or(0);
        acc & a.ct_eq(&b)
    });
    let same_len = (provided.len() as u64).ct_eq(&(expected.len() as u64));

    (same_bytes & same_len).into()
}

/// Password from the `Authorization` header, `Bearer ` prefix optional.
fn provided_password(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

fn reject(reason: &'static str, path: &str) -> (StatusCode, &'static str) {
    tracing::warn!(event = "auth_failure", reason, path, "Results access refused");
    (StatusCode::UNAUTHORIZED, "Unauthorized")
}

// =============================================================================
// GATE MIDDLEWARE
// =============================================================================

/// Password gate for the results routes.
pub async fn password_gate(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let path = request.uri().path().to_owned();

    let Some(expected) = state.password.as_deref() else {
        return Err(reject("no_password_configured", &path));
    };
    let Some(provided) = provided_password(&request) else {
        return Err(reject("missing_authorization_header", &path));
    };
    if !password_matches(provided, expected) {
        return Err(reject("invalid_password", &path));
    }

    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_password() {
        assert!(password_matches("s3cret", "s3cret"));
    }

    #[test]
    fn prefix_is_not_a_match() {
        assert!(!password_matches("s3c", "s3cret"));
        assert!(!password_matches("s3cret!", "s3cret"));
    }

    #[test]
    fn trailing_nul_is_not_a_match() {
        assert!(!password_matches("s3cret\0", "s3cret"));
    }

    #[test]
    fn empty_never_matches_non_empty() {
        assert!(!password_matches("", "s3cret"));
    }
}
