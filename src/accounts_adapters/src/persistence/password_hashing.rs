use std::sync::LazyLock;

use accounts_core::Password;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};

/// Hash checked when a login names an unknown user, so that the miss costs
/// as much as a wrong password.
static DUMMY_PASSWORD_HASH: LazyLock<Result<String, String>> =
    LazyLock::new(|| hash(b"not-a-real-password"));

fn hasher() -> Result<Argon2<'static>, String> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
    ))
}

fn hash(password: &[u8]) -> Result<String, String> {
    let salt: SaltString = SaltString::generate(rand_core::OsRng);
    hasher()?
        .hash_password(password, &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

fn verify(expected_password_hash: &str, password_candidate: &[u8]) -> Result<(), String> {
    let expected_password_hash: PasswordHash<'_> =
        PasswordHash::new(expected_password_hash).map_err(|e| e.to_string())?;

    hasher()?
        .verify_password(password_candidate, &expected_password_hash)
        .map_err(|e| e.to_string())
}

#[tracing::instrument(name = "Computing password hash", skip_all)]
pub async fn compute_password_hash(password: Password) -> Result<Secret<String>, String> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            hash(password.as_ref().expose_secret().as_bytes()).map(Secret::from)
        })
    })
    .await
    .map_err(|e| e.to_string())?
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
pub async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Password,
) -> Result<(), String> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            verify(
                expected_password_hash.expose_secret(),
                password_candidate.as_ref().expose_secret().as_bytes(),
            )
        })
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Spend one verification on a throwaway hash. The outcome is irrelevant.
#[tracing::instrument(name = "Verify dummy password hash", skip_all)]
pub async fn verify_dummy_password_hash(password_candidate: Password) {
    let current_span: tracing::Span = tracing::Span::current();

    let _ = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| match DUMMY_PASSWORD_HASH.as_ref() {
            Ok(dummy) => {
                let _ = verify(dummy, password_candidate.as_ref().expose_secret().as_bytes());
            }
            Err(e) => tracing::error!(error = %e, "Failed to compute dummy password hash"),
        })
    })
    .await;
}
