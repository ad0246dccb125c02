//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::caller::CallerIdentity;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The server and the
/// admin CLI both use this function, so tokens issued by one verify in the
/// other as long as they share the secret.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service resolving Bearer tokens into a [`CallerIdentity`].
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// lookup. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns the identity it was issued for.
    ///
    /// On success the token's `last_used_at` is touched; a failure to do so
    /// is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(stored) = self.repository.find_active(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(token_id = stored.id, error = %e, "failed to update token usage");
        }

        Ok(CallerIdentity {
            account_id: stored.account_id,
            is_admin: stored.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{ApiToken, MockTokenRepository};
    use chrono::Utc;
    use uuid::Uuid;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn stored_token(account_id: Uuid, is_admin: bool) -> ApiToken {
        ApiToken {
            id: 7,
            name: "reporting".to_string(),
            token_hash: hash_token(&test_secret(), "valid-token"),
            account_id,
            is_admin,
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_returns_identity() {
        let mut mock_repo = MockTokenRepository::new();
        let account = Uuid::new_v4();
        let expected_hash = hash_token(&test_secret(), "valid-token");

        mock_repo
            .expect_find_active()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(move |_| Ok(Some(stored_token(account, false))));

        mock_repo
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let caller = service.authenticate("valid-token").await.unwrap();

        assert_eq!(caller, CallerIdentity::account(account));
    }

    #[tokio::test]
    async fn test_admin_flag_comes_from_token() {
        let mut mock_repo = MockTokenRepository::new();
        let account = Uuid::new_v4();

        mock_repo
            .expect_find_active()
            .returning(move |_| Ok(Some(stored_token(account, true))));
        mock_repo.expect_update_last_used().returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let caller = service.authenticate("valid-token").await.unwrap();

        assert!(caller.is_admin);
        assert_eq!(caller.scope(), None);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockTokenRepository::new();

        mock_repo
            .expect_find_active()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_usage_update_failure_is_ignored() {
        let mut mock_repo = MockTokenRepository::new();
        let account = Uuid::new_v4();

        mock_repo
            .expect_find_active()
            .returning(move |_| Ok(Some(stored_token(account, false))));
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        assert!(service.authenticate("valid-token").await.is_ok());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token(&test_secret(), "test-token");
        let hash2 = hash_token(&test_secret(), "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_token_different_inputs() {
        assert_ne!(
            hash_token(&test_secret(), "token1"),
            hash_token(&test_secret(), "token2")
        );
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
    }
}
