use ads_reporting::domain::repositories::{NewApiToken, TokenRepository};
use ads_reporting::infrastructure::persistence::PgTokenRepository;
use ads_reporting::AppError;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

fn new_token(name: &str, hash: &str) -> NewApiToken {
    NewApiToken {
        name: name.to_string(),
        token_hash: hash.to_string(),
        account_id: Uuid::from_u128(42),
        is_admin: false,
    }
}

#[sqlx::test]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token(NewApiToken {
            is_admin: true,
            ..new_token("test-token", "hash123")
        })
        .await
        .unwrap();

    assert_eq!(token.name, "test-token");
    assert_eq!(token.token_hash, "hash123");
    assert_eq!(token.account_id, Uuid::from_u128(42));
    assert!(token.is_admin);
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
async fn test_duplicate_hash_is_conflict(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(new_token("first", "samehash")).await.unwrap();
    let result = repo.create_token(new_token("second", "samehash")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_find_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(new_token("valid-token", "validhash"))
        .await
        .unwrap();

    let found = repo.find_active("validhash").await.unwrap();
    assert_eq!(found.unwrap().name, "valid-token");

    assert!(repo.find_active("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoked_token_is_not_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token(new_token("revoked-token", "revokedhash"))
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active("revokedhash").await.unwrap().is_none());

    let stored = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(stored.revoked_at.is_some());
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    let token = repo
        .create_token(new_token("update-token", "updatehash"))
        .await
        .unwrap();

    repo.update_last_used("updatehash").await.unwrap();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE id = $1")
            .bind(token.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(last_used.is_some());
}

#[sqlx::test]
async fn test_list_tokens(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    for i in 1..=3 {
        repo.create_token(new_token(&format!("token{i}"), &format!("hash{i}")))
            .await
            .unwrap();
    }

    let tokens = repo.list_tokens().await.unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].name, "token3");
}

#[sqlx::test]
async fn test_find_by_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(new_token("unique-name", "namehash"))
        .await
        .unwrap();

    let token = repo.find_by_name("unique-name").await.unwrap();
    assert_eq!(token.unwrap().token_hash, "namehash");

    assert!(repo.find_by_name("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoke_already_revoked(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token(new_token("double-revoke", "doublehash"))
        .await
        .unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let result = repo.revoke_token(token.id).await;

    assert!(result.is_ok());
}
