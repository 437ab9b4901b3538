// SPDX-License-Identifier: Apache-2.0

//! Identity provider port: resolves a request's bearer token to a user.

use async_trait::async_trait;
use bazaar_model::User;
use bazaar_store::{Store, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Header carrying the caller's bearer token.
pub const SESSION_TOKEN_HEADER: &str = "x-bazaar-token";

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn resolve(&self, token: &str) -> Result<Option<User>, StoreError>;
}

/// Production identity provider backed by the `users` table.
pub struct StoreIdentity {
    store: Arc<Store>,
}

impl StoreIdentity {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityProvider for StoreIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<User>, StoreError> {
        self.store.user_by_token(token.to_string()).await
    }
}

/// In-memory identity double for tests.
#[derive(Default)]
pub struct FakeIdentity {
    pub users: Mutex<HashMap<String, User>>,
}

impl FakeIdentity {
    pub async fn insert(&self, token: &str, user: User) {
        self.users.lock().await.insert(token.to_string(), user);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_model::UserId;

    #[tokio::test]
    async fn fake_identity_resolves_only_known_tokens() {
        let fake = FakeIdentity::default();
        fake.insert(
            "tok-1",
            User::new(UserId::new(1).expect("id"), "a".into(), "A".into()),
        )
        .await;

        let hit = fake.resolve("tok-1").await.expect("resolve");
        assert_eq!(hit.map(|u| u.username), Some("a".to_string()));
        assert!(fake.resolve("tok-2").await.expect("resolve").is_none());
    }
}
