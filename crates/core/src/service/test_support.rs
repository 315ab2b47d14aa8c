//! Hand-written port doubles shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::{Cache, CacheError, Result as CacheResult};
use crate::organisation::Organisation;
use crate::storage::{OrganisationRepository, RepositoryError, Result, UserRepository};
use crate::user::User;

/// In-memory cache that counts calls.
#[derive(Default)]
pub(crate) struct MockCache {
    store: RwLock<HashMap<String, HashSet<String>>>,
    pub get_calls: AtomicUsize,
    pub store_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self, key: &str) -> Option<HashSet<String>> {
        self.store.read().await.get(key).cloned()
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn store_set(&self, key: &str, values: &HashSet<String>) -> CacheResult<()> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if values.is_empty() {
            return Ok(());
        }
        self.store
            .write()
            .await
            .insert(key.to_string(), values.clone());
        Ok(())
    }

    async fn get_set(&self, key: &str) -> CacheResult<Option<HashSet<String>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn delete_key(&self, key: &str) -> CacheResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.store.write().await.remove(key);
        Ok(())
    }
}

/// Cache whose backend is unreachable.
pub(crate) struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn store_set(&self, _key: &str, _values: &HashSet<String>) -> CacheResult<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn get_set(&self, _key: &str) -> CacheResult<Option<HashSet<String>>> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn delete_key(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::OperationFailed("READONLY".to_string()))
    }
}

/// Cache that never answers in time.
pub(crate) struct HangingCache;

impl HangingCache {
    async fn hang() {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

#[async_trait]
impl Cache for HangingCache {
    async fn store_set(&self, _key: &str, _values: &HashSet<String>) -> CacheResult<()> {
        Self::hang().await;
        Ok(())
    }

    async fn get_set(&self, _key: &str) -> CacheResult<Option<HashSet<String>>> {
        Self::hang().await;
        Ok(None)
    }

    async fn delete_key(&self, _key: &str) -> CacheResult<()> {
        Self::hang().await;
        Ok(())
    }
}

/// Repository implementing both ports over shared maps, so that deleting an
/// organisation can cascade to its users.
#[derive(Default)]
pub(crate) struct MockRepository {
    organisations: RwLock<HashMap<Uuid, Organisation>>,
    users: RwLock<HashMap<Uuid, User>>,
    pub organisation_ids_calls: AtomicUsize,
    pub user_ids_calls: AtomicUsize,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an organisation without going through the service.
    pub async fn remove_organisation_behind_cache(&self, id: Uuid) {
        self.organisations.write().await.remove(&id);
    }

    pub async fn stored_organisation(&self, id: Uuid) -> Option<Organisation> {
        self.organisations.read().await.get(&id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl OrganisationRepository for MockRepository {
    async fn organisation_exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.organisations.read().await.contains_key(&id))
    }

    async fn get_organisations(&self) -> Result<Vec<Organisation>> {
        let mut organisations: Vec<_> = self.organisations.read().await.values().cloned().collect();
        organisations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(organisations)
    }

    async fn get_organisation_ids(&self) -> Result<HashSet<Uuid>> {
        self.organisation_ids_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.organisations.read().await.keys().copied().collect())
    }

    async fn get_organisation(&self, id: Uuid) -> Result<Option<Organisation>> {
        Ok(self.organisations.read().await.get(&id).cloned())
    }

    async fn get_organisation_by_slug(&self, slug: &str) -> Result<Option<Organisation>> {
        Ok(self
            .organisations
            .read()
            .await
            .values()
            .find(|o| o.slug == slug)
            .cloned())
    }

    async fn get_organisation_by_name(&self, name: &str) -> Result<Option<Organisation>> {
        Ok(self
            .organisations
            .read()
            .await
            .values()
            .find(|o| o.name == name)
            .cloned())
    }

    async fn upsert_organisation(&self, organisation: &Organisation) -> Result<()> {
        let mut organisations = self.organisations.write().await;
        let conflict = organisations.values().any(|o| {
            o.id != organisation.id && (o.slug == organisation.slug || o.name == organisation.name)
        });
        if conflict {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Organisation",
                id: organisation.slug.clone(),
            });
        }
        organisations.insert(organisation.id, organisation.clone());
        Ok(())
    }

    async fn delete_organisation(&self, id: Uuid) -> Result<()> {
        if self.organisations.write().await.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Organisation",
                id: id.to_string(),
            });
        }
        self.users
            .write()
            .await
            .retain(|_, user| user.organisation_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockRepository {
    async fn get_users(&self, organisation_id: Uuid) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.organisation_id == organisation_id)
            .cloned()
            .collect())
    }

    async fn get_user_ids(&self, organisation_id: Uuid) -> Result<HashSet<Uuid>> {
        self.user_ids_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.organisation_id == organisation_id)
            .map(|u| u.id)
            .collect())
    }

    async fn get_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .filter(|u| u.organisation_id == organisation_id)
            .cloned())
    }

    async fn get_user_by_email(
        &self,
        organisation_id: Uuid,
        email: &str,
    ) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.organisation_id == organisation_id && u.email == email)
            .cloned())
    }

    async fn user_exists(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.get_user(organisation_id, user_id).await?.is_some())
    }

    async fn user_email_is_available(&self, organisation_id: Uuid, email: &str) -> Result<bool> {
        Ok(self.get_user_by_email(organisation_id, email).await?.is_none())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        let conflict = users.values().any(|u| {
            u.id != user.id && u.organisation_id == user.organisation_id && u.email == user.email
        });
        if conflict {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get(&user_id) {
            Some(user) if user.organisation_id == organisation_id => {
                users.remove(&user_id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user_id.to_string(),
            }),
        }
    }
}
