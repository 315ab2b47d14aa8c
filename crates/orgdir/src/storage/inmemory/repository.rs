//! In-memory repository implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use orgdir_core::organisation::Organisation;
use orgdir_core::storage::{OrganisationRepository, RepositoryError, Result, UserRepository};
use orgdir_core::user::User;

/// In-memory storage backend.
///
/// Enforces the same constraints as the SQLite schema: unique organisation
/// names and slugs, unique emails per organisation, users only under an
/// existing organisation, and cascading deletes.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    organisations: Arc<RwLock<HashMap<Uuid, Organisation>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            organisations: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OrganisationRepository for InMemoryRepository {
    async fn organisation_exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.organisations.read().await.contains_key(&id))
    }

    async fn get_organisations(&self) -> Result<Vec<Organisation>> {
        let organisations = self.organisations.read().await;
        let mut all: Vec<Organisation> = organisations.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_organisation_ids(&self) -> Result<HashSet<Uuid>> {
        Ok(self.organisations.read().await.keys().copied().collect())
    }

    async fn get_organisation(&self, id: Uuid) -> Result<Option<Organisation>> {
        Ok(self.organisations.read().await.get(&id).cloned())
    }

    async fn get_organisation_by_slug(&self, slug: &str) -> Result<Option<Organisation>> {
        let organisations = self.organisations.read().await;
        Ok(organisations.values().find(|o| o.slug == slug).cloned())
    }

    async fn get_organisation_by_name(&self, name: &str) -> Result<Option<Organisation>> {
        let organisations = self.organisations.read().await;
        Ok(organisations.values().find(|o| o.name == name).cloned())
    }

    async fn upsert_organisation(&self, organisation: &Organisation) -> Result<()> {
        let mut organisations = self.organisations.write().await;
        let clash = organisations.values().any(|o| {
            o.id != organisation.id && (o.name == organisation.name || o.slug == organisation.slug)
        });
        if clash {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Organisation",
                id: organisation.name.clone(),
            });
        }
        organisations.insert(organisation.id, organisation.clone());
        Ok(())
    }

    async fn delete_organisation(&self, id: Uuid) -> Result<()> {
        let mut organisations = self.organisations.write().await;
        if organisations.remove(&id).is_none() {
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
impl UserRepository for InMemoryRepository {
    async fn get_users(&self, organisation_id: Uuid) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut found: Vec<User> = users
            .values()
            .filter(|u| u.organisation_id == organisation_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.created_at)
                .cmp(&(&b.last_name, &b.first_name, b.created_at))
        });
        Ok(found)
    }

    async fn get_user_ids(&self, organisation_id: Uuid) -> Result<HashSet<Uuid>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.organisation_id == organisation_id)
            .map(|u| u.id)
            .collect())
    }

    async fn get_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .filter(|u| u.organisation_id == organisation_id)
            .cloned())
    }

    async fn get_user_by_email(
        &self,
        organisation_id: Uuid,
        email: &str,
    ) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.organisation_id == organisation_id && u.email == email)
            .cloned())
    }

    async fn user_exists(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.get_user(organisation_id, user_id).await?.is_some())
    }

    async fn user_email_is_available(&self, organisation_id: Uuid, email: &str) -> Result<bool> {
        Ok(self
            .get_user_by_email(organisation_id, email)
            .await?
            .is_none())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let organisations = self.organisations.read().await;
        if !organisations.contains_key(&user.organisation_id) {
            return Err(RepositoryError::InvalidData(
                "Foreign key constraint violation for User".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        let clash = users.values().any(|u| {
            u.id != user.id && u.organisation_id == user.organisation_id && u.email == user.email
        });
        if clash {
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
