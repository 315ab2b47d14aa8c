use std::sync::Arc;

use uuid::Uuid;

use crate::cache::CacheKeyManager;
use crate::storage::UserRepository;
use crate::user::{CreateUser, UpdateUser, User};

use super::{IdSetCache, OrganisationService, Result, ServiceError};

/// User use cases. Every operation first checks that the organisation exists.
pub struct UserService {
    organisations: Arc<OrganisationService>,
    repository: Arc<dyn UserRepository>,
    cache: IdSetCache,
    keys: CacheKeyManager,
}

impl UserService {
    pub fn new(
        organisations: Arc<OrganisationService>,
        repository: Arc<dyn UserRepository>,
        cache: IdSetCache,
        keys: CacheKeyManager,
    ) -> Self {
        Self {
            organisations,
            repository,
            cache,
            keys,
        }
    }

    /// Returns `NotFound` unless the organisation has a user with this ID.
    ///
    /// Does not check the organisation itself.
    pub async fn ensure_user_exists(&self, organisation_id: Uuid, user_id: Uuid) -> Result<()> {
        let key = self.keys.user_ids_key(organisation_id);
        let repository = &self.repository;
        let exists = self
            .cache
            .contains(&key, user_id, || repository.get_user_ids(organisation_id))
            .await?;

        if exists {
            Ok(())
        } else {
            Err(ServiceError::user_not_found(user_id))
        }
    }

    pub async fn get_users(&self, organisation_id: Uuid) -> Result<Vec<User>> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        Ok(self.repository.get_users(organisation_id).await?)
    }

    pub async fn get_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<User> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        self.find_user(organisation_id, user_id).await
    }

    /// Returns true if no user of the organisation uses `email`.
    pub async fn email_is_available(&self, organisation_id: Uuid, email: &str) -> Result<bool> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        Ok(self
            .repository
            .user_email_is_available(organisation_id, email)
            .await?)
    }

    /// Creates a user inside the organisation and returns its ID.
    pub async fn add_user(&self, organisation_id: Uuid, request: CreateUser) -> Result<Uuid> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        self.ensure_email_is_free(organisation_id, &request.email)
            .await?;

        let user = User::create_new(
            organisation_id,
            request.first_name,
            request.last_name,
            request.email,
            request.is_active,
        )?;
        self.repository.upsert_user(&user).await?;
        self.cache
            .invalidate(&self.keys.user_ids_key(organisation_id))
            .await;

        tracing::debug!(%organisation_id, user_id = %user.id, "User created");
        Ok(user.id)
    }

    /// Applies the set fields of `request` and returns the stored record.
    ///
    /// An empty request returns the current record untouched.
    pub async fn update_user(
        &self,
        organisation_id: Uuid,
        user_id: Uuid,
        request: UpdateUser,
    ) -> Result<User> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        let existing = self.find_user(organisation_id, user_id).await?;
        if request.is_empty() {
            return Ok(existing);
        }

        if let Some(email) = request.email.as_deref().filter(|email| *email != existing.email) {
            self.ensure_email_is_free(organisation_id, email).await?;
        }

        let user = existing.create_update(
            request.first_name,
            request.last_name,
            request.email,
            request.is_active,
        )?;
        self.repository.upsert_user(&user).await?;

        tracing::debug!(%organisation_id, %user_id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<()> {
        self.organisations
            .ensure_organisation_exists(organisation_id)
            .await?;
        self.ensure_user_exists(organisation_id, user_id).await?;

        let deleted = self.repository.delete_user(organisation_id, user_id).await;
        self.cache
            .invalidate(&self.keys.user_ids_key(organisation_id))
            .await;
        deleted?;

        tracing::debug!(%organisation_id, %user_id, "User deleted");
        Ok(())
    }

    async fn find_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<User> {
        self.repository
            .get_user(organisation_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(user_id))
    }

    async fn ensure_email_is_free(&self, organisation_id: Uuid, email: &str) -> Result<()> {
        if self
            .repository
            .user_email_is_available(organisation_id, email)
            .await?
        {
            Ok(())
        } else {
            Err(ServiceError::AlreadyExists {
                entity_type: "User",
                field: "email",
                key: email.to_string(),
            })
        }
    }
}
