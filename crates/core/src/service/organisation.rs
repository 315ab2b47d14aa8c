use std::sync::Arc;

use uuid::Uuid;

use crate::cache::CacheKeyManager;
use crate::organisation::{create_slug, CreateOrganisation, Organisation, UpdateOrganisation};
use crate::storage::OrganisationRepository;

use super::{IdSetCache, Result, ServiceError};

/// Organisation use cases on top of the repository and the ID-set cache.
pub struct OrganisationService {
    repository: Arc<dyn OrganisationRepository>,
    cache: IdSetCache,
    keys: CacheKeyManager,
}

impl OrganisationService {
    pub fn new(
        repository: Arc<dyn OrganisationRepository>,
        cache: IdSetCache,
        keys: CacheKeyManager,
    ) -> Self {
        Self {
            repository,
            cache,
            keys,
        }
    }

    /// Returns `NotFound` unless an organisation with this ID exists.
    pub async fn ensure_organisation_exists(&self, id: Uuid) -> Result<()> {
        let key = self.keys.organisation_ids_key();
        let repository = &self.repository;
        let exists = self
            .cache
            .contains(&key, id, || repository.get_organisation_ids())
            .await?;

        if exists {
            Ok(())
        } else {
            Err(ServiceError::organisation_not_found(id))
        }
    }

    /// Returns every organisation, sorted by name.
    pub async fn get_organisations(&self) -> Result<Vec<Organisation>> {
        Ok(self.repository.get_organisations().await?)
    }

    pub async fn get_organisation(&self, id: Uuid) -> Result<Organisation> {
        self.repository
            .get_organisation(id)
            .await?
            .ok_or_else(|| ServiceError::organisation_not_found(id))
    }

    /// Creates an organisation and returns its ID.
    pub async fn add_organisation(&self, request: CreateOrganisation) -> Result<Uuid> {
        let slug = create_slug(&request.name);
        if !slug.is_empty() && self.repository.get_organisation_by_slug(&slug).await?.is_some() {
            return Err(ServiceError::AlreadyExists {
                entity_type: "Organisation",
                field: "name",
                key: request.name,
            });
        }

        let organisation =
            Organisation::create_new(request.name, request.email, request.is_active)?;
        self.repository.upsert_organisation(&organisation).await?;
        self.cache.invalidate(&self.keys.organisation_ids_key()).await;

        tracing::debug!(
            organisation_id = %organisation.id,
            slug = %organisation.slug,
            "Organisation created"
        );
        Ok(organisation.id)
    }

    /// Applies the set fields of `request` and returns the stored record.
    ///
    /// An empty request returns the current record untouched.
    pub async fn update_organisation(
        &self,
        id: Uuid,
        request: UpdateOrganisation,
    ) -> Result<Organisation> {
        let existing = self.get_organisation(id).await?;
        if request.is_empty() {
            return Ok(existing);
        }

        if let Some(name) = request.name.as_deref().filter(|name| *name != existing.name) {
            self.ensure_name_is_free(id, name).await?;
        }

        let organisation = existing.create_update(request.name, request.email, request.is_active)?;
        self.repository.upsert_organisation(&organisation).await?;

        tracing::debug!(organisation_id = %id, "Organisation updated");
        Ok(organisation)
    }

    async fn ensure_name_is_free(&self, id: Uuid, name: &str) -> Result<()> {
        let by_name = self.repository.get_organisation_by_name(name).await?;
        let by_slug = match create_slug(name) {
            slug if slug.is_empty() => None,
            slug => self.repository.get_organisation_by_slug(&slug).await?,
        };

        match [by_name, by_slug].into_iter().flatten().find(|other| other.id != id) {
            Some(other) => Err(ServiceError::AlreadyExists {
                entity_type: "Organisation",
                field: "ID",
                key: other.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Deletes an organisation together with its users.
    pub async fn delete_organisation(&self, id: Uuid) -> Result<()> {
        self.ensure_organisation_exists(id).await?;
        let deleted = self.repository.delete_organisation(id).await;

        // A stale ID set may have let a vanished row through; drop it either way.
        self.cache.invalidate(&self.keys.organisation_ids_key()).await;
        self.cache.invalidate(&self.keys.user_ids_key(id)).await;
        deleted?;

        tracing::debug!(organisation_id = %id, "Organisation deleted");
        Ok(())
    }
}
