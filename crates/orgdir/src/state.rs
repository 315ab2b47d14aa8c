//! Application state and composition root.
//!
//! Builds the repositories, the cache client and the services once, from
//! [`Config`], and shares them with every request handler and CLI command.

use std::sync::Arc;
use std::time::Duration;

use orgdir_core::cache::{Cache, CacheKeyManager};
use orgdir_core::service::{IdSetCache, OrganisationService, UserService};
use orgdir_core::storage::{OrganisationRepository, UserRepository};

use crate::cache::build_cache;
use crate::config::Config;
use crate::storage::build_repositories;

/// Shared application state.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub organisations: Arc<OrganisationService>,
    pub users: Arc<UserService>,
    /// When set, API requests must carry this value in `X-API-KEY`.
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Wires the services on top of the given ports.
    ///
    /// Both services share one cache client and one key namespace.
    pub fn new(
        organisation_repo: Arc<dyn OrganisationRepository>,
        user_repo: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        cache_timeout: Duration,
    ) -> Self {
        let id_sets = IdSetCache::with_timeout(cache, cache_timeout);
        let keys = CacheKeyManager::default();

        let organisations = Arc::new(OrganisationService::new(
            organisation_repo,
            id_sets.clone(),
            keys.clone(),
        ));
        let users = Arc::new(UserService::new(
            organisations.clone(),
            user_repo,
            id_sets,
            keys,
        ));

        Self {
            organisations,
            users,
            api_key: None,
        }
    }

    /// Builds the state from configuration, connecting to the selected
    /// storage and cache backends.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (organisation_repo, user_repo) = build_repositories(config).await?;
        let cache = build_cache(config).await?;

        let state = Self::new(organisation_repo, user_repo, cache, config.cache_timeout());
        Ok(state.with_api_key(config.api_key.clone()))
    }

    /// Sets or clears the API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.map(Arc::from);
        self
    }

    /// In-memory storage and cache, for tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        use std::num::NonZeroUsize;

        use crate::cache::MemoryCache;
        use crate::storage::InMemoryRepository;

        let repo = Arc::new(InMemoryRepository::new());
        let capacity = NonZeroUsize::new(128).unwrap();
        Self::new(
            repo.clone(),
            repo,
            Arc::new(MemoryCache::new(capacity, None)),
            orgdir_core::service::DEFAULT_CACHE_TIMEOUT,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::num::NonZeroUsize;

    use orgdir_core::organisation::{CreateOrganisation, UpdateOrganisation};
    use orgdir_core::service::ServiceError;
    use orgdir_core::user::{CreateUser, UpdateUser};
    use uuid::Uuid;

    use super::*;
    use crate::cache::{MemoryCache, NullCache};
    use crate::storage::InMemoryRepository;
    #[cfg(feature = "sqlite")]
    use crate::storage::SqliteRepository;

    fn memory_cache() -> Arc<MemoryCache> {
        Arc::new(MemoryCache::new(NonZeroUsize::new(64).unwrap(), None))
    }

    #[cfg(feature = "sqlite")]
    async fn sqlite_state(cache: Arc<dyn Cache>) -> AppState {
        let repo = Arc::new(SqliteRepository::new_in_memory().await.unwrap());
        AppState::new(repo.clone(), repo, cache, Duration::from_millis(500))
    }

    fn inmemory_state(cache: Arc<dyn Cache>) -> AppState {
        let repo = Arc::new(InMemoryRepository::new());
        AppState::new(repo.clone(), repo, cache, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_from_config_builds_inmemory_stack() {
        let vars = HashMap::from([("STORAGE_BACKEND", "inmemory"), ("API_KEY", "secret")]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        let state = AppState::from_config(&config).await.unwrap();

        assert_eq!(state.api_key.as_deref(), Some("secret"));
        assert!(state.organisations.get_organisations().await.unwrap().is_empty());
    }

    #[cfg(feature = "redis")]
    #[tokio::test]
    async fn test_unreachable_redis_still_serves_from_storage() {
        let vars = HashMap::from([
            ("STORAGE_BACKEND", "inmemory"),
            ("CACHE_BACKEND", "redis"),
            ("REDIS_URL", "redis://127.0.0.1:1"),
            ("CACHE_TIMEOUT_MS", "100"),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        let state = tokio::time::timeout(Duration::from_secs(5), AppState::from_config(&config))
            .await
            .expect("startup blocked on redis")
            .unwrap();

        let id = state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        assert_eq!(state.organisations.get_organisation(id).await.unwrap().id, id);
        state.organisations.ensure_organisation_exists(id).await.unwrap();
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_acme_lifecycle_on_sqlite() {
        let state = sqlite_state(memory_cache()).await;
        let organisations = &state.organisations;

        let id = organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        let acme = organisations.get_organisation(id).await.unwrap();
        assert_eq!(acme.slug, "acme-inc");

        let duplicate = organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "other@acme-inc.com"))
            .await;
        assert!(matches!(duplicate, Err(ServiceError::AlreadyExists { .. })));

        organisations.delete_organisation(id).await.unwrap();

        assert_eq!(
            organisations.get_organisation(id).await,
            Err(ServiceError::organisation_not_found(id))
        );
        assert!(organisations.get_organisations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_john_doe_scenario_on_inmemory() {
        let state = inmemory_state(memory_cache());
        let first = state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        let second = state
            .organisations
            .add_organisation(CreateOrganisation::new("Globex", "info@globex.com"))
            .await
            .unwrap();

        let john = state
            .users
            .add_user(first, CreateUser::new("John", "Doe", "john@doe.com"))
            .await
            .unwrap();
        let duplicate = state
            .users
            .add_user(first, CreateUser::new("Johnny", "Doe", "john@doe.com"))
            .await;
        let elsewhere = state
            .users
            .add_user(second, CreateUser::new("John", "Doe", "john@doe.com"))
            .await;

        assert!(matches!(
            duplicate,
            Err(ServiceError::AlreadyExists { field: "email", .. })
        ));
        assert!(elsewhere.is_ok());
        assert_eq!(
            state.users.get_user(first, john).await.unwrap().full_name(),
            "John Doe"
        );
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_organisation_delete_drops_cached_user_ids() {
        let cache = memory_cache();
        let state = sqlite_state(cache.clone()).await;
        let keys = CacheKeyManager::default();

        let org = state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        let user = state
            .users
            .add_user(org, CreateUser::new("John", "Doe", "john@doe.com"))
            .await
            .unwrap();

        state.users.ensure_user_exists(org, user).await.unwrap();
        assert!(cache.get_set(&keys.user_ids_key(org)).await.unwrap().is_some());

        state.organisations.delete_organisation(org).await.unwrap();

        assert_eq!(cache.get_set(&keys.user_ids_key(org)).await.unwrap(), None);
        assert_eq!(
            state.users.ensure_user_exists(org, user).await,
            Err(ServiceError::user_not_found(user))
        );
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_update_user_keeps_existence_cache() {
        let state = sqlite_state(memory_cache()).await;
        let org = state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        let user = state
            .users
            .add_user(org, CreateUser::new("John", "Doe", "john@doe.com"))
            .await
            .unwrap();

        let updated = state
            .users
            .update_user(org, user, UpdateUser::new().with_email("john.doe@acme.com"))
            .await
            .unwrap();

        assert_eq!(updated.email, "john.doe@acme.com");
        assert!(state
            .users
            .email_is_available(org, "john@doe.com")
            .await
            .unwrap());
        state.users.ensure_user_exists(org, user).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let state = inmemory_state(Arc::new(NullCache));
        state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();
        let globex = state
            .organisations
            .add_organisation(CreateOrganisation::new("Globex", "info@globex.com"))
            .await
            .unwrap();

        let result = state
            .organisations
            .update_organisation(globex, UpdateOrganisation::new().with_name("Acme Inc."))
            .await;

        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_null_cache_still_answers_existence() {
        let state = sqlite_state(Arc::new(NullCache)).await;

        let id = state
            .organisations
            .add_organisation(CreateOrganisation::new("Acme Inc.", "info@acme-inc.com"))
            .await
            .unwrap();

        let missing = Uuid::new_v4();

        state.organisations.ensure_organisation_exists(id).await.unwrap();
        assert_eq!(
            state.organisations.ensure_organisation_exists(missing).await,
            Err(ServiceError::organisation_not_found(missing))
        );
    }
}
