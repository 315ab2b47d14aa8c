use uuid::Uuid;

/// Builds the namespaced keys under which ID sets are cached.
///
/// Every key starts with the prefix, so changing the prefix (for example on
/// a version bump) orphans all previous entries at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyManager {
    prefix: String,
}

impl CacheKeyManager {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of the set holding every organisation ID.
    pub fn organisation_ids_key(&self) -> String {
        format!("{}__organisation_ids", self.prefix)
    }

    /// Key of the set holding the user IDs of one organisation.
    pub fn user_ids_key(&self, organisation_id: Uuid) -> String {
        format!(
            "{}__organisation_id__{}__user_ids",
            self.prefix, organisation_id
        )
    }
}

impl Default for CacheKeyManager {
    /// Uses `"{crate name}__{crate version}"` as the prefix.
    fn default() -> Self {
        Self::new(format!(
            "{}__{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organisation_ids_key() {
        let keys = CacheKeyManager::new("app__1.0");
        assert_eq!(keys.organisation_ids_key(), "app__1.0__organisation_ids");
    }

    #[test]
    fn test_user_ids_key() {
        let keys = CacheKeyManager::new("app__1.0");
        assert_eq!(
            keys.user_ids_key(Uuid::nil()),
            "app__1.0__organisation_id__00000000-0000-0000-0000-000000000000__user_ids"
        );
    }

    #[test]
    fn test_user_ids_keys_are_distinct_per_organisation() {
        let keys = CacheKeyManager::new("app");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(keys.user_ids_key(a), keys.user_ids_key(b));
        assert_ne!(keys.user_ids_key(a), keys.organisation_ids_key());
    }

    #[test]
    fn test_default_prefix_uses_crate_name_and_version() {
        let keys = CacheKeyManager::default();
        assert_eq!(
            keys.prefix(),
            format!("orgdir_core__{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_prefix_change_changes_every_key() {
        let old = CacheKeyManager::new("app__1.0");
        let new = CacheKeyManager::new("app__1.1");
        let id = Uuid::nil();
        assert_ne!(old.organisation_ids_key(), new.organisation_ids_key());
        assert_ne!(old.user_ids_key(id), new.user_ids_key(id));
    }
}
