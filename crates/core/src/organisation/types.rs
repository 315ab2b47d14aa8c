use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::OrganisationError;
use super::operations::{create_slug, validate_organisation};

/// An organisation that owns users.
///
/// Records are immutable values: updates go through [`Organisation::create_update`],
/// which returns a new record sharing the same `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
    /// Derived from `name`, unique across organisations.
    pub slug: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organisation {
    /// Creates a new, validated organisation with a fresh ID and timestamps.
    pub fn create_new(
        name: impl Into<String>,
        email: impl Into<String>,
        is_active: bool,
    ) -> Result<Self, OrganisationError> {
        let name = name.into();
        let now = Utc::now();
        let organisation = Self {
            id: Uuid::new_v4(),
            slug: create_slug(&name),
            name,
            email: email.into(),
            is_active,
            created_at: now,
            updated_at: now,
        };
        validate_organisation(&organisation)?;
        Ok(organisation)
    }

    /// Returns an updated copy with the given fields replaced.
    ///
    /// The slug is recomputed from the resulting name and `updated_at` is
    /// refreshed; `id` and `created_at` are preserved.
    pub fn create_update(
        &self,
        name: Option<String>,
        email: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Self, OrganisationError> {
        let name = name.unwrap_or_else(|| self.name.clone());
        let organisation = Self {
            id: self.id,
            slug: create_slug(&name),
            name,
            email: email.unwrap_or_else(|| self.email.clone()),
            is_active: is_active.unwrap_or(self.is_active),
            created_at: self.created_at,
            updated_at: Utc::now(),
        };
        validate_organisation(&organisation)?;
        Ok(organisation)
    }

    /// Sets a specific ID for this organisation (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}
