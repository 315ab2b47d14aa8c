use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::organisation::Organisation;
use crate::user::User;

use super::Result;

/// Repository for organisation operations.
#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    /// Returns true if an organisation with this ID is stored.
    async fn organisation_exists(&self, id: Uuid) -> Result<bool>;

    /// Gets all organisations, sorted by name.
    async fn get_organisations(&self) -> Result<Vec<Organisation>>;

    /// Gets the IDs of all organisations.
    async fn get_organisation_ids(&self) -> Result<HashSet<Uuid>>;

    /// Gets an organisation by its ID.
    async fn get_organisation(&self, id: Uuid) -> Result<Option<Organisation>>;

    /// Gets an organisation by its slug.
    async fn get_organisation_by_slug(&self, slug: &str) -> Result<Option<Organisation>>;

    /// Gets an organisation by its exact name.
    async fn get_organisation_by_name(&self, name: &str) -> Result<Option<Organisation>>;

    /// Inserts the organisation, or replaces the stored record with the same ID.
    ///
    /// Returns `AlreadyExists` when another organisation holds the same name or slug.
    async fn upsert_organisation(&self, organisation: &Organisation) -> Result<()>;

    /// Deletes an organisation and all of its users.
    ///
    /// Returns `NotFound` if no organisation has this ID.
    async fn delete_organisation(&self, id: Uuid) -> Result<()>;
}

/// Repository for user operations. Every query is scoped to one organisation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets all users of an organisation.
    async fn get_users(&self, organisation_id: Uuid) -> Result<Vec<User>>;

    /// Gets the IDs of all users of an organisation.
    async fn get_user_ids(&self, organisation_id: Uuid) -> Result<HashSet<Uuid>>;

    /// Gets a user by its ID.
    async fn get_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<Option<User>>;

    /// Gets a user by email address.
    async fn get_user_by_email(&self, organisation_id: Uuid, email: &str)
        -> Result<Option<User>>;

    /// Returns true if the user is stored under this organisation.
    async fn user_exists(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Returns true if no user of the organisation has this email.
    async fn user_email_is_available(&self, organisation_id: Uuid, email: &str) -> Result<bool>;

    /// Inserts the user, or replaces the stored record with the same ID.
    ///
    /// Returns `AlreadyExists` when the email is taken within the organisation.
    async fn upsert_user(&self, user: &User) -> Result<()>;

    /// Deletes a user.
    ///
    /// Returns `NotFound` if the organisation has no such user.
    async fn delete_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<()>;
}
