use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::UserError;
use super::operations::validate_user;

/// A user belonging to exactly one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique within the owning organisation.
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, validated user with a fresh ID and timestamps.
    pub fn create_new(
        organisation_id: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        is_active: bool,
    ) -> Result<Self, UserError> {
        let now = Utc::now();
        let user = Self {
            id: Uuid::new_v4(),
            organisation_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            is_active,
            created_at: now,
            updated_at: now,
        };
        validate_user(&user)?;
        Ok(user)
    }

    /// Returns an updated copy with the given fields replaced.
    pub fn create_update(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Self, UserError> {
        let user = Self {
            id: self.id,
            organisation_id: self.organisation_id,
            first_name: first_name.unwrap_or_else(|| self.first_name.clone()),
            last_name: last_name.unwrap_or_else(|| self.last_name.clone()),
            email: email.unwrap_or_else(|| self.email.clone()),
            is_active: is_active.unwrap_or(self.is_active),
            created_at: self.created_at,
            updated_at: Utc::now(),
        };
        validate_user(&user)?;
        Ok(user)
    }

    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
