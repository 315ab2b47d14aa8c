//! Request payloads for organisation operations.
//!
//! Shared by the HTTP handlers and the CLI. Pure data, no I/O.

use serde::{Deserialize, Serialize};

/// Payload for creating an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganisation {
    pub name: String,
    pub email: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl CreateOrganisation {
    /// Creates an active organisation request.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_active: true,
        }
    }

    /// Sets the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Payload for updating an organisation. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrganisation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateOrganisation {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the organisation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the organisation email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_active() {
        let request: CreateOrganisation =
            serde_json::from_str(r#"{"name":"Acme Inc.","email":"a@acme.com"}"#).unwrap();
        assert!(request.is_active);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateOrganisation::new().is_empty());
        assert!(!UpdateOrganisation::new().with_active(false).is_empty());
    }

    #[test]
    fn test_update_deserializes_partial_payload() {
        let request: UpdateOrganisation = serde_json::from_str(r#"{"email":"b@acme.com"}"#).unwrap();
        assert_eq!(request, UpdateOrganisation::new().with_email("b@acme.com"));
    }

    #[test]
    fn test_update_skips_unset_fields_when_serialized() {
        let json = serde_json::to_string(&UpdateOrganisation::new().with_name("Acme")).unwrap();
        assert_eq!(json, r#"{"name":"Acme"}"#);
    }
}
