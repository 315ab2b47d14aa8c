use crate::validation::{has_min_chars, is_valid_email};

use super::error::UserError;
use super::types::User;

const NAME_MIN_LENGTH: usize = 2;

/// Validates a user before it is persisted.
pub fn validate_user(user: &User) -> Result<(), UserError> {
    if !has_min_chars(&user.first_name, NAME_MIN_LENGTH) {
        return Err(UserError::FirstNameTooShort);
    }
    if !has_min_chars(&user.last_name, NAME_MIN_LENGTH) {
        return Err(UserError::LastNameTooShort);
    }
    if !is_valid_email(&user.email) {
        return Err(UserError::InvalidEmail(user.email.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_validate_user_ok() {
        let user = User::create_new(Uuid::new_v4(), "John", "Doe", "john@doe.com", true).unwrap();
        assert!(validate_user(&user).is_ok());
    }

    #[test]
    fn test_validate_user_short_first_name() {
        let result = User::create_new(Uuid::new_v4(), " J ", "Doe", "john@doe.com", true);
        assert_eq!(result, Err(UserError::FirstNameTooShort));
    }

    #[test]
    fn test_validate_user_short_last_name() {
        let result = User::create_new(Uuid::new_v4(), "John", "D", "john@doe.com", true);
        assert_eq!(result, Err(UserError::LastNameTooShort));
    }

    #[test]
    fn test_validate_user_invalid_email() {
        let result = User::create_new(Uuid::new_v4(), "John", "Doe", "john@doe", true);
        assert_eq!(
            result,
            Err(UserError::InvalidEmail("john@doe".to_string()))
        );
    }
}
