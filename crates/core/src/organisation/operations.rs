use deunicode::deunicode;

use crate::validation::{has_min_chars, is_valid_email};

use super::error::OrganisationError;
use super::types::Organisation;

/// Maximum length of an organisation slug.
pub const SLUG_MAX_LENGTH: usize = 50;

/// Minimum length of an organisation name (after trimming).
const NAME_MIN_LENGTH: usize = 3;

/// Derives the URL-safe slug for an organisation name.
///
/// Transliterates the input to ASCII and lowercases it, then turns every run
/// of characters outside `[a-z0-9]` into a single `-`. Separators are
/// stripped from both ends and the result is truncated to [`SLUG_MAX_LENGTH`].
///
/// # Examples
///
/// ```
/// use orgdir_core::organisation::create_slug;
///
/// assert_eq!(create_slug("Acme Inc."), "acme-inc");
/// assert_eq!(create_slug("  Foo -- Bar's  "), "foo-bar-s");
/// assert_eq!(create_slug("Café Crème"), "cafe-creme");
/// assert_eq!(create_slug("!!!"), "");
/// ```
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in deunicode(text).chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    // Only ASCII is ever pushed, so byte truncation is char-safe.
    if slug.len() > SLUG_MAX_LENGTH {
        slug.truncate(SLUG_MAX_LENGTH);
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Validates an organisation before it is persisted.
pub fn validate_organisation(organisation: &Organisation) -> Result<(), OrganisationError> {
    if !has_min_chars(&organisation.name, NAME_MIN_LENGTH) {
        return Err(OrganisationError::NameTooShort);
    }
    if organisation.slug.is_empty() {
        return Err(OrganisationError::EmptySlug(organisation.name.clone()));
    }
    if !is_valid_email(&organisation.email) {
        return Err(OrganisationError::InvalidEmail(organisation.email.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(create_slug("Acme Inc."), "acme-inc");
        assert_eq!(create_slug("ACME"), "acme");
        assert_eq!(create_slug("Acme 2024 Ltd"), "acme-2024-ltd");
    }

    #[test]
    fn test_slug_collapses_and_trims_separators() {
        assert_eq!(create_slug("--Acme___Inc--"), "acme-inc");
        assert_eq!(create_slug("Acme    Inc"), "acme-inc");
        assert_eq!(create_slug("O'Reilly Media"), "o-reilly-media");
    }

    #[test]
    fn test_slug_transliterates_accented_letters() {
        assert_eq!(create_slug("Café Crème"), "cafe-creme");
        assert_eq!(create_slug("Café Crème"), create_slug("Cafe Creme"));
        assert_eq!(create_slug("Zürich Straße"), "zurich-strasse");
    }

    #[test]
    fn test_slug_is_empty_for_symbols_only() {
        assert_eq!(create_slug("!!!"), "");
        assert_eq!(create_slug(""), "");
    }

    #[test]
    fn test_slug_is_truncated() {
        let name = "a".repeat(80);
        let slug = create_slug(&name);
        assert_eq!(slug.len(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn test_slug_truncation_does_not_leave_trailing_separator() {
        // 49 letters, a space, then more letters: the cut lands on the separator.
        let name = format!("{} bcd", "a".repeat(49));
        let slug = create_slug(&name);
        assert_eq!(slug, "a".repeat(49));
    }

    #[test]
    fn test_slug_names_that_differ_only_in_punctuation_collide() {
        assert_eq!(create_slug("Acme Inc"), create_slug("Acme Inc."));
    }

    #[test]
    fn test_validate_organisation_ok() {
        let organisation = Organisation::create_new("Acme Inc.", "a@acme.com", true).unwrap();
        assert!(validate_organisation(&organisation).is_ok());
    }

    #[test]
    fn test_validate_organisation_short_name() {
        let result = Organisation::create_new("  ab ", "a@acme.com", true);
        assert_eq!(result, Err(OrganisationError::NameTooShort));
    }

    #[test]
    fn test_validate_organisation_empty_slug() {
        let result = Organisation::create_new("!!!!", "a@acme.com", true);
        assert_eq!(result, Err(OrganisationError::EmptySlug("!!!!".to_string())));
    }

    #[test]
    fn test_validate_organisation_invalid_email() {
        let result = Organisation::create_new("Acme Inc.", "acme", true);
        assert_eq!(
            result,
            Err(OrganisationError::InvalidEmail("acme".to_string()))
        );
    }
}
