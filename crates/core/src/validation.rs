//! Pure field validation shared by organisations and users.

/// Returns true when `email` has the shape `local@domain.tld`.
///
/// This is a structural check, not RFC 5322 parsing:
/// - exactly one `@`, with non-empty local and domain parts
/// - the domain contains a `.` that is neither its first nor last character
/// - no whitespace or control characters anywhere
///
/// # Examples
///
/// ```
/// use orgdir_core::validation::is_valid_email;
///
/// assert!(is_valid_email("info@acme-inc.com"));
/// assert!(!is_valid_email("info@localhost"));
/// assert!(!is_valid_email("not an email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.find('.') {
        Some(_) => !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains(".."),
        None => false,
    }
}

/// Returns true when `value` has at least `min` characters once trimmed.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}
