//! Client-side checks run before any auth request is sent

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
pub const INCOMPLETE_CODE: &str = "Please enter the complete 6-digit code.";
pub const EMAIL_REQUIRED: &str = "Please enter your email address.";

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Length of verification and reset codes
pub const CODE_LENGTH: usize = 6;

/// Every field must be non-blank
pub fn require_filled(fields: &[&str]) -> Result<(), &'static str> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(FILL_ALL_FIELDS);
    }
    Ok(())
}

/// `local@domain.tld` shape, nothing stricter
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }

    let last = domain.len() - 1;
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

/// A new password and its confirmation
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password != confirm {
        return Err(PASSWORDS_DIFFER);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PASSWORD_TOO_SHORT);
    }
    Ok(())
}

/// Exactly six ASCII digits
pub fn check_code(code: &str) -> Result<(), &'static str> {
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(INCOMPLETE_CODE);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.org"));
        assert!(is_valid_email("j.doe+cw@mail.city.gov"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@.org"));
        assert!(!is_valid_email("jane@example."));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("jane doe@example.org"));
        assert!(!is_valid_email("jane@@example.org"));
    }

    #[test]
    fn test_password_rules_checked_in_order() {
        assert_eq!(check_new_password("abc", "abcd"), Err(PASSWORDS_DIFFER));
        assert_eq!(check_new_password("abc", "abc"), Err(PASSWORD_TOO_SHORT));
        assert_eq!(check_new_password("abcdef", "abcdef"), Ok(()));
    }

    #[test]
    fn test_code_length() {
        assert_eq!(check_code("123456"), Ok(()));
        assert_eq!(check_code("12345"), Err(INCOMPLETE_CODE));
        assert_eq!(check_code("1234567"), Err(INCOMPLETE_CODE));
        assert_eq!(check_code("12a456"), Err(INCOMPLETE_CODE));
    }

    #[test]
    fn test_require_filled() {
        assert_eq!(require_filled(&["a", "b"]), Ok(()));
        assert_eq!(require_filled(&["a", "  "]), Err(FILL_ALL_FIELDS));
    }
}
