//! Field validators shared by the domain services.
//!
//! Request bodies are checked with the `validator` derive at the API
//! boundary; these functions back the service-level checks for input
//! that arrives through other paths (multipart forms, direct service
//! calls).

/// Common validation functions
pub mod validators {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    });

    static USERNAME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{2,29}$").expect("username regex is valid"));

    static PHONE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("phone regex is valid"));

    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }

    /// Check if a string matches a pattern
    pub fn matches_pattern(value: &str, pattern: &Regex) -> bool {
        pattern.is_match(value)
    }

    /// Check if an email address is valid (basic check)
    pub fn is_valid_email(email: &str) -> bool {
        email.len() <= 255 && EMAIL_RE.is_match(email)
    }

    /// Check if a username is acceptable: 3-30 chars, alphanumeric plus
    /// underscore, starting with a letter
    pub fn is_valid_username(username: &str) -> bool {
        USERNAME_RE.is_match(username)
    }

    /// Minimum password strength: 8-72 bytes (bcrypt input limit)
    pub fn is_valid_password(password: &str) -> bool {
        let len = password.len();
        (8..=72).contains(&len)
    }

    /// Loose international phone format: optional +, 6-15 digits
    pub fn is_valid_phone(phone: &str) -> bool {
        PHONE_RE.is_match(phone)
    }
}
