//! Field validation for signup, signin, and contact payloads.
//!
//! Validators collect the full set of failing-field messages rather than
//! stopping at the first failure, so the client sees everything wrong with
//! a payload in one response.

/// Returns the trimmed value if present and non-empty, recording a message
/// otherwise.
fn required<'a>(
    value: Option<&'a str>,
    field: &str,
    messages: &mut Vec<String>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            messages.push(format!("{field} is required"));
            None
        }
    }
}

/// Minimal well-formedness check: non-empty local part and domain, and the
/// domain contains a dot.  Not an RFC 5321 parser.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn check_email(value: Option<&str>, messages: &mut Vec<String>) {
    if let Some(email) = required(value, "email", messages) {
        if !is_valid_email(email) {
            messages.push("email must be a valid email address".to_string());
        }
    }
}

/// Validate a signup payload.  Uniqueness is checked separately against the
/// store; this covers presence and well-formedness only.
pub fn validate_signup(
    email: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
) -> Vec<String> {
    let mut messages = Vec::new();
    check_email(email, &mut messages);
    required(username, "username", &mut messages);
    required(password, "password", &mut messages);
    messages
}

/// Validate a signin payload: both fields must be present and non-empty.
pub fn validate_signin(email: Option<&str>, password: Option<&str>) -> Vec<String> {
    let mut messages = Vec::new();
    required(email, "email", &mut messages);
    required(password, "password", &mut messages);
    messages
}

/// Validate a contact payload: all four fields required, email well-formed.
pub fn validate_contact(
    fullname: Option<&str>,
    email: Option<&str>,
    telephone: Option<&str>,
    address: Option<&str>,
) -> Vec<String> {
    let mut messages = Vec::new();
    required(fullname, "fullname", &mut messages);
    check_email(email, &mut messages);
    required(telephone, "telephone", &mut messages);
    required(address, "address", &mut messages);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("alice@.com"));
        assert!(!is_valid_email("alice @example.com"));
    }

    #[test]
    fn signup_collects_all_failures() {
        let messages = validate_signup(None, Some(""), None);
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().any(|m| m.contains("email")));
        assert!(messages.iter().any(|m| m.contains("username")));
        assert!(messages.iter().any(|m| m.contains("password")));
    }

    #[test]
    fn signup_flags_malformed_email() {
        let messages = validate_signup(Some("not-an-email"), Some("alice"), Some("pw"));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("valid email"));
    }

    #[test]
    fn signin_requires_both_fields() {
        assert!(validate_signin(Some("a@example.com"), Some("pw")).is_empty());
        assert_eq!(validate_signin(Some("a@example.com"), None).len(), 1);
        assert_eq!(validate_signin(None, None).len(), 2);
    }

    #[test]
    fn contact_requires_all_fields() {
        let messages = validate_contact(None, None, None, None);
        assert_eq!(messages.len(), 4);

        let ok = validate_contact(
            Some("Carol"),
            Some("carol@example.com"),
            Some("+15550100"),
            Some("1 Main St"),
        );
        assert!(ok.is_empty());
    }
}
