use std::fmt;

/// An opaque session credential issued by the identity provider.
///
/// The value is never shown by `Debug`, so tokens can travel through
/// structured logs without leaking.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token. Empty strings are not tokens.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(SessionToken(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_not_a_token() {
        assert!(SessionToken::new("").is_none());
    }

    #[test]
    fn debug_does_not_print_the_value() {
        let token = SessionToken::new("abc").unwrap();
        assert_eq!(token.as_str(), "abc");
        assert!(!format!("{:?}", token).contains("abc"));
    }
}
