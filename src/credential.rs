use std::fmt;

/// An API key supplied interactively and held only for the current session.
///
/// The key is never persisted and never logged; `Debug` redacts it so it
/// cannot leak through error output or assertion failures.
#[derive(Clone, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Empty or whitespace-only keys fail validation before any request.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The raw key, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

/// Mask a key for on-screen display: asterisks with the last four characters
/// visible once the key is long enough to make that safe.
pub fn mask(key: &str) -> String {
    let char_count = key.chars().count();
    if char_count <= 4 {
        "*".repeat(char_count)
    } else {
        let last_four: String = key.chars().skip(char_count - 4).collect();
        format!("{}...{}", "*".repeat((char_count - 4).min(20)), last_four)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_key_counts_as_empty() {
        assert!(Credential::new("").is_empty());
        assert!(Credential::new("   ").is_empty());
        assert!(!Credential::new("sk-test").is_empty());
    }

    #[test]
    fn debug_never_shows_the_key() {
        let formatted = format!("{:?}", Credential::new("sk-super-secret"));
        assert!(!formatted.contains("secret"));
        assert_eq!(formatted, "Credential(***)");
    }

    #[test]
    fn mask_keeps_only_the_tail() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("abcd"), "****");
        assert_eq!(mask("sk-12345"), "****...2345");
    }
}
