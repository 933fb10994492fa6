//! Session / credential port
//!
//! The engine asks for a bearer token right before each fetch and never
//! stores it. Where the token comes from (keychain, environment, login
//! flow) is the host's concern.

use std::fmt;

/// Supplies the current bearer token
pub trait ITokenProvider: Send + Sync {
    /// Returns the current token; an empty string means "not signed in"
    fn bearer_token(&self) -> String;
}

impl<F> ITokenProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn bearer_token(&self) -> String {
        self()
    }
}

/// A fixed token, for hosts that resolve the credential once at startup
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// A provider that reports "not signed in"
    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl ITokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> String {
        self.token.clone()
    }
}

// Never print the credential itself.
impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token_len", &self.token.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.bearer_token(), "abc");
        assert_eq!(StaticTokenProvider::signed_out().bearer_token(), "");
    }

    #[test]
    fn test_debug_redacts_token() {
        let provider = StaticTokenProvider::new("secret-value");
        let printed = format!("{provider:?}");
        assert!(!printed.contains("secret-value"));
        assert!(printed.contains("token_len"));
    }

    #[test]
    fn test_closure_provider() {
        let provider = || "from-closure".to_string();
        assert_eq!(provider.bearer_token(), "from-closure");
    }
}
