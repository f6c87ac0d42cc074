/// Verified caller identity, attached to the request for its lifetime
///
/// Derived from the identity provider's ID token on every request; nothing
/// about it is kept between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject (`sub`) claim: the provider's user id
    pub subject: String,
    /// Email address, when the account has one
    pub email: Option<String>,
}

impl Identity {
    /// Email for log lines, `-` when unknown
    pub fn email_or_placeholder(&self) -> &str {
        self.email.as_deref().unwrap_or("-")
    }
}

/// Per-request context handed to endpoint handlers
///
/// Shared by the story and narration flows
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Caller identity, set by the authentication middleware
    pub identity: Option<Identity>,
}

impl RequestContext {
    /// Subject for log fields, `anonymous` when auth is disabled
    pub fn subject(&self) -> &str {
        self.identity.as_ref().map_or("anonymous", |identity| identity.subject.as_str())
    }
}
