//! Shared-secret gate in front of edit mode.
//!
//! Plain string equality against one configured secret. It keeps casual visitors
//! out of the edit controls and nothing more.

/// Outcome of checking a submitted secret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessVerdict {
    Allow,
    Deny,
    /// No secret configured on the server. Treated as a denial.
    Misconfigured,
}

impl AccessVerdict {
    pub fn is_allowed(self) -> bool {
        self == AccessVerdict::Allow
    }
}

/// Holds the configured edit secret.
#[derive(Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    /// Empty strings count as "not configured".
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn check(&self, candidate: &str) -> AccessVerdict {
        match &self.secret {
            None => AccessVerdict::Misconfigured,
            Some(secret) if secret == candidate => AccessVerdict::Allow,
            Some(_) => AccessVerdict::Deny,
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}
