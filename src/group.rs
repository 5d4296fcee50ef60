use serde::Serialize;
use std::fmt::{self, Debug};

/// Password a group is gated behind.
///
/// This is *not* a credential. It ships inside the data document, so anyone
/// who can read that document can read the secret. It only decides whether
/// the board for a group is shown, and must never guard anything that
/// matters for security. `Debug` hides the value to keep it out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> SharedSecret {
        SharedSecret(secret.into())
    }

    /// Exact, case-sensitive comparison. No trimming, no normalization.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip)]
    pub secret: Option<SharedSecret>,
}

impl Group {
    /// A group anyone may open.
    pub fn new(id: &str, name: &str, description: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Group {
        self.secret = Some(SharedSecret::new(secret));
        self
    }

    /// True iff opening this group asks for the shared secret.
    pub fn requires_secret(&self) -> bool {
        self.secret.is_some()
    }
}

/// Group list entry for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCard<'a> {
    #[serde(flatten)]
    pub group: &'a Group,
    pub locked: bool,
}

impl<'a> GroupCard<'a> {
    pub fn new(group: &'a Group, locked: bool) -> GroupCard<'a> {
        GroupCard { group, locked }
    }
}
