//! Server-side item identity.

use std::fmt;

/// Identifier and version token of a server-side item. The change key is
/// refreshed by the server on every modification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    /// Item identifier.
    pub id: String,
    /// Version token.
    pub change_key: String,
}

impl ItemId {
    /// Creates an item identity.
    #[must_use]
    pub fn new(id: impl Into<String>, change_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: change_key.into(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id={} ChangeKey={}", self.id, self.change_key)
    }
}
