use serde::{Deserialize, Serialize};

/// Privilege levels, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    ReadOnly,
    Standard,
    Administrator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::ReadOnly => write!(f, "ReadOnly"),
            Role::Standard => write!(f, "Standard"),
            Role::Administrator => write!(f, "Administrator"),
        }
    }
}

/// An authenticated identity. Immutable for the lifetime of its session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role }
    }

    pub fn allowed(&self, min: Role) -> bool {
        self.role >= min
    }

    /// Role name shown to clients.
    pub fn effective_role(&self) -> String {
        self.role.to_string()
    }
}
