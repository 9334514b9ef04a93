use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user behind a request, as resolved by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

impl Caller {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Author snapshot copied onto posts and comments at creation time.
///
/// Later changes to the user's name or avatar do not touch existing snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub user_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&Caller> for Author {
    fn from(caller: &Caller) -> Self {
        Self {
            user_id: caller.id,
            name: caller.name.clone(),
            avatar: caller.avatar.clone(),
        }
    }
}
