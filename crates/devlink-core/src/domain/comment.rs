use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Caller, Entity, Likeable, Likes, next_timestamp};

/// Comment entity - owned by a post, referenced back through `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: Author,
    pub text: String,
    pub likes: Likes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, caller: &Caller, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            author: Author::from(caller),
            text,
            likes: Likes::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author.user_id == user_id
    }

    pub fn edit_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = next_timestamp(self.updated_at);
    }
}

impl Entity for Comment {
    const COLLECTION: &'static str = "comments";
    const KIND: &'static str = "comment";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Likeable for Comment {
    fn likes(&self) -> &Likes {
        &self.likes
    }

    fn likes_mut(&mut self) -> &mut Likes {
        &mut self.likes
    }
}
