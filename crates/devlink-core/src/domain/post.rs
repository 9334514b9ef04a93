use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Caller, Entity, Likeable, Likes, next_timestamp};

/// Post entity - a feed entry that others can like and comment on.
///
/// Comments live in their own collection; the post keeps their ids, newest
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub likes: Likes,
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post authored by `caller`.
    pub fn new(caller: &Caller, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author: Author::from(caller),
            text,
            likes: Likes::new(),
            comment_ids: Vec::new(),
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

    /// Put a comment id at the front of the list.
    pub fn attach_comment(&mut self, comment_id: Uuid) {
        self.comment_ids.insert(0, comment_id);
    }

    /// Drop a comment id; `false` if it was not attached.
    pub fn detach_comment(&mut self, comment_id: Uuid) -> bool {
        match self.comment_ids.iter().position(|id| *id == comment_id) {
            Some(position) => {
                self.comment_ids.remove(position);
                true
            }
            None => false,
        }
    }
}

impl Entity for Post {
    const COLLECTION: &'static str = "posts";
    const KIND: &'static str = "post";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Likeable for Post {
    fn likes(&self) -> &Likes {
        &self.likes
    }

    fn likes_mut(&mut self) -> &mut Likes {
        &mut self.likes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> Caller {
        Caller::new(Uuid::new_v4(), "Ada")
    }

    #[test]
    fn test_new_post_snapshots_author() {
        let caller = caller().with_avatar("https://img/ada.png");
        let post = Post::new(&caller, "Hello".to_string());

        assert_eq!(post.author.user_id, caller.id);
        assert_eq!(post.author.name, "Ada");
        assert_eq!(post.author.avatar.as_deref(), Some("https://img/ada.png"));
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_edit_bumps_updated_at() {
        let mut post = Post::new(&caller(), "Hello".to_string());
        let before = post.updated_at;

        post.edit_text("Hello again".to_string());

        assert!(post.updated_at > before);
        assert_eq!(post.created_at, before);
    }

    #[test]
    fn test_detach_removes_only_target() {
        let mut post = Post::new(&caller(), "Hello".to_string());
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            post.attach_comment(*id);
        }

        assert!(post.detach_comment(ids[1]));
        assert!(!post.detach_comment(ids[1]));
        assert_eq!(post.comment_ids, vec![ids[2], ids[0]]);
    }
}
