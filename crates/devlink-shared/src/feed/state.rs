use std::collections::HashSet;

use uuid::Uuid;

use super::cursor::{CursorConfig, PageRequest, PaginationCursor};
use crate::dto::{CommentResponse, FeedPage, LikeResponse, PostSummaryResponse};

/// Everything that can happen to a feed.
#[derive(Debug, Clone)]
pub enum FeedCommand {
    Start,
    ItemVisible(usize),
    ItemHidden(usize),
    PageLoaded {
        request: PageRequest,
        page: FeedPage<PostSummaryResponse>,
    },
    PageFailed {
        request: PageRequest,
        error: String,
    },
    Retry,
    Cancel,
    /// The user created a post; it goes to the top.
    PostCreated(PostSummaryResponse),
    PostRemoved(Uuid),
    LikesChanged {
        post_id: Uuid,
        likes: Vec<LikeResponse>,
    },
    /// Full, newest-first comment list as returned by a comment mutation.
    CommentsChanged {
        post_id: Uuid,
        comments: Vec<CommentResponse>,
    },
}

/// Posts fetched so far, in feed order, plus the cursor that pages them in.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    items: Vec<PostSummaryResponse>,
    cursor: PaginationCursor,
}

impl FeedState {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            items: Vec::new(),
            cursor: PaginationCursor::new(config),
        }
    }

    pub fn items(&self) -> &[PostSummaryResponse] {
        &self.items
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    /// Apply one command. Returns the page to fetch next, if one is due.
    pub fn apply(&mut self, command: FeedCommand) -> Option<PageRequest> {
        match command {
            FeedCommand::Start => self.cursor.start(),
            FeedCommand::ItemVisible(index) => self.cursor.item_visible(index),
            FeedCommand::ItemHidden(index) => self.cursor.item_hidden(index),
            FeedCommand::PageLoaded { request, page } => self.append(request, page),
            FeedCommand::PageFailed { request, error } => {
                self.cursor.page_failed(request, error);
                None
            }
            FeedCommand::Retry => self.cursor.retry(),
            FeedCommand::Cancel => {
                self.cursor.cancel();
                None
            }
            FeedCommand::PostCreated(post) => {
                if !self.items.iter().any(|p| p.id == post.id) {
                    self.items.insert(0, post);
                    self.cursor.item_inserted_front();
                }
                None
            }
            FeedCommand::PostRemoved(post_id) => {
                let index = self.position(post_id)?;
                self.items.remove(index);
                self.cursor.item_removed(index)
            }
            FeedCommand::LikesChanged { post_id, likes } => {
                if let Some(post) = self.post_mut(post_id) {
                    post.likes = likes;
                }
                None
            }
            FeedCommand::CommentsChanged {
                post_id,
                mut comments,
            } => {
                if let Some(post) = self.post_mut(post_id) {
                    post.comments_count = comments.len();
                    comments.truncate(1);
                    post.comments = comments;
                }
                None
            }
        }
    }

    fn append(
        &mut self,
        request: PageRequest,
        page: FeedPage<PostSummaryResponse>,
    ) -> Option<PageRequest> {
        if !self.cursor.is_current(request) {
            return None;
        }

        let received = page.items.len();
        let mut seen: HashSet<Uuid> = self.items.iter().map(|p| p.id).collect();
        let before = self.items.len();
        // Offsets drift when posts are inserted server-side between pages;
        // the overlap shows up as repeated ids.
        self.items
            .extend(page.items.into_iter().filter(|p| seen.insert(p.id)));
        let appended = self.items.len() - before;

        self.cursor
            .page_loaded(request, received, appended, page.total)
    }

    fn position(&self, post_id: Uuid) -> Option<usize> {
        self.items.iter().position(|p| p.id == post_id)
    }

    fn post_mut(&mut self, post_id: Uuid) -> Option<&mut PostSummaryResponse> {
        self.items.iter_mut().find(|p| p.id == post_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::dto::AuthorResponse;
    use crate::feed::CursorState;

    fn author() -> AuthorResponse {
        AuthorResponse {
            user_id: Uuid::nil(),
            name: "Ada".into(),
            avatar: None,
        }
    }

    fn summary(text: &str) -> PostSummaryResponse {
        let now = Utc::now();
        PostSummaryResponse {
            id: Uuid::new_v4(),
            author: author(),
            text: text.into(),
            likes: vec![],
            comments: vec![],
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn comment(post_id: Uuid, text: &str) -> CommentResponse {
        let now = Utc::now();
        CommentResponse {
            id: Uuid::new_v4(),
            post_id,
            author: author(),
            text: text.into(),
            likes: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn page(items: Vec<PostSummaryResponse>, total: usize) -> FeedPage<PostSummaryResponse> {
        FeedPage { items, total }
    }

    fn loaded(state: &mut FeedState, total: usize, count: usize) -> Vec<PostSummaryResponse> {
        let request = state.apply(FeedCommand::Start).unwrap();
        let items: Vec<_> = (0..count).map(|i| summary(&format!("post {i}"))).collect();
        state.apply(FeedCommand::PageLoaded {
            request,
            page: page(items.clone(), total),
        });
        items
    }

    #[test]
    fn test_overlapping_page_skips_cached_ids() {
        let mut state = FeedState::default();
        let first = loaded(&mut state, 20, 10);

        let request = state.apply(FeedCommand::ItemVisible(9)).unwrap();
        assert_eq!(request.offset, 10);

        // A post was inserted server-side, so the second page repeats the
        // last item of the first.
        let mut second: Vec<_> = (0..9).map(|i| summary(&format!("late {i}"))).collect();
        second.insert(0, first[9].clone());
        state.apply(FeedCommand::PageLoaded {
            request,
            page: page(second, 21),
        });

        assert_eq!(state.items().len(), 19);
        let unique: HashSet<Uuid> = state.items().iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), 19);
        assert_eq!(state.cursor().consumed(), 20);
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut state = FeedState::default();
        loaded(&mut state, 20, 10);
        let request = state.apply(FeedCommand::ItemVisible(9)).unwrap();
        state.apply(FeedCommand::Cancel);

        state.apply(FeedCommand::PageLoaded {
            request,
            page: page(vec![summary("late")], 20),
        });
        assert_eq!(state.items().len(), 10);
        assert_eq!(state.cursor().state(), CursorState::Idle);
    }

    #[test]
    fn test_created_and_removed_posts_shift_offset() {
        let mut state = FeedState::default();
        let items = loaded(&mut state, 20, 10);

        let mine = summary("mine");
        state.apply(FeedCommand::PostCreated(mine.clone()));
        assert_eq!(state.items()[0].id, mine.id);
        assert_eq!(state.cursor().consumed(), 11);

        state.apply(FeedCommand::PostRemoved(items[3].id));
        state.apply(FeedCommand::PostRemoved(Uuid::new_v4()));
        assert_eq!(state.items().len(), 10);
        assert_eq!(state.cursor().consumed(), 10);
    }

    /// Answer `request` from `server` the way the list endpoint would.
    fn respond(server: &[PostSummaryResponse], request: PageRequest) -> FeedCommand {
        let items = server
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();
        FeedCommand::PageLoaded {
            request,
            page: page(items, server.len()),
        }
    }

    /// Feed every request through `server` until the cursor stops asking.
    fn drain(state: &mut FeedState, server: &[PostSummaryResponse], mut next: Option<PageRequest>) {
        while let Some(request) = next {
            next = state.apply(respond(server, request));
        }
    }

    fn missing(state: &FeedState, server: &[PostSummaryResponse]) -> Vec<String> {
        let cached: HashSet<Uuid> = state.items().iter().map(|p| p.id).collect();
        server
            .iter()
            .filter(|p| !cached.contains(&p.id))
            .map(|p| p.text.clone())
            .collect()
    }

    fn first_page(state: &mut FeedState, server: &[PostSummaryResponse]) -> PageRequest {
        let request = state.apply(FeedCommand::Start).unwrap();
        assert!(state.apply(respond(server, request)).is_none());
        state.apply(FeedCommand::ItemVisible(9)).unwrap()
    }

    #[test]
    fn test_post_created_while_page_in_flight_served_after_insert() {
        let mut server: Vec<_> = (0..20).map(|i| summary(&format!("a{i}"))).collect();
        let mut state = FeedState::default();
        let in_flight = first_page(&mut state, &server);
        assert_eq!(in_flight.offset, 10);

        let mine = summary("mine");
        server.insert(0, mine.clone());
        assert!(state.apply(FeedCommand::PostCreated(mine)).is_none());

        // The answer repeats a9, which the cache already holds.
        assert!(state.apply(respond(&server, in_flight)).is_none());
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.cursor().state(), CursorState::Idle);

        let next = state.apply(FeedCommand::ItemVisible(19)).unwrap();
        assert_eq!((next.offset, next.limit), (20, 1));
        drain(&mut state, &server, Some(next));

        assert!(missing(&state, &server).is_empty());
        assert_eq!(state.items().len(), 21);
        assert_eq!(state.cursor().state(), CursorState::Exhausted);
    }

    #[test]
    fn test_post_created_while_page_in_flight_served_before_insert() {
        let mut server: Vec<_> = (0..20).map(|i| summary(&format!("a{i}"))).collect();
        let mut state = FeedState::default();
        let in_flight = first_page(&mut state, &server);

        let answer = respond(&server, in_flight);
        let mine = summary("mine");
        server.insert(0, mine.clone());
        state.apply(FeedCommand::PostCreated(mine));

        let next = state.apply(answer);
        drain(&mut state, &server, next);

        assert!(missing(&state, &server).is_empty());
        assert_eq!(state.items().len(), 21);
        let unique: HashSet<Uuid> = state.items().iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), 21);
    }

    #[test]
    fn test_post_removed_while_page_in_flight_reissues_earlier() {
        let mut server: Vec<_> = (0..20).map(|i| summary(&format!("a{i}"))).collect();
        let mut state = FeedState::default();
        let in_flight = first_page(&mut state, &server);

        let gone = server.remove(3);
        let reissued = state.apply(FeedCommand::PostRemoved(gone.id)).unwrap();
        assert_eq!(reissued.offset, 9);
        assert!(!state.cursor().is_current(in_flight));

        // The superseded answer, served after the removal, is dropped.
        assert!(state.apply(respond(&server, in_flight)).is_none());
        assert_eq!(state.items().len(), 9);

        drain(&mut state, &server, Some(reissued));
        assert!(missing(&state, &server).is_empty());
        assert_eq!(state.items().len(), 19);
        assert_eq!(state.cursor().state(), CursorState::Exhausted);
    }

    #[test]
    fn test_comment_changes_keep_summary_shape() {
        let mut state = FeedState::default();
        let items = loaded(&mut state, 1, 1);
        let post_id = items[0].id;

        let comments = vec![comment(post_id, "newest"), comment(post_id, "older")];
        state.apply(FeedCommand::CommentsChanged {
            post_id,
            comments: comments.clone(),
        });

        let post = &state.items()[0];
        assert_eq!(post.comments_count, 2);
        assert_eq!(post.comments, vec![comments[0].clone()]);
    }

    #[test]
    fn test_likes_change_replaces_list() {
        let mut state = FeedState::default();
        let items = loaded(&mut state, 1, 1);
        let likes = vec![LikeResponse {
            user_id: Uuid::new_v4(),
        }];

        state.apply(FeedCommand::LikesChanged {
            post_id: items[0].id,
            likes: likes.clone(),
        });
        assert_eq!(state.items()[0].likes, likes);
    }

    #[test]
    fn test_failed_page_keeps_error_until_retry() {
        let mut state = FeedState::default();
        let request = state.apply(FeedCommand::Start).unwrap();
        state.apply(FeedCommand::PageFailed {
            request,
            error: "503 Service Unavailable".into(),
        });
        assert_eq!(state.cursor().last_error(), Some("503 Service Unavailable"));

        let retried = state.apply(FeedCommand::Retry).unwrap();
        assert_eq!(retried.offset, 0);
        assert!(state.cursor().last_error().is_none());
    }
}
