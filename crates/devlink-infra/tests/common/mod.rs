#![allow(dead_code)]

use uuid::Uuid;

use devlink_core::domain::Caller;
use devlink_core::ports::Stores;
use devlink_core::services::{CommentService, EngagementService, PostService, ProfileService};
use devlink_infra::in_memory_stores;

/// Services wired to one fresh set of in-memory stores.
#[derive(Clone)]
pub struct Harness {
    pub stores: Stores,
    pub posts: PostService,
    pub comments: CommentService,
    pub engagement: EngagementService,
    pub profiles: ProfileService,
}

impl Harness {
    pub fn new() -> Self {
        let stores = in_memory_stores();
        Self {
            posts: PostService::new(&stores),
            comments: CommentService::new(&stores),
            engagement: EngagementService::new(&stores),
            profiles: ProfileService::new(&stores),
            stores,
        }
    }
}

pub fn caller(name: &str) -> Caller {
    Caller::new(Uuid::new_v4(), name)
}
