use std::sync::Arc;

use crate::application::comments::CommentService;
use crate::application::contact::ContactService;
use crate::application::likes::LikeService;
use crate::application::newsletter::NewsletterService;
use crate::application::stats::StatsService;
use crate::application::views::ViewService;
use crate::infra::db::SqliteRepositories;

use super::cors::CorsPolicy;
use super::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub likes: Arc<LikeService>,
    pub views: Arc<ViewService>,
    pub comments: Arc<CommentService>,
    pub newsletter: Arc<NewsletterService>,
    pub contact: Arc<ContactService>,
    pub stats: Arc<StatsService>,
    pub cors: Arc<CorsPolicy>,
    /// `None` leaves throttling to the client.
    pub rate_limiter: Option<RateLimiter>,
}

impl ApiState {
    /// Wire every service to the same repositories.
    pub fn from_repositories(
        repositories: Arc<SqliteRepositories>,
        cors: CorsPolicy,
        rate_limiter: Option<RateLimiter>,
    ) -> Self {
        Self {
            likes: Arc::new(LikeService::new(repositories.clone())),
            views: Arc::new(ViewService::new(repositories.clone())),
            comments: Arc::new(CommentService::new(repositories.clone())),
            newsletter: Arc::new(NewsletterService::new(repositories.clone())),
            contact: Arc::new(ContactService::new(repositories.clone())),
            stats: Arc::new(StatsService::new(repositories.clone(), repositories)),
            cors: Arc::new(cors),
            rate_limiter,
        }
    }
}
