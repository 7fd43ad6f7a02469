//! Pagination state for the selected thread.
//!
//! A [`FeedSession`] never performs I/O. Each trigger (thread change, load
//! more, retry) hands back a [`LoadRequest`] that the caller executes; the
//! result is fed back through [`FeedSession::complete`]. Starting a new load
//! cancels the previous request's token, and results for a cancelled token
//! are dropped without touching state.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use super::mapper::PAGE_SIZE;
use super::models::DisplayArticle;
use super::thread::Thread;
use super::vote::{VoteAction, VoteCounter};
use crate::api::FeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// One pending page fetch together with its cancellation token.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub page: u32,
    pub thread: Thread,
    token: CancellationToken,
}

impl LoadRequest {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once a newer trigger has replaced this request.
    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct FeedSession {
    thread: Thread,
    articles: Vec<DisplayArticle>,
    page: u32,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    status: FeedStatus,
    in_flight: Option<CancellationToken>,
    votes: HashMap<String, VoteCounter>,
}

impl FeedSession {
    pub fn new(thread: Thread) -> Self {
        Self {
            thread,
            articles: Vec::new(),
            page: 1,
            loading: false,
            error: None,
            has_more: true,
            status: FeedStatus::Idle,
            in_flight: None,
            votes: HashMap::new(),
        }
    }

    pub fn thread(&self) -> Thread {
        self.thread
    }

    pub fn articles(&self) -> &[DisplayArticle] {
        &self.articles
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    /// The "load more" control is offered only while idle with pages left.
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.has_more
    }

    pub fn can_retry(&self) -> bool {
        !self.loading && self.status == FeedStatus::Failed
    }

    /// Initial load for the current page and thread.
    pub fn start(&mut self) -> LoadRequest {
        self.begin_load()
    }

    /// Switch threads. The list, page and vote state are reset and page one
    /// is requested. Re-selecting the active thread does nothing once the
    /// session has started.
    pub fn select_thread(&mut self, thread: Thread) -> Option<LoadRequest> {
        if thread == self.thread && self.status != FeedStatus::Idle {
            return None;
        }

        tracing::debug!(from = %self.thread, to = %thread, "feed.select_thread");
        self.thread = thread;
        self.articles.clear();
        self.votes.clear();
        self.page = 1;
        self.has_more = true;
        Some(self.begin_load())
    }

    /// Advance by exactly one page past the last successful load. After a
    /// failure the page that failed is requested again.
    pub fn load_more(&mut self) -> Option<LoadRequest> {
        if !self.can_load_more() {
            return None;
        }
        if self.status != FeedStatus::Failed {
            self.page += 1;
        }
        Some(self.begin_load())
    }

    /// Re-request the page that failed without advancing.
    pub fn retry(&mut self) -> Option<LoadRequest> {
        if !self.can_retry() {
            return None;
        }
        Some(self.begin_load())
    }

    fn begin_load(&mut self) -> LoadRequest {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.loading = true;
        self.error = None;
        self.status = FeedStatus::Loading;

        LoadRequest {
            page: self.page,
            thread: self.thread,
            token,
        }
    }

    /// Apply the outcome of `request`. Returns false, leaving state untouched,
    /// when the request has been superseded.
    pub fn complete(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<DisplayArticle>, FeedError>,
    ) -> bool {
        if request.is_superseded() {
            tracing::debug!(
                page = request.page,
                thread = %request.thread,
                "discarding superseded feed load"
            );
            return false;
        }

        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(articles) => {
                self.has_more = articles.len() == PAGE_SIZE;
                self.articles.extend(articles);
                self.status = FeedStatus::Loaded;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.status = FeedStatus::Failed;
            }
        }
        true
    }

    /// Cast or change a vote on a loaded article.
    pub fn vote(&mut self, id: &str, action: VoteAction) -> Option<VoteCounter> {
        let initial = self.articles.iter().find(|a| a.id == id)?.vote_count;
        let counter = self
            .votes
            .entry(id.to_string())
            .or_insert_with(|| VoteCounter::new(initial));
        counter.apply(action);
        Some(*counter)
    }

    /// Vote state for rendering; untouched cards show their source count.
    pub fn vote_state(&self, article: &DisplayArticle) -> VoteCounter {
        self.votes
            .get(&article.id)
            .copied()
            .unwrap_or_else(|| VoteCounter::new(article.vote_count))
    }
}

impl Default for FeedSession {
    fn default() -> Self {
        Self::new(Thread::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::vote::VoteDirection;

    fn articles(thread: Thread, page: u32, n: usize) -> Vec<DisplayArticle> {
        let offset = (page as usize - 1) * PAGE_SIZE;
        (0..n)
            .map(|i| DisplayArticle {
                id: format!("{}-{}", thread.key(), offset + i),
                title: format!("Story {}", offset + i),
                url: "https://example.com".to_string(),
                source_name: None,
                favicon_url: String::new(),
                thumbnail_url: None,
                comment_count: 0,
                vote_count: 0,
                age_label: "1h ago".to_string(),
                thread_tag: thread.key().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let feed = FeedSession::new(Thread::All);
        assert_eq!(feed.status(), FeedStatus::Idle);
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());
        assert!(!feed.is_loading());
        assert!(feed.articles().is_empty());
    }

    #[test]
    fn test_full_page_then_short_page() {
        let mut feed = FeedSession::new(Thread::All);

        let req = feed.start();
        assert_eq!(req.page, 1);
        assert!(feed.is_loading());
        assert!(!feed.can_load_more());
        assert!(feed.complete(&req, Ok(articles(Thread::All, 1, 10))));
        assert!(feed.has_more());
        assert_eq!(feed.status(), FeedStatus::Loaded);

        let req = feed.load_more().expect("load more offered");
        assert_eq!(req.page, 2);
        assert!(feed.complete(&req, Ok(articles(Thread::All, 2, 4))));

        assert_eq!(feed.articles().len(), 14);
        assert!(!feed.has_more());
        assert!(!feed.can_load_more());
        assert!(feed.load_more().is_none());
        assert_eq!(feed.articles()[0].id, "all-0");
        assert_eq!(feed.articles()[13].id, "all-13");
    }

    #[test]
    fn test_failure_keeps_articles() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 10)));

        let req = feed.load_more().unwrap();
        assert!(feed.complete(&req, Err(FeedError::Status(500))));

        assert_eq!(feed.status(), FeedStatus::Failed);
        assert!(!feed.is_loading());
        assert!(feed.error().unwrap().contains("500"));
        assert_eq!(feed.articles().len(), 10);
    }

    #[test]
    fn test_retry_requests_same_page() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 10)));
        let req = feed.load_more().unwrap();
        feed.complete(&req, Err(FeedError::Transport("reset".to_string())));

        let retry = feed.retry().expect("retry offered after failure");
        assert_eq!(retry.page, 2);
        assert!(feed.error().is_none());
        assert!(feed.retry().is_none());
        assert!(feed.complete(&retry, Ok(articles(Thread::All, 2, 3))));
        assert_eq!(feed.articles().len(), 13);
    }

    #[test]
    fn test_load_more_after_failure_stays_on_failed_page() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 10)));
        let req = feed.load_more().unwrap();
        feed.complete(&req, Err(FeedError::Status(500)));

        assert!(feed.can_load_more());
        let next = feed.load_more().expect("load more still offered");
        assert_eq!(next.page, 2);
        assert_eq!(feed.page(), 2);

        assert!(feed.complete(&next, Ok(articles(Thread::All, 2, 10))));
        assert_eq!(feed.articles()[10].id, "all-10");
        assert_eq!(feed.articles()[19].id, "all-19");

        // Back to normal advancing once the page succeeded
        assert_eq!(feed.load_more().unwrap().page, 3);
    }

    #[test]
    fn test_initial_failure_load_more_requests_first_page() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Err(FeedError::Transport("reset".to_string())));
        assert_eq!(feed.load_more().unwrap().page, 1);
    }

    #[test]
    fn test_retry_not_offered_when_loaded() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(Vec::new()));
        assert!(feed.retry().is_none());
        assert!(!feed.has_more());
    }

    #[test]
    fn test_thread_change_resets() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 10)));
        let req = feed.load_more().unwrap();
        feed.complete(&req, Ok(articles(Thread::All, 2, 10)));
        assert_eq!(feed.page(), 2);

        let req = feed.select_thread(Thread::Science).expect("thread changed");
        assert_eq!(req.page, 1);
        assert_eq!(req.thread, Thread::Science);
        assert_eq!(feed.page(), 1);
        assert!(feed.articles().is_empty());
        assert!(feed.has_more());
        assert_eq!(feed.thread(), Thread::Science);
    }

    #[test]
    fn test_thread_change_after_failure() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Err(FeedError::Status(503)));
        let req = feed.select_thread(Thread::Health).unwrap();
        assert!(feed.error().is_none());
        assert!(feed.complete(&req, Ok(articles(Thread::Health, 1, 2))));
        assert_eq!(feed.articles()[0].thread_tag, "health");
    }

    #[test]
    fn test_same_thread_is_noop() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 10)));
        assert!(feed.select_thread(Thread::All).is_none());
        assert_eq!(feed.articles().len(), 10);
    }

    #[test]
    fn test_superseded_result_discarded() {
        let mut feed = FeedSession::new(Thread::All);
        let stale = feed.start();
        let fresh = feed.select_thread(Thread::Business).unwrap();

        assert!(stale.is_superseded());
        assert!(!feed.complete(&stale, Ok(articles(Thread::All, 1, 10))));
        assert!(feed.articles().is_empty());
        assert!(feed.is_loading());

        assert!(feed.complete(&fresh, Ok(articles(Thread::Business, 1, 5))));
        assert_eq!(feed.articles().len(), 5);
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_superseded_error_not_reported() {
        let mut feed = FeedSession::new(Thread::All);
        let stale = feed.start();
        let _fresh = feed.select_thread(Thread::World).unwrap();
        assert!(!feed.complete(&stale, Err(FeedError::Status(500))));
        assert!(feed.error().is_none());
        assert_eq!(feed.status(), FeedStatus::Loading);
    }

    #[test]
    fn test_votes_reset_with_thread() {
        let mut feed = FeedSession::new(Thread::All);
        let req = feed.start();
        feed.complete(&req, Ok(articles(Thread::All, 1, 2)));

        let counter = feed.vote("all-1", VoteAction::Up).unwrap();
        assert_eq!(counter.count(), 1);
        let counter = feed.vote("all-1", VoteAction::Down).unwrap();
        assert_eq!(counter.count(), -1);
        assert_eq!(counter.direction(), VoteDirection::Down);
        assert!(feed.vote("missing", VoteAction::Up).is_none());

        let req = feed.select_thread(Thread::World).unwrap();
        feed.complete(&req, Ok(articles(Thread::World, 1, 2)));
        let untouched = feed.vote_state(&feed.articles()[1].clone());
        assert_eq!(untouched.count(), 0);
        assert_eq!(untouched.direction(), VoteDirection::None);
    }
}
