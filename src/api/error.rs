use thiserror::Error;

/// Failures surfaced by a single page fetch.
///
/// `Configuration` is raised before any traffic is sent. `Status` and
/// `Transport` together form the network kind; neither is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("News API credential is not configured (set {0})")]
    Configuration(String),
    #[error("Failed to fetch news: HTTP {0}")]
    Status(u16),
    #[error("Failed to fetch news: {0}")]
    Transport(String),
}

impl FeedError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_network(&self) -> bool {
        !self.is_configuration()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// The request URL carries the credential in its query string, so it is
/// stripped before the error becomes user-visible text.
impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.without_url().to_string()),
        }
    }
}
