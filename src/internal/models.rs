use serde::Deserialize;

/// Envelope returned by the `top-headlines` endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct TopHeadlinesResponse {
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// Article record as delivered by the provider. Every field may be missing.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct RawArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub source: Option<RawSource>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct RawSource {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Normalized article ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source_name: Option<String>,
    pub favicon_url: String,
    pub thumbnail_url: Option<String>,
    pub comment_count: u32,
    pub vote_count: i64,
    pub age_label: String,
    pub thread_tag: String,
}

impl DisplayArticle {
    /// True when the article carries a real link rather than the placeholder.
    pub fn has_link(&self) -> bool {
        self.url != super::mapper::PLACEHOLDER_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_article() {
        let json = r#"{
            "articles": [
                {
                    "title": "Headline",
                    "url": "https://example.com/a",
                    "publishedAt": "2024-05-01T10:00:00Z",
                    "source": { "name": "Example" },
                    "extra": 42
                },
                {}
            ]
        }"#;

        let response: TopHeadlinesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].title.as_deref(), Some("Headline"));
        assert_eq!(
            response.articles[0].published_at.as_deref(),
            Some("2024-05-01T10:00:00Z")
        );
        assert_eq!(
            response.articles[0]
                .source
                .as_ref()
                .and_then(|s| s.name.as_deref()),
            Some("Example")
        );
        assert_eq!(response.articles[1], RawArticle::default());
    }

    #[test]
    fn test_missing_articles_defaults_to_empty() {
        let response: TopHeadlinesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.articles.is_empty());
    }
}
