//! News feed
//!
//! Loads the site's news entries from a JSON data file and rebuilds the
//! latest-updates fragment of the homepage. Only the newest five entries are
//! shown there; the full list lives on its own page.

use super::escape_html;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Homepage shows at most this many entries
pub const HOMEPAGE_NEWS_LIMIT: usize = 5;

/// One news entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    /// Display date, e.g. "2025.07"
    pub date: String,
    pub title: String,
    pub content: String,
}

/// The ordered news list, newest first
#[derive(Debug, Clone, Default)]
pub struct NewsFeed {
    items: Vec<NewsItem>,
}

impl NewsFeed {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    /// Load the feed from a JSON file.
    ///
    /// A missing or unreadable file is logged and yields an empty feed; the
    /// homepage then renders its fallback paragraph.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "News file unreadable");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => Self { items },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "News file malformed");
                Self::default()
            }
        }
    }

    /// All entries
    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    /// The newest entries for the homepage, capped at five
    pub fn latest(&self) -> &[NewsItem] {
        let end = self.items.len().min(HOMEPAGE_NEWS_LIMIT);
        &self.items[..end]
    }
}

/// Rebuild the latest-updates fragment from the given entries.
pub fn render_news(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return r#"<p class="text-gray-500">No recent updates available</p>"#.to_string() + "\n";
    }

    let mut html = String::new();
    for item in items {
        html.push_str(&format!(
            r#"<div class="mb-6 last:mb-0">
  <div class="flex items-start">
    <div class="flex-shrink-0 bg-primary/10 text-primary rounded-md px-3 py-1 text-sm font-medium">{date}</div>
    <div class="ml-4">
      <h3 class="text-lg font-medium text-gray-900">{title}</h3>
      <p class="mt-1 text-gray-600">{content}</p>
    </div>
  </div>
</div>
"#,
            date = escape_html(&item.date),
            title = escape_html(&item.title),
            content = escape_html(&item.content),
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn item(n: usize) -> NewsItem {
        NewsItem {
            date: format!("2025.{n:02}"),
            title: format!("News {n}"),
            content: format!("Content {n}"),
        }
    }

    #[test]
    fn test_latest_caps_at_five() {
        let feed = NewsFeed::new((1..=8).map(item).collect());
        assert_eq!(feed.latest().len(), 5);
        assert_eq!(feed.latest()[0], item(1));
    }

    #[test]
    fn test_latest_with_fewer_items_returns_all() {
        let feed = NewsFeed::new((1..=3).map(item).collect());
        assert_eq!(feed.latest().len(), 3);
    }

    #[test]
    fn test_missing_file_yields_empty_feed() {
        let feed = NewsFeed::load("/nonexistent/news.json");
        assert!(feed.items().is_empty());
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("news.json");
        let items = vec![item(1), item(2)];
        std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

        let feed = NewsFeed::load(&path);
        assert_eq!(feed.items(), &items[..]);
    }

    #[test]
    fn test_render_empty_shows_fallback() {
        let html = render_news(&[]);
        assert!(html.contains("No recent updates available"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let items = vec![item(1), item(2)];
        assert_eq!(render_news(&items), render_news(&items));
    }

    #[test]
    fn test_render_escapes_content() {
        let items = vec![NewsItem {
            date: "2025.01".into(),
            title: "<script>".into(),
            content: "a & b".into(),
        }];
        let html = render_news(&items);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>"));
    }
}
