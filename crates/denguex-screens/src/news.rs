//! News screen: the public announcement feed.

use std::sync::Arc;

use denguex_client::ApiClient;
use denguex_types::NewsItem;

use crate::state::Slice;

pub struct NewsController {
    api: Arc<ApiClient>,
    pub items: Slice<Vec<NewsItem>>,
}

impl NewsController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, items: Slice::new() }
    }

    /// An empty feed is `Ready(vec![])`, an empty state rather than an
    /// error.
    pub async fn load(&mut self) {
        let ticket = self.items.begin();
        let result = self.api.news().await;
        self.items.settle(ticket, result);
    }

    /// Items for one city plus the country-wide ones.
    pub fn for_city<'a>(&'a self, city: &str) -> Vec<&'a NewsItem> {
        self.items
            .ready()
            .map(|items| {
                items
                    .iter()
                    .filter(|n| n.city.eq_ignore_ascii_case(city) || n.city == "All Pakistan")
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denguex_client::{ClientConfig, SessionStore};

    fn controller() -> NewsController {
        let config = ClientConfig {
            api_base: "http://127.0.0.1:8000/api".into(),
            session_path: std::env::temp_dir().join("denguex-news-test.json"),
        };
        let store = Arc::new(SessionStore::open(&config.session_path));
        NewsController::new(Arc::new(ApiClient::new(&config, store).unwrap()))
    }

    fn item(id: i64, city: &str) -> NewsItem {
        NewsItem { id, title: format!("n{id}"), body: String::new(), city: city.into(), date: None }
    }

    #[test]
    fn empty_feed_is_ready_not_failed() {
        let mut c = controller();
        let ticket = c.items.begin();
        c.items.settle(ticket, Ok(vec![]));
        assert_eq!(c.items.ready().map(Vec::len), Some(0));
        assert!(c.items.state().error().is_none());
    }

    #[test]
    fn city_filter_keeps_countrywide_items() {
        let mut c = controller();
        let ticket = c.items.begin();
        c.items.settle(
            ticket,
            Ok(vec![item(1, "Lahore"), item(2, "Karachi"), item(3, "All Pakistan")]),
        );
        let visible = c.for_city("lahore");
        let ids: Vec<i64> = visible.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
