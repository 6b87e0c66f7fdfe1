//! One intercepted request/response pair as supplied by the host

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Exchange {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Path component of the URL, or its first 100 characters when it does not parse
    pub fn url_path(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => self.url.chars().take(100).collect(),
        }
    }

    /// Host component of the URL, if it has one
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_path_and_host() {
        let exchange = Exchange::new(
            "https://acs.m.taobao.com/gw/mtop.taobao.idle.home.config/1.0/?data=%7B%7D",
            200,
            "{}",
        );
        assert_eq!(exchange.url_path(), "/gw/mtop.taobao.idle.home.config/1.0/");
        assert_eq!(exchange.host().as_deref(), Some("acs.m.taobao.com"));
    }

    #[test]
    fn test_unparseable_url_falls_back_to_prefix() {
        let raw = format!("not a url {}", "x".repeat(200));
        let exchange = Exchange::new(raw.clone(), 200, "");
        assert_eq!(exchange.url_path(), raw.chars().take(100).collect::<String>());
        assert_eq!(exchange.host(), None);
    }
}
