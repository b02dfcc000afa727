// src/lab/http_client.rs
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::error::SolverError;
use crate::lab::config::LabConfig;

/// HTTP client bound to one lab instance
#[derive(Debug, Clone)]
pub struct LabClient {
    client: Client,
    base: Url,
}

impl LabClient {
    pub fn new(config: &LabConfig) -> Result<Self, SolverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .cookie_store(false) // probes set the tracking cookie themselves
            .build()?;

        Ok(Self {
            client,
            base: config.lab_url()?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> Result<Url, SolverError> {
        Ok(self.base.join(path)?)
    }

    pub async fn get(&self, path: &str) -> Result<Response, SolverError> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    /// GET with a single cookie, sent verbatim
    pub async fn get_with_cookie(
        &self,
        path: &str,
        name: &str,
        value: &str,
    ) -> Result<Response, SolverError> {
        let url = self.url(path)?;
        Ok(self
            .client
            .get(url)
            .header(COOKIE, format!("{}={}", name, value))
            .send()
            .await?)
    }

    /// Value the lab assigns to cookie `name` on a fresh visit of the root
    pub async fn fetch_cookie(&self, name: &str) -> Result<Option<String>, SolverError> {
        let response = self.get("./").await?.error_for_status()?;
        let value = response
            .cookies()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string());
        debug!("Cookie {} = {:?}", name, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> LabConfig {
        LabConfig {
            base_url: Some("http://127.0.0.1:9/lab/".to_string()),
            user_agent: "test-agent".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_http_client_creation() {
        let client = LabClient::new(&create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_paths_resolve_against_base() {
        let client = LabClient::new(&create_test_config()).unwrap();
        assert_eq!(client.url("filter").unwrap().as_str(), "http://127.0.0.1:9/lab/filter");
        assert_eq!(client.url("./").unwrap().as_str(), "http://127.0.0.1:9/lab/");
        assert_eq!(client.url("/").unwrap().as_str(), "http://127.0.0.1:9/");
    }
}
