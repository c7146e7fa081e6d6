use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use reqwest::{header, Client, ClientBuilder};

use super::Fetcher;
use crate::core::spider::DEFAULT_USER_AGENT;
use crate::core::CrawlConfig;
use crate::http::{Page, PageRequest};
use crate::ScraperResult;

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> ScraperResult<Self> {
        let client = ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest, config: &CrawlConfig) -> ScraperResult<Page> {
        let mut req = match &request.form {
            Some(fields) => {
                info!("Posting form to URL: {}", request.url);
                self.client.post(request.url.clone()).form(fields)
            }
            None => {
                info!("Fetching URL: {}", request.url);
                self.client.get(request.url.clone())
            }
        };
        req = req.header(header::USER_AGENT, config.user_agent.as_str());
        for (key, value) in &config.headers {
            req = req.header(key, value);
        }

        let started = Utc::now();
        let response = req.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response.text().await?;

        debug!(
            "Received response: status={}, body_length={}, elapsed={}ms",
            status,
            body.len(),
            (Utc::now() - started).num_milliseconds()
        );

        Ok(Page::new(final_url, status, body))
    }

    fn box_clone(&self) -> Box<dyn Fetcher> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScraperError;
    use url::Url;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (HttpFetcher, MockServer) {
        let server = MockServer::start().await;
        let fetcher = HttpFetcher::new().unwrap();
        (fetcher, server)
    }

    fn url_for(server: &MockServer, route: &str) -> Url {
        Url::parse(&server.uri()).unwrap().join(route).unwrap()
    }

    #[tokio::test]
    async fn test_get_html_page() {
        let (fetcher, mock_server) = setup().await;

        Mock::given(method("GET"))
            .and(path("/ssa27"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    "<html><body>Meetings</body></html>",
                    "text/html; charset=utf-8",
                ),
            )
            .mount(&mock_server)
            .await;

        let request = PageRequest::get(url_for(&mock_server, "/ssa27"));
        let page = fetcher.fetch(&request, &CrawlConfig::default()).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html><body>Meetings</body></html>");
        assert!(page.is_success());
    }

    #[tokio::test]
    async fn test_error_status_is_returned() {
        let (fetcher, mock_server) = setup().await;

        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let request = PageRequest::get(url_for(&mock_server, "/gone"));
        let page = fetcher.fetch(&request, &CrawlConfig::default()).await.unwrap();

        assert_eq!(page.status, 404);
        assert!(!page.is_success());
    }

    #[tokio::test]
    async fn test_config_headers_are_sent() {
        let (fetcher, mock_server) = setup().await;
        let config = CrawlConfig::default()
            .with_user_agent("CivicBot/1.0")
            .with_headers(vec![("x-agency", "chi_ssa_27")]);

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "CivicBot/1.0"))
            .and(header("x-agency", "chi_ssa_27"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let request = PageRequest::get(Url::parse(&mock_server.uri()).unwrap());
        let page = fetcher.fetch(&request, &config).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "ok");
    }

    #[tokio::test]
    async fn test_form_is_posted_url_encoded() {
        let (fetcher, mock_server) = setup().await;

        Mock::given(method("POST"))
            .and(path("/wp-admin/admin-ajax.php"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("action=the_ajax_hook"))
            .and(body_string_contains("fc_focus_day=17"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"content":""}"#))
            .mount(&mock_server)
            .await;

        let request = PageRequest::post_form(
            url_for(&mock_server, "/wp-admin/admin-ajax.php"),
            [("action", "the_ajax_hook"), ("fc_focus_day", "17")],
        );
        let page = fetcher.fetch(&request, &CrawlConfig::default()).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, r#"{"content":""}"#);
    }

    #[tokio::test]
    async fn test_invalid_config_header_is_an_http_error() {
        let (fetcher, mock_server) = setup().await;
        let config = CrawlConfig::default().with_headers(vec![("invalid\0header", "value")]);

        let request = PageRequest::get(Url::parse(&mock_server.uri()).unwrap());
        let result = fetcher.fetch(&request, &config).await;

        assert!(matches!(result, Err(ScraperError::HttpError(_))));
    }
}
