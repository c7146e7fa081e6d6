use url::Url;

/// One fetched page, as handed to a spider.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn new(url: Url, status: u16, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
