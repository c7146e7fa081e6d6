use url::Url;

/// One page a spider asks the crawler to fetch.
///
/// Requests double as `PageSet` keys, so two POSTs to the same URL with
/// different form fields are different pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub url: Url,
    /// Form fields, sent url-encoded in a POST body. `None` means GET.
    pub form: Option<Vec<(String, String)>>,
}

impl PageRequest {
    pub fn get(url: Url) -> Self {
        Self { url, form: None }
    }

    pub fn post_form<K, V>(url: Url, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            url,
            form: Some(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn is_post(&self) -> bool {
        self.form.is_some()
    }
}
