use super::{Page, PageRequest};
use crate::{ScraperError, ScraperResult};
use std::collections::HashMap;
use url::Url;

/// Pages fetched for one spider run, keyed by the request that fetched them.
/// Iteration follows the order the requests were first inserted.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: HashMap<PageRequest, Page>,
    order: Vec<PageRequest>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, request: PageRequest, page: Page) {
        if !self.pages.contains_key(&request) {
            self.order.push(request.clone());
        }
        self.pages.insert(request, page);
    }

    /// Adds a page as the response to a GET of its own URL.
    pub fn with_page(mut self, page: Page) -> Self {
        self.insert(PageRequest::get(page.url.clone()), page);
        self
    }

    pub fn with_response(mut self, request: PageRequest, page: Page) -> Self {
        self.insert(request, page);
        self
    }

    /// The page fetched by a GET of `url`.
    pub fn get(&self, url: &Url) -> ScraperResult<&Page> {
        self.pages
            .get(&PageRequest::get(url.clone()))
            .ok_or_else(|| ScraperError::MissingPage(url.clone()))
    }

    pub fn responses(&self) -> impl Iterator<Item = (&PageRequest, &Page)> + '_ {
        self.order
            .iter()
            .filter_map(|request| self.pages.get(request).map(|page| (request, page)))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<(PageRequest, Page)> for PageSet {
    fn from_iter<T: IntoIterator<Item = (PageRequest, Page)>>(iter: T) -> Self {
        let mut set = PageSet::new();
        for (request, page) in iter {
            set.insert(request, page);
        }
        set
    }
}
