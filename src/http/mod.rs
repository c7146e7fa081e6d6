pub(crate) mod page_set;
pub(crate) mod request;
pub(crate) mod response;

pub use page_set::PageSet;
pub use request::PageRequest;
pub use response::Page;
