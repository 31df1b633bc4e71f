pub mod error;
pub mod fetcher;
pub mod store;

pub use error::DocumentError;
pub use fetcher::{DEFAULT_PLACEHOLDER_URL, DocumentFetcher};
pub use store::{ResourceAddress, ResourceHandle, ResourceStore};
