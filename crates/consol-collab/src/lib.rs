//! Consol Collab: contracts for the services a session depends on but this
//! workspace does not implement (AI completion, social content scraping).

pub mod completion;
pub mod error;
pub mod scraper;

pub use completion::{Completion, CompletionClient, CompletionRequest};
pub use error::{CollabError, Result};
pub use scraper::{
    scrape_batch, BatchResults, ContentItem, ContentScraper, Engagement, PlatformLimits,
};
