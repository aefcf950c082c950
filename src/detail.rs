//! Title and section detail views.
//!
//! A detail record is fetched once by path parameter and never written
//! back. A failed fetch is logged with a fixed prefix and leaves the view
//! empty rather than failing the caller.

use crate::client::ApiClient;
use crate::models::{SectionDetail, TitleDetail};

pub const TITLE_ERROR_PREFIX: &str = "Error loading title:";
pub const SECTION_ERROR_PREFIX: &str = "Error loading section:";

/// `None` when the backend could not supply the title.
pub async fn load_title(client: &ApiClient, title: &str) -> Option<TitleDetail> {
    match client.get_title(title).await {
        Ok(detail) => Some(detail),
        Err(e) => {
            tracing::error!("{} {}", TITLE_ERROR_PREFIX, e);
            None
        }
    }
}

/// `None` when the backend could not supply the section.
pub async fn load_section(client: &ApiClient, id: &str) -> Option<SectionDetail> {
    match client.get_section(id).await {
        Ok(detail) => Some(detail),
        Err(e) => {
            tracing::error!("{} {}", SECTION_ERROR_PREFIX, e);
            None
        }
    }
}
