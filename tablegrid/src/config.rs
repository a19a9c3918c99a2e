//! Grid configuration.

use std::time::Duration;

use crate::message::MessageText;
use crate::query::QueryParams;

/// Configuration for a [`TableGrid`], supplied at construction.
///
/// URLs are paths resolved by the transport against its origin. When only
/// `base_url` is set, the load URL derives to `/api/{base_url}` and the
/// delete URL to `/api/{base_url}/delete`.
///
/// [`TableGrid`]: crate::TableGrid
///
/// # Example
///
/// ```
/// use tablegrid::GridConfig;
///
/// let config = GridConfig {
///     base_url: Some("customer".to_string()),
///     key: Some("customer.grid".to_string()),
///     sort_key: Some("creation_time desc".to_string()),
///     ..GridConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Debounce window for [`search`](crate::TableGrid::search).
    pub delay: Duration,
    /// Key under which query state persists across navigation; `None`
    /// disables persistence.
    pub key: Option<String>,
    /// Whether `initialize` issues the first query automatically.
    pub auto_load: bool,
    /// Maximum grid height in pixels, a passive hint for the rendering layer.
    pub max_height: Option<u32>,
    /// Minimum grid height in pixels.
    pub min_height: u32,
    /// Grid width in pixels.
    pub width: Option<u32>,
    /// Initial pagination visibility; toggled by loads per the total count.
    pub show_pagination: bool,
    /// Page-size choices offered to the user; the first entry becomes the
    /// initial page size.
    pub page_size_options: Vec<u64>,
    /// Base path from which load and delete URLs derive.
    pub base_url: Option<String>,
    /// Explicit load URL, taking precedence over `base_url`.
    pub url: Option<String>,
    /// Explicit delete URL, taking precedence over `base_url`.
    pub delete_url: Option<String>,
    /// Initial query parameters.
    pub params: QueryParams,
    /// Initial sort expression, also the fallback when a column sort resets.
    pub sort_key: Option<String>,
    /// Texts for the delete flow.
    pub text: MessageText,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            key: None,
            auto_load: true,
            max_height: None,
            min_height: 300,
            width: None,
            show_pagination: true,
            page_size_options: vec![10, 20, 50, 100],
            base_url: None,
            url: None,
            delete_url: None,
            params: QueryParams::default(),
            sort_key: None,
            text: MessageText::default(),
        }
    }
}

impl GridConfig {
    /// Resolves the effective load URL: explicit `url`, else derived from
    /// `base_url`.
    pub(crate) fn load_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| self.base_url.as_ref().map(|base| format!("/api/{base}")))
    }

    /// Resolves the effective delete URL: explicit `delete_url`, else derived
    /// from `base_url`.
    pub(crate) fn remove_url(&self) -> Option<String> {
        self.delete_url
            .clone()
            .or_else(|| self.base_url.as_ref().map(|base| format!("/api/{base}/delete")))
    }
}
