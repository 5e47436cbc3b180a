/// Configuration for the product API HTTP client.
///
/// # Fields
///
/// - `base_url`: Service base URL without the `/api` suffix
///   (e.g. `"http://localhost:8000"`).
/// - `timeout_secs`: Optional per-request timeout. `None` means the client
///   waits until the transport itself gives up.
/// - `user_agent`: Value of the `User-Agent` header.
///
/// # Examples
///
/// ```
/// use product_search_client::config::client_config::ClientConfig;
///
/// let cfg = ClientConfig::new("http://localhost:8000");
/// assert_eq!(cfg.timeout_secs, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the search service.
    pub base_url: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request.
    pub user_agent: String,
}

/// User agent used when none is configured.
pub const DEFAULT_USER_AGENT: &str = "product-matcher/0.1";

impl ClientConfig {
    /// Config with no timeout and the default user agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Base URL with surrounding whitespace and trailing slashes removed.
    pub fn normalized_base(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }
}
