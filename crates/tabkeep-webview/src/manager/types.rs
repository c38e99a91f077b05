/// Configuration applied to every webview the manager creates.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
    /// Whether to enable clipboard access.
    pub clipboard: bool,
    /// Whether to enable autoplay for media.
    pub autoplay: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            user_agent: None,
            clipboard: true,
            autoplay: false,
        }
    }
}

impl WebViewConfig {
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Default::default()
        }
    }
}
