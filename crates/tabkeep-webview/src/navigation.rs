//! Navigation policy for browser surfaces.

/// URL prefixes a tab may navigate to. Everything else (`file:`,
/// `javascript:`, `data:`, custom schemes) is refused.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &["https://", "http://", "about:blank"];

/// Check whether a URL may be loaded in a tab.
pub fn is_navigation_allowed(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Page used to flush a surface before it is destroyed.
pub const BLANK_PAGE: &str = "about:blank";
