//! Parsing of the `blocked_domains` preference.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[,，]").unwrap());

/// Split the raw preference into trimmed, non-empty domain entries.
///
/// Entries written as full URLs (`https://www.example.com/path`) are reduced
/// to their host; if the URL does not parse the entry is kept verbatim.
pub fn parse_blocked_domains(raw: &str) -> Vec<String> {
    SEPARATOR_RE
        .split(raw)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if entry.contains("://") {
                url::Url::parse(entry)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_else(|| entry.to_string())
            } else {
                entry.to_string()
            }
        })
        .collect()
}
