//! Tabkeep preferences.
//!
//! TOML-backed preferences for the browser shell: home page, keep-alive
//! timing, tab sweep thresholds, and the back-navigation guard. Every
//! section uses serde defaults so a partial (or empty) file works.
//!
//! ```rust,no_run
//! use tabkeep_config::toml_loader;
//!
//! let config = toml_loader::load_or_default(None);
//! println!("home page: {}", config.browser.home_page);
//! ```

pub mod domains;
pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use domains::parse_blocked_domains;
pub use reload::ReloadManager;
pub use schema::{TabkeepConfig, CONFIG_SCHEMA_VERSION};
pub use validation::validate;
