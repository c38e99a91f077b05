//! TOML config file loading and creation.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path, load_or_default};
pub use paths::{default_config_path, ensure_default_config};
