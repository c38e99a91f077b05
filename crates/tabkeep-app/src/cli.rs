use std::path::PathBuf;

use clap::Parser;

/// Tabkeep: a multi-tab browser shell that keeps busy background pages alive.
///
/// Runs headless, reading commands from stdin (type `help`).
#[derive(Parser, Debug)]
#[command(name = "tabkeep", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `tabkeep=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for saved tabs, bookmarks and the keep-alive log.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flags_parse() {
        let args = Args::try_parse_from([
            "tabkeep",
            "--config",
            "/tmp/c.toml",
            "--log-level",
            "tabkeep=debug",
            "--data-dir",
            "/tmp/data",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(args.log_level.as_deref(), Some("tabkeep=debug"));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/data")));
    }

    #[test]
    fn flags_are_optional() {
        let args = Args::try_parse_from(["tabkeep"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.data_dir.is_none());
    }
}
