mod app_state;
mod cli;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tabkeep_config::{toml_loader, ReloadManager, TabkeepConfig};
use tabkeep_core::{
    paths, DiagnosticLog, Host, JsonFileStore, KeyValueStore, MemoryStore, RecordingService,
};
use tabkeep_webview::MemorySurfaceFactory;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Tabkeep crashed ---");
        eprintln!("Saved tabs are kept in the data directory and restored on next start.");
        eprintln!("-----------------------\n");
        default_hook(info);
    }));
}

fn init_tracing(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "tabkeep=info".parse().unwrap()),
            ),
        )
        .init();
}

/// Config file to load and watch, creating the default one if missing.
fn resolve_config_path(arg: Option<PathBuf>) -> Option<PathBuf> {
    let path = match arg {
        Some(path) => path,
        None => toml_loader::default_config_path().ok()?,
    };
    if let Err(e) = toml_loader::ensure_default_config(&path) {
        eprintln!("warning: could not create {}: {e}", path.display());
        return None;
    }
    Some(path)
}

fn open_store(data_dir: &Path) -> Rc<dyn KeyValueStore> {
    match JsonFileStore::open_or_reset(paths::state_file(data_dir)) {
        Ok(store) => Rc::new(store),
        Err(e) => {
            tracing::warn!("State store unavailable, this session will not be saved: {e}");
            Rc::new(MemoryStore::new())
        }
    }
}

/// Forward stdin lines to the event loop from a plain thread, so a
/// pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Read the config once up front so its log level can seed tracing.
    let config_path = resolve_config_path(args.config.clone());
    let early = toml_loader::load_or_default(config_path.as_deref());
    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| early.logging.level.as_directive().to_string());
    init_tracing(&directive);

    tracing::info!("Tabkeep v{} starting...", env!("CARGO_PKG_VERSION"));

    let (config, config_rx): (TabkeepConfig, Option<watch::Receiver<TabkeepConfig>>) =
        match config_path {
            Some(path) => {
                tracing::info!("Using config {}", path.display());
                let (config, rx) = ReloadManager::start(path).await;
                (config, Some(rx))
            }
            None => {
                tracing::warn!("No config location available, using defaults");
                (early, None)
            }
        };

    let data_dir = match args.data_dir.map(Ok).unwrap_or_else(paths::data_dir) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!("Failed to create {}: {e}", data_dir.display());
    }
    tracing::info!("Data directory: {}", data_dir.display());

    let store = open_store(&data_dir);
    let log = DiagnosticLog::new(
        paths::wakelock_log_file(&data_dir),
        config.keep_alive.enable_wakelock_log,
    );
    let host = Host::new(
        config,
        store,
        Box::new(MemorySurfaceFactory::new()),
        RecordingService::new(),
        Some(log),
    );

    let (sink, webview_rx) = mpsc::unbounded_channel();
    let mut app = app_state::TabkeepApp::new(host, sink);
    let commands = spawn_stdin_reader();

    println!("tabkeep ready, type `help` for commands");
    if let Err(e) = app
        .run(commands, webview_rx, config_rx, |line| println!("{line}"))
        .await
    {
        tracing::error!("Event loop error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
