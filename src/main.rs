mod clock;
mod report;
mod store;
mod time_provider;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use directories::ProjectDirs;
use log::info;

use crate::clock::manager::WorldClocks;
use crate::store::JsonFileStore;
use crate::store::repository::StoreRepository;
use crate::time_provider::select_source;
use crate::ui::app::GuiOptions;

#[derive(Parser, Debug)]
#[command(
    name = "worldclocks",
    version,
    about = "World clock gallery with persisted timezone offsets"
)]
struct Cli {
    /// Store file holding the clock definitions and reference selection.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Pin the reference instant (RFC 3339) instead of following the system clock.
    #[arg(long)]
    at: Option<String>,

    /// Print the gallery and exit.
    #[arg(long)]
    list: bool,

    #[arg(long, default_value_t = 1_000)]
    tick_ms: u64,

    /// Only refresh when the Refresh button is pressed.
    #[arg(long)]
    no_live: bool,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    let store_path = cli.store.unwrap_or_else(default_store_path);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("failed to open {}", store_path.display()))?;
    info!("using clock store {}", store.path().display());

    let clocks = WorldClocks::new(StoreRepository::new(store), select_source(cli.at.as_deref()))
        .with_context(|| format!("failed to load clocks from {}", store_path.display()))?;

    if cli.list {
        report::print_gallery(&clocks);
        return Ok(());
    }

    ui::app::run_gui(
        clocks,
        GuiOptions {
            live: !cli.no_live,
            tick: Duration::from_millis(cli.tick_ms),
            store_path,
        },
    )
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("dev", "worldclocks", "worldclocks")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from("worldclocks.json"))
}
