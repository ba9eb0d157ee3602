//! Entry point for the **gridpointer** daemon.
//!
//! Queries Hyprland for the connected monitors, resolves the display
//! topology, spawns the Unix-socket listener on a background thread and
//! processes incoming commands on the main thread until the listener
//! stops or a client sends `"Shutdown"`.
//!
//! `gridpointer --print-layout` prints the resolved layout as JSON (ready to
//! paste into the `displays` config section and lock) and exits.

use gridpointer::command::Command;
use gridpointer::config::Config;
use gridpointer::daemon::Daemon;
use gridpointer::exec::CommandSink;
use gridpointer::headless::HeadlessRenderer;
use gridpointer::hyprland::displays::HyprlandDisplays;
use gridpointer::hyprland::pointer::HyprlandPointer;
use gridpointer::ipc::listener::{default_socket_path, UnixSocketListener};
use gridpointer::traits::CommandSource;
use log::{error, info};
use std::sync::mpsc;

/// Resolve the config directory (`$XDG_CONFIG_HOME/gridpointer`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("gridpointer")
}

/// Try to load the config from `$XDG_CONFIG_HOME/gridpointer/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let print_layout = std::env::args().any(|a| a == "--print-layout");
    let config = load_config();

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let daemon = Daemon::new(
        HyprlandDisplays::new(),
        HeadlessRenderer::new(cmd_tx.clone()),
        HyprlandPointer::new(config.click.clone()),
        CommandSink::new(config.diagnostics.notify_command.clone()),
        &config,
    );
    let mut daemon = match daemon {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if print_layout {
        match serde_json::to_string_pretty(&daemon.persisted_layout()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("could not serialise layout: {}", e),
        }
        return;
    }

    spawn_command_sources(cmd_tx);

    info!("gridpointer running");
    if let Err(e) = daemon.run(&cmd_rx) {
        error!("shutdown error: {}", e);
    }
    info!("exiting");
}

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx.clone()) {
            error!("socket listener error: {}", e);
        }
        // The renderer keeps its own sender, so the channel never closes.
        let _ = tx.send(Command::Shutdown);
    });
}
