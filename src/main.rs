//! splitw - tmux-style pane splitting
//!
//! splitw creates a session with one window and one pane sized to the
//! terminal, then runs tmux-style commands against it. `split-window` cuts a
//! pane in two and starts a command in the new half; `list-panes` shows the
//! result.
//!
//! # Quick Start
//!
//! ```text
//! splitw splitw -h -l 30% top                # left/right split, new pane 30% wide
//! splitw splitw -P -F '#D' \; lsp            # print the new pane id, then list panes
//! echo hello | splitw splitw -I              # new empty pane fed from stdin
//! splitw -n splitw -b -l 5 \; lsp            # dry run, no processes started
//! ```
//!
//! # split-window flags
//!
//! | Flag | Meaning |
//! |------|---------|
//! | -h / -v | left/right or top/bottom split |
//! | -l N, -l N% | size of the new pane in cells or percent |
//! | -p N | size in percent (legacy) |
//! | -b | new pane goes left of / above the target |
//! | -f | span the full window width or height |
//! | -d | do not make the new pane active |
//! | -Z | zoom the active pane afterwards |
//! | -I | new empty pane reads the client's stdin |
//! | -P / -F | print the new pane (with a format) |
//! | -c dir, -e NAME=value | working directory and environment |
//! | -t target | pane to split |

mod cmd;
mod config;
mod core;
mod wm;

use std::env;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cmd::host::ClientRef;
use crate::cmd::queue::CommandQueue;
use crate::cmd::{CmdReturn, CommandContext};
use crate::config::{Config, ConfigError};
use crate::core::pty::PtySpawner;
use crate::wm::spawn::Spawner;
use crate::wm::{NullSpawner, Server};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Configuration file given with -f
    config_path: Option<PathBuf>,
    /// Window size overrides
    width: Option<u32>,
    height: Option<u32>,
    /// Create panes without starting processes
    dry_run: bool,
    /// Log at debug level
    verbose: bool,
    /// Commands and their arguments, `;`-separated
    commands: Vec<String>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("splitw {}", VERSION);
}

fn print_help() {
    eprintln!("splitw {} - tmux-style pane splitting", VERSION);
    eprintln!();
    eprintln!("Usage: splitw [OPTIONS] [command [args] [';' command ...]]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -f <FILE>             Configuration file (default ~/.splitw/config.toml)");
    eprintln!("  -x <COLS>             Window width");
    eprintln!("  -y <ROWS>             Window height");
    eprintln!("  -n, --dry-run         Do not start any processes");
    eprintln!("  -v                    Verbose logging");
    eprintln!("  -V, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Commands:");
    for entry in cmd::COMMANDS {
        match entry.alias {
            Some(alias) => eprintln!("  {} ({}) {}", entry.name, alias, entry.usage),
            None => eprintln!("  {} {}", entry.name, entry.usage),
        }
    }
    eprintln!();
    eprintln!("Without a command, split-window is run.");
    eprintln!("Log file: ~/.splitw/splitw.log");
}

fn parse_size(flag: &str, value: Option<&String>) -> Result<u32, String> {
    let value = value.ok_or_else(|| format!("Missing argument for {}", flag))?;
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid size for {}: {}", flag, value)),
    }
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-f" => {
                i += 1;
                let path = args.get(i).ok_or("Missing argument for -f")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "-x" => {
                i += 1;
                options.width = Some(parse_size("-x", args.get(i))?);
            }
            "-y" => {
                i += 1;
                options.height = Some(parse_size("-y", args.get(i))?);
            }
            "-n" | "--dry-run" => {
                options.dry_run = true;
            }
            "-v" => {
                options.verbose = true;
            }
            "--" => {
                options.commands = args[i + 1..].to_vec();
                break;
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            _ => {
                options.commands = args[i..].to_vec();
                break;
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to `~/.splitw/splitw.log`; RUST_LOG wins over -v, -v over the config
fn init_logging(verbose: bool, configured: Option<&str>) {
    let log_path = config::splitw_dir()
        .map(|dir| dir.join("splitw.log"))
        .unwrap_or_else(|| PathBuf::from("splitw.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    else {
        return;
    };

    let level = if verbose {
        Level::DEBUG.to_string()
    } else {
        configured.unwrap_or("info").to_string()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Window size: command line, then the terminal, then the config
fn window_size(options: &Options, config: &Config) -> (u32, u32) {
    let (mut width, mut height) = (config.window.width, config.window.height);
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        if cols > 0 && rows > 0 {
            width = u32::from(cols);
            height = u32::from(rows);
        }
    }
    (options.width.unwrap_or(width), options.height.unwrap_or(height))
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let loaded = match options.config_path {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    let (config, config_error): (Config, Option<ConfigError>) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(options.verbose, config.log_level.as_deref());
    if let Some(e) = config_error {
        warn!("{}; using defaults", e);
        eprintln!("splitw: {}; using defaults", e);
    }
    info!("splitw {} starting", VERSION);

    let spawner: Box<dyn Spawner> = if options.dry_run {
        Box::new(NullSpawner)
    } else {
        Box::new(PtySpawner::new())
    };
    let mut server = Server::from_config(&config, spawner);

    let (width, height) = window_size(&options, &config);
    let first = server
        .create_session(None, width, height)
        .context("failed to start the first pane")?;

    let client = ClientRef::detached("splitw");
    let mut ctx = CommandContext::new(first, Some(client.clone()));
    let mut queue = CommandQueue::new();

    let argv = if options.commands.is_empty() {
        vec![cmd::split_window::ENTRY.name.to_string()]
    } else {
        options.commands.clone()
    };

    let mut failed = false;
    for command in cmd::split_commands(&argv) {
        let status = cmd::execute(&mut server, &mut queue, &mut ctx, &command);
        flush(&mut queue);
        if status == CmdReturn::Error {
            error!("{} failed", command.join(" "));
            failed = true;
            break;
        }

        let hook_failures = cmd::run_hooks(&mut server, &mut queue, Some(client.clone()));
        flush(&mut queue);
        if hook_failures > 0 {
            warn!("{} hook command(s) failed", hook_failures);
        }
    }

    let (windows, sessions) = server.take_dirty();
    debug!("redraw windows {:?}, status for sessions {:?}", windows, sessions);

    if let Some(pane) = ctx.waiting.take() {
        let mut input = Vec::new();
        if std::io::stdin().is_terminal() {
            info!("%{} waiting for input, stdin is a terminal", pane);
        }
        std::io::stdin()
            .read_to_end(&mut input)
            .context("failed to read input")?;
        server
            .finish_input(pane, &input)
            .with_context(|| format!("failed to deliver input to %{}", pane))?;
        info!("delivered {} bytes to %{}", input.len(), pane);
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Print what the commands produced
fn flush(queue: &mut CommandQueue) {
    for line in queue.take_output() {
        println!("{}", line);
    }
    for line in queue.take_errors() {
        eprintln!("splitw: {}", line);
    }
}
