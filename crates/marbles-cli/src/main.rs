//! marbles CLI: Command-line interface for interactive marble diagrams

use clap::{Parser, Subcommand};
use marbles_engine::{Catalog, Config, Demo, DemoSession, CONFIG_FILE};
use marbles_tui::diagram;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "MARBLES_LOG";

/// Reactive operators as editable marble diagrams
#[derive(Parser)]
#[command(name = "marbles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Write a config file holding the built-in demo seeds
    Init,

    /// List the available operators
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the diagram of an operator demo
    Show {
        /// Operator name, e.g. combineLatest
        operator: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Lane width in columns (default: from config)
        #[arg(long)]
        width: Option<usize>,
    },

    /// Move one source event of a demo and print the recomputed diagram
    Move {
        /// Operator name, e.g. zip
        operator: String,

        /// Source lane, starting at 1
        #[arg(long, default_value = "1")]
        source: usize,

        /// Event position in the lane, starting at 1
        #[arg(long)]
        event: usize,

        /// New time, clamped to [0, 1]
        #[arg(long, allow_negative_numbers = true)]
        time: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Lane width in columns (default: from config)
        #[arg(long)]
        width: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, None | Some(Commands::Tui)));

    match cli.command {
        None | Some(Commands::Tui) => {
            // Default: open TUI
            let (config, catalog) = load(&cli.config);
            if let Err(e) = marbles_tui::run_tui(catalog, &config) {
                exit_with(e);
            }
        }
        Some(Commands::Init) => {
            cmd_init(&cli.config);
        }
        Some(Commands::List { json }) => {
            let (_, catalog) = load(&cli.config);
            cmd_list(&catalog, json);
        }
        Some(Commands::Show {
            operator,
            json,
            width,
        }) => {
            let (config, catalog) = load(&cli.config);
            let demo = find_demo(&catalog, &operator);
            let session = demo.instantiate().unwrap_or_else(|e| exit_with(e));
            print_session(demo, &session, json, width.unwrap_or(config.lane_width));
        }
        Some(Commands::Move {
            operator,
            source,
            event,
            time,
            json,
            width,
        }) => {
            let (config, catalog) = load(&cli.config);
            cmd_move(
                find_demo(&catalog, &operator),
                (source, event),
                time,
                json,
                width.unwrap_or(config.lane_width),
            );
        }
    }
}

/// Load the config file and build the demo catalog from it.
fn load(config_path: &Path) -> (Config, Catalog) {
    let config = Config::load_or_default(config_path).unwrap_or_else(|e| {
        exit_with(format!("failed to load {}: {e}", config_path.display()))
    });
    let catalog = Catalog::from_config(&config).unwrap_or_else(|e| exit_with(e));
    debug!(demos = catalog.len(), config = %config_path.display(), "catalog ready");
    (config, catalog)
}

/// Install the fmt subscriber on stderr.
///
/// The TUI owns the terminal, so it only logs when `MARBLES_LOG` is set.
fn init_logging(interactive: bool) {
    let explicit = std::env::var_os(LOG_ENV).is_some();
    if interactive && !explicit {
        return;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(error: impl Display) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}

fn find_demo<'a>(catalog: &'a Catalog, operator: &str) -> &'a Demo {
    catalog.find(operator).unwrap_or_else(|| {
        exit_with(format!(
            "unknown operator: {operator} (see `marbles list`)"
        ))
    })
}

fn to_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| exit_with(e))
}

fn cmd_init(config_path: &Path) {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    let config = Catalog::builtin().to_config();
    match config.save(config_path) {
        Ok(()) => {
            debug!(demos = config.demos.len(), "wrote seed config");
            println!("Created {}", config_path.display());
            println!("Edit the demo seeds there, then run `marbles`");
        }
        Err(e) => exit_with(format!("failed to write config: {e}")),
    }
}

fn cmd_list(catalog: &Catalog, json: bool) {
    if json {
        let operators: Vec<_> = catalog
            .demos()
            .iter()
            .map(|demo| {
                serde_json::json!({
                    "name": demo.name(),
                    "arity": demo.operator.arity(),
                    "description": demo.description(),
                })
            })
            .collect();
        println!("{}", to_json(&serde_json::Value::from(operators)));
        return;
    }

    let name_width = catalog
        .demos()
        .iter()
        .map(|demo| demo.name().len())
        .max()
        .unwrap_or(0);
    for demo in catalog.demos() {
        println!(
            "  {:<name_width$}  {}  {}",
            demo.name(),
            demo.operator.arity(),
            demo.description()
        );
    }
}

fn cmd_move(demo: &Demo, (source, event): (usize, usize), time: f64, json: bool, width: usize) {
    if time.is_nan() {
        exit_with("--time must be a number");
    }
    let mut session = demo.instantiate().unwrap_or_else(|e| exit_with(e));

    let (Some(source_index), Some(event_index)) = (source.checked_sub(1), event.checked_sub(1))
    else {
        exit_with("--source and --event start at 1");
    };
    if session.source_timeline(source_index).is_none() {
        exit_with(format!(
            "{} has {} source(s), not {source}",
            demo.name(),
            session.sources().len()
        ));
    }
    if !session.move_source_event(source_index, event_index, time) {
        exit_with(format!("source {source} has no event {event}"));
    }

    print_session(demo, &session, json, width);
}

fn print_session(demo: &Demo, session: &DemoSession, json: bool, width: usize) {
    if json {
        let sources: Vec<_> = (0..session.sources().len())
            .filter_map(|index| session.source_timeline(index))
            .collect();
        let value = serde_json::json!({
            "operator": demo.name(),
            "description": demo.description(),
            "sources": sources,
            "result": session.result_timeline(),
        });
        println!("{}", to_json(&value));
        return;
    }

    println!("{}: {}", demo.name(), demo.description());
    println!("{}", diagram::render_session(session, width.max(1)));
}
